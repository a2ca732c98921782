use anyhow::Result;
use chrono::Utc;
use contracts::domain::a002_customer::{Customer, CustomerId};
use contracts::domain::common::{AggregateId, BaseAggregate, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_customer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub documento: Option<String>,
    pub cidade: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Customer {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: false,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Customer {
            base: BaseAggregate::with_metadata(
                CustomerId::new(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            documento: m.documento,
            cidade: m.cidade,
            telefone: m.telefone,
            email: m.email,
        }
    }
}

fn to_active_model(item: &Customer, insert: bool) -> ActiveModel {
    ActiveModel {
        id: Set(item.base.id.as_string()),
        code: Set(item.base.code.clone()),
        description: Set(item.base.description.clone()),
        comment: Set(item.base.comment.clone()),
        documento: Set(item.documento.clone()),
        cidade: Set(item.cidade.clone()),
        telefone: Set(item.telefone.clone()),
        email: Set(item.email.clone()),
        is_deleted: Set(item.base.metadata.is_deleted),
        created_at: if insert {
            Set(Some(Utc::now()))
        } else {
            sea_orm::ActiveValue::NotSet
        },
        updated_at: Set(Some(Utc::now())),
        version: Set(if insert {
            1
        } else {
            item.base.metadata.version + 1
        }),
    }
}

pub async fn insert(item: &Customer) -> Result<Uuid> {
    let db = get_connection();
    Entity::insert(to_active_model(item, true)).exec(db).await?;
    Ok(item.base.id.value())
}

pub async fn update(item: &Customer) -> Result<()> {
    let db = get_connection();
    Entity::update(to_active_model(item, false)).exec(db).await?;
    Ok(())
}

pub async fn get_by_id(id: Uuid) -> Result<Option<Customer>> {
    let db = get_connection();
    let model = Entity::find_by_id(id.to_string()).one(db).await?;
    Ok(model.map(|m| m.into()))
}

pub async fn list_all() -> Result<Vec<Customer>> {
    let db = get_connection();
    let models = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| m.into()).collect())
}

/// Buscar cliente pelo nome exato (case-sensitive), como fazem as junções
/// de vendas/pagamentos
pub async fn get_by_name_exact(nome: &str) -> Result<Option<Customer>> {
    let db = get_connection();
    let model = Entity::find()
        .filter(Column::Description.eq(nome))
        .filter(Column::IsDeleted.eq(false))
        .one(db)
        .await?;
    Ok(model.map(|m| m.into()))
}

/// Buscar cliente pelo nome sem caixa e com trim.
///
/// Usado SOMENTE pela lista de clientes de importação FULL; o resto do
/// sistema compara nomes por igualdade exata. A divergência é herdada do
/// comportamento original e está registrada em DESIGN.md.
/// TODO: unificar com a comparação exata dos relatórios quando o dono do
/// produto decidir o critério.
pub async fn get_by_name_normalized(nome: &str) -> Result<Option<Customer>> {
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    let db = get_connection();
    let row = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT * FROM a002_customer WHERE lower(trim(description)) = lower(trim(?)) AND is_deleted = 0",
            [nome.into()],
        ))
        .await?;

    Ok(row.map(|r| {
        Model {
            id: r.try_get("", "id").unwrap_or_default(),
            code: r.try_get("", "code").unwrap_or_default(),
            description: r.try_get("", "description").unwrap_or_default(),
            comment: r.try_get("", "comment").ok(),
            documento: r.try_get("", "documento").ok(),
            cidade: r.try_get("", "cidade").ok(),
            telefone: r.try_get("", "telefone").ok(),
            email: r.try_get("", "email").ok(),
            is_deleted: false,
            created_at: None,
            updated_at: None,
            version: r.try_get("", "version").unwrap_or(0),
        }
        .into()
    }))
}

pub async fn soft_delete(id: Uuid) -> Result<bool> {
    let db = get_connection();
    let existing = Entity::find_by_id(id.to_string()).one(db).await?;
    match existing {
        Some(model) => {
            let mut active: ActiveModel = model.into();
            active.is_deleted = Set(true);
            active.updated_at = Set(Some(Utc::now()));
            Entity::update(active).exec(db).await?;
            Ok(true)
        }
        None => Ok(false),
    }
}
