use anyhow::Result;
use chrono::Utc;
use contracts::domain::a001_product::{KitComponent, Product, ProductId, ProductKind};
use contracts::domain::common::{AggregateId, BaseAggregate, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub categoria: String,
    pub unidade_medida: String,
    pub preco_unitario: f64,
    pub quantidade_atual: f64,
    pub kind: String,
    pub components_json: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: false,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let components: Vec<KitComponent> = m
            .components_json
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default();

        Product {
            base: BaseAggregate::with_metadata(
                ProductId::new(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            categoria: m.categoria,
            unidade_medida: m.unidade_medida,
            preco_unitario: m.preco_unitario,
            quantidade_atual: m.quantidade_atual,
            kind: ProductKind::from_str(&m.kind),
            components,
        }
    }
}

fn to_active_model(item: &Product, insert: bool) -> Result<ActiveModel> {
    let components_json = if item.components.is_empty() {
        None
    } else {
        Some(serde_json::to_string(&item.components)?)
    };

    Ok(ActiveModel {
        id: Set(item.base.id.as_string()),
        code: Set(item.base.code.clone()),
        description: Set(item.base.description.clone()),
        comment: Set(item.base.comment.clone()),
        categoria: Set(item.categoria.clone()),
        unidade_medida: Set(item.unidade_medida.clone()),
        preco_unitario: Set(item.preco_unitario),
        quantidade_atual: Set(item.quantidade_atual),
        kind: Set(item.kind.as_str().to_string()),
        components_json: Set(components_json),
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
    })
}

pub async fn insert(item: &Product) -> Result<Uuid> {
    let db = get_connection();
    Entity::insert(to_active_model(item, true)?).exec(db).await?;
    Ok(item.base.id.value())
}

pub async fn update(item: &Product) -> Result<()> {
    let db = get_connection();
    Entity::update(to_active_model(item, false)?)
        .exec(db)
        .await?;
    Ok(())
}

pub async fn get_by_id(id: Uuid) -> Result<Option<Product>> {
    let db = get_connection();
    let model = Entity::find_by_id(id.to_string()).one(db).await?;
    Ok(model.map(|m| m.into()))
}

/// Buscar produto pelo SKU (código de negócio), ignorando excluídos
pub async fn get_by_sku(sku: &str) -> Result<Option<Product>> {
    let db = get_connection();
    let model = Entity::find()
        .filter(Column::Code.eq(sku))
        .filter(Column::IsDeleted.eq(false))
        .one(db)
        .await?;
    Ok(model.map(|m| m.into()))
}

pub async fn list_all() -> Result<Vec<Product>> {
    let db = get_connection();
    let models = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| m.into()).collect())
}

/// Somente os kits ativos (para a busca por composição)
pub async fn list_kits() -> Result<Vec<Product>> {
    let db = get_connection();
    let models = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::Kind.eq("kit"))
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| m.into()).collect())
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

/// Atualizar apenas o saldo de estoque (usado pelas movimentações a005)
pub async fn update_quantidade(sku: &str, nova_quantidade: f64) -> Result<()> {
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    let db = get_connection();
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE a001_product SET quantidade_atual = ?, updated_at = ? WHERE code = ? AND is_deleted = 0",
        [
            nova_quantidade.into(),
            Utc::now().to_rfc3339().into(),
            sku.into(),
        ],
    ))
    .await?;
    Ok(())
}

/// Query parameters para a listagem paginada
#[derive(Debug, Clone)]
pub struct ProductListQuery {
    pub search_query: Option<String>,
    pub sort_by: String,
    pub sort_desc: bool,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Clone)]
pub struct ProductListResult {
    pub items: Vec<Product>,
    pub total: usize,
}

/// Listagem paginada com busca e ordenação em SQL
pub async fn list_sql(query: ProductListQuery) -> Result<ProductListResult> {
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    let db = get_connection();

    let mut conditions = vec!["is_deleted = 0".to_string()];

    if let Some(ref search) = query.search_query {
        if !search.is_empty() {
            let escaped = search.replace('\'', "''");
            conditions.push(format!(
                "(code LIKE '%{0}%' OR description LIKE '%{0}%' OR categoria LIKE '%{0}%')",
                escaped
            ));
        }
    }

    let where_clause = conditions.join(" AND ");

    let sort_column = match query.sort_by.as_str() {
        "sku" => "code",
        "nome" => "description",
        "categoria" => "categoria",
        "quantidade" => "quantidade_atual",
        _ => "description",
    };
    let sort_dir = if query.sort_desc { "DESC" } else { "ASC" };

    let count_sql = format!(
        "SELECT COUNT(*) as cnt FROM a001_product WHERE {}",
        where_clause
    );

    let list_sql = format!(
        "SELECT * FROM a001_product WHERE {} ORDER BY {} {} LIMIT {} OFFSET {}",
        where_clause, sort_column, sort_dir, query.limit, query.offset
    );

    let count_result = db
        .query_one(Statement::from_string(DatabaseBackend::Sqlite, count_sql))
        .await?;

    let total = count_result
        .and_then(|row| row.try_get::<i64>("", "cnt").ok())
        .unwrap_or(0) as usize;

    let rows = db
        .query_all(Statement::from_string(DatabaseBackend::Sqlite, list_sql))
        .await?;

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let model = Model {
            id: row.try_get("", "id").unwrap_or_default(),
            code: row.try_get("", "code").unwrap_or_default(),
            description: row.try_get("", "description").unwrap_or_default(),
            comment: row.try_get("", "comment").ok(),
            categoria: row.try_get("", "categoria").unwrap_or_default(),
            unidade_medida: row.try_get("", "unidade_medida").unwrap_or_default(),
            preco_unitario: row.try_get("", "preco_unitario").unwrap_or(0.0),
            quantidade_atual: row.try_get("", "quantidade_atual").unwrap_or(0.0),
            kind: row.try_get("", "kind").unwrap_or_default(),
            components_json: row.try_get("", "components_json").ok(),
            is_deleted: false,
            created_at: None,
            updated_at: None,
            version: row.try_get("", "version").unwrap_or(0),
        };
        items.push(model.into());
    }

    Ok(ProductListResult { items, total })
}
