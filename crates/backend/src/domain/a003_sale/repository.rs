use anyhow::Result;
use chrono::Utc;
use contracts::domain::a003_sale::{Sale, SaleId, SaleLine};
use contracts::domain::common::{AggregateId, BaseAggregate, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_sale")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub customer_name: String,
    pub sale_date: String,
    pub lines_json: String,
    pub total: f64,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Sale {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: false,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let sale_date = m
            .sale_date
            .parse::<chrono::DateTime<Utc>>()
            .unwrap_or_else(|_| Utc::now());
        let lines: Vec<SaleLine> = serde_json::from_str(&m.lines_json).unwrap_or_default();

        Sale {
            base: BaseAggregate::with_metadata(
                SaleId::new(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            customer_name: m.customer_name,
            sale_date,
            lines,
            total: m.total,
        }
    }
}

fn to_active_model(item: &Sale, insert: bool) -> Result<ActiveModel> {
    Ok(ActiveModel {
        id: Set(item.base.id.as_string()),
        code: Set(item.base.code.clone()),
        description: Set(item.base.description.clone()),
        comment: Set(item.base.comment.clone()),
        customer_name: Set(item.customer_name.clone()),
        sale_date: Set(item.sale_date.to_rfc3339()),
        lines_json: Set(serde_json::to_string(&item.lines)?),
        total: Set(item.total),
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

pub async fn insert(item: &Sale) -> Result<Uuid> {
    let db = get_connection();
    Entity::insert(to_active_model(item, true)?).exec(db).await?;
    Ok(item.base.id.value())
}

pub async fn update(item: &Sale) -> Result<()> {
    let db = get_connection();
    Entity::update(to_active_model(item, false)?)
        .exec(db)
        .await?;
    Ok(())
}

pub async fn get_by_id(id: Uuid) -> Result<Option<Sale>> {
    let db = get_connection();
    let model = Entity::find_by_id(id.to_string()).one(db).await?;
    Ok(model.map(|m| m.into()))
}

pub async fn list_all() -> Result<Vec<Sale>> {
    let db = get_connection();
    let models = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::SaleDate)
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| m.into()).collect())
}

/// Vendas num intervalo [de, ate] (datas RFC3339 comparáveis como texto)
pub async fn list_in_range(de: &str, ate: &str) -> Result<Vec<Sale>> {
    let db = get_connection();
    let models = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::SaleDate.gte(de))
        .filter(Column::SaleDate.lte(ate))
        .order_by_asc(Column::SaleDate)
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| m.into()).collect())
}

pub async fn list_by_customer(customer_name: &str) -> Result<Vec<Sale>> {
    let db = get_connection();
    // Junção por nome com igualdade exata (case-sensitive)
    let models = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::CustomerName.eq(customer_name))
        .order_by_asc(Column::SaleDate)
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
