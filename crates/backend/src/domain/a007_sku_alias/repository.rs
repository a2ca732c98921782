use anyhow::Result;
use chrono::Utc;
use contracts::domain::a007_sku_alias::{SkuAlias, SkuAliasId};
use contracts::domain::common::{AggregateId, BaseAggregate, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a007_sku_alias")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub alias_norm: String,
    pub stock_sku: String,
    pub learned_from: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SkuAlias {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: false,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        SkuAlias {
            base: BaseAggregate::with_metadata(
                SkuAliasId::new(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            alias_norm: m.alias_norm,
            stock_sku: m.stock_sku,
            learned_from: m.learned_from,
        }
    }
}

pub async fn insert(item: &SkuAlias) -> Result<Uuid> {
    let db = get_connection();
    let active = ActiveModel {
        id: Set(item.base.id.as_string()),
        code: Set(item.base.code.clone()),
        description: Set(item.base.description.clone()),
        comment: Set(item.base.comment.clone()),
        alias_norm: Set(item.alias_norm.clone()),
        stock_sku: Set(item.stock_sku.clone()),
        learned_from: Set(item.learned_from.clone()),
        is_deleted: Set(false),
        created_at: Set(Some(Utc::now())),
        updated_at: Set(Some(Utc::now())),
        version: Set(1),
    };
    Entity::insert(active).exec(db).await?;
    Ok(item.base.id.value())
}

pub async fn get_by_alias_norm(alias_norm: &str) -> Result<Option<SkuAlias>> {
    let db = get_connection();
    let model = Entity::find()
        .filter(Column::AliasNorm.eq(alias_norm))
        .filter(Column::IsDeleted.eq(false))
        .one(db)
        .await?;
    Ok(model.map(|m| m.into()))
}

pub async fn update_stock_sku(id: Uuid, stock_sku: &str, learned_from: Option<&str>) -> Result<()> {
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    let db = get_connection();
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE a007_sku_alias SET stock_sku = ?, learned_from = ?, updated_at = ? WHERE id = ?",
        [
            stock_sku.into(),
            learned_from.map(|s| s.to_string()).into(),
            Utc::now().to_rfc3339().into(),
            id.to_string().into(),
        ],
    ))
    .await?;
    Ok(())
}

pub async fn list_all() -> Result<Vec<SkuAlias>> {
    let db = get_connection();
    let models = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| m.into()).collect())
}
