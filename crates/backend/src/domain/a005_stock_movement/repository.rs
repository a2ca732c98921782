use anyhow::Result;
use chrono::Utc;
use contracts::domain::a005_stock_movement::{MovementKind, StockMovement, StockMovementId};
use contracts::domain::common::{AggregateId, BaseAggregate, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a005_stock_movement")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub sku: String,
    pub kind: String,
    pub quantity: f64,
    pub origem_tabela: String,
    pub origem_id: Option<String>,
    pub observacao: Option<String>,
    pub saldo_apos: f64,
    pub moved_at: String,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for StockMovement {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: false,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let moved_at = m
            .moved_at
            .parse::<chrono::DateTime<Utc>>()
            .unwrap_or_else(|_| Utc::now());

        StockMovement {
            base: BaseAggregate::with_metadata(
                StockMovementId::new(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            sku: m.sku,
            kind: MovementKind::from_str(&m.kind),
            quantity: m.quantity,
            origem_tabela: m.origem_tabela,
            origem_id: m.origem_id,
            observacao: m.observacao,
            saldo_apos: m.saldo_apos,
            moved_at,
        }
    }
}

pub async fn insert(item: &StockMovement) -> Result<Uuid> {
    let db = get_connection();
    let active = ActiveModel {
        id: Set(item.base.id.as_string()),
        code: Set(item.base.code.clone()),
        description: Set(item.base.description.clone()),
        comment: Set(item.base.comment.clone()),
        sku: Set(item.sku.clone()),
        kind: Set(item.kind.as_str().to_string()),
        quantity: Set(item.quantity),
        origem_tabela: Set(item.origem_tabela.clone()),
        origem_id: Set(item.origem_id.clone()),
        observacao: Set(item.observacao.clone()),
        saldo_apos: Set(item.saldo_apos),
        moved_at: Set(item.moved_at.to_rfc3339()),
        is_deleted: Set(false),
        created_at: Set(Some(Utc::now())),
        updated_at: Set(Some(Utc::now())),
        version: Set(1),
    };
    Entity::insert(active).exec(db).await?;
    Ok(item.base.id.value())
}

pub async fn list_by_sku(sku: &str) -> Result<Vec<StockMovement>> {
    let db = get_connection();
    let models = Entity::find()
        .filter(Column::Sku.eq(sku))
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::MovedAt)
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| m.into()).collect())
}

pub async fn list_recent(limit: u64) -> Result<Vec<StockMovement>> {
    let db = get_connection();
    let models = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::MovedAt)
        .limit(limit)
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| m.into()).collect())
}
