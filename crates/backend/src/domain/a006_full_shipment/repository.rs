use anyhow::Result;
use chrono::Utc;
use contracts::domain::a006_full_shipment::{FullShipment, FullShipmentItem};
use contracts::domain::common::AggregateId;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::shared::data::db::get_connection;

/// Entidade do cabeçalho do envio (a006_full_shipment)
pub mod shipment {
    use contracts::domain::a006_full_shipment::{FullShipment, FullShipmentId};
    use contracts::domain::common::{BaseAggregate, EntityMetadata};
    use chrono::Utc;
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a006_full_shipment")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub code: String,
        pub description: String,
        pub comment: Option<String>,
        pub client_id: String,
        pub emitted_at: Option<String>,
        pub is_deleted: bool,
        pub created_at: Option<chrono::DateTime<chrono::Utc>>,
        pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
        pub version: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for FullShipment {
        fn from(m: Model) -> Self {
            let metadata = EntityMetadata {
                created_at: m.created_at.unwrap_or_else(Utc::now),
                updated_at: m.updated_at.unwrap_or_else(Utc::now),
                is_deleted: m.is_deleted,
                is_posted: false,
                version: m.version,
            };
            let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
            let emitted_at = m
                .emitted_at
                .as_deref()
                .and_then(|s| s.parse::<chrono::DateTime<Utc>>().ok());

            FullShipment {
                base: BaseAggregate::with_metadata(
                    FullShipmentId::new(uuid),
                    m.code,
                    m.description,
                    m.comment,
                    metadata,
                ),
                client_id: m.client_id,
                emitted_at,
            }
        }
    }
}

/// Entidade dos itens brutos (a006_full_shipment_item)
pub mod item {
    use contracts::domain::a006_full_shipment::{FullItemId, FullShipmentItem, MatchStatus};
    use contracts::domain::common::{BaseAggregate, EntityMetadata};
    use chrono::Utc;
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a006_full_shipment_item")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub code: String,
        pub description: String,
        pub comment: Option<String>,
        pub shipment_number: String,
        pub ml_code: String,
        pub sku_text: String,
        pub qty: f64,
        pub match_status: String,
        pub matched_sku: Option<String>,
        pub is_deleted: bool,
        pub created_at: Option<chrono::DateTime<chrono::Utc>>,
        pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
        pub version: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for FullShipmentItem {
        fn from(m: Model) -> Self {
            let metadata = EntityMetadata {
                created_at: m.created_at.unwrap_or_else(Utc::now),
                updated_at: m.updated_at.unwrap_or_else(Utc::now),
                is_deleted: m.is_deleted,
                is_posted: false,
                version: m.version,
            };
            let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

            FullShipmentItem {
                base: BaseAggregate::with_metadata(
                    FullItemId::new(uuid),
                    m.code,
                    m.description,
                    m.comment,
                    metadata,
                ),
                shipment_number: m.shipment_number,
                ml_code: m.ml_code,
                sku_text: m.sku_text,
                qty: m.qty,
                match_status: MatchStatus::from_str(&m.match_status),
                matched_sku: m.matched_sku,
            }
        }
    }
}

// ============================================================================
// Cabeçalhos
// ============================================================================

pub async fn insert_shipment(s: &FullShipment) -> Result<Uuid> {
    let db = get_connection();
    let active = shipment::ActiveModel {
        id: Set(s.base.id.as_string()),
        code: Set(s.base.code.clone()),
        description: Set(s.base.description.clone()),
        comment: Set(s.base.comment.clone()),
        client_id: Set(s.client_id.clone()),
        emitted_at: Set(s.emitted_at.map(|d| d.to_rfc3339())),
        is_deleted: Set(false),
        created_at: Set(Some(Utc::now())),
        updated_at: Set(Some(Utc::now())),
        version: Set(1),
    };
    shipment::Entity::insert(active).exec(db).await?;
    Ok(s.base.id.value())
}

pub async fn get_shipment_by_number(shipment_number: &str) -> Result<Option<FullShipment>> {
    let db = get_connection();
    let model = shipment::Entity::find()
        .filter(shipment::Column::Code.eq(shipment_number))
        .filter(shipment::Column::IsDeleted.eq(false))
        .one(db)
        .await?;
    Ok(model.map(|m| m.into()))
}

pub async fn list_shipments() -> Result<Vec<FullShipment>> {
    let db = get_connection();
    let models = shipment::Entity::find()
        .filter(shipment::Column::IsDeleted.eq(false))
        .order_by_desc(shipment::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| m.into()).collect())
}

/// Marcar o envio como emitido (carimbo único por envio)
pub async fn set_emitted(shipment_number: &str) -> Result<()> {
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    let db = get_connection();
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE a006_full_shipment SET emitted_at = ?, updated_at = ? WHERE code = ? AND is_deleted = 0",
        [
            Utc::now().to_rfc3339().into(),
            Utc::now().to_rfc3339().into(),
            shipment_number.into(),
        ],
    ))
    .await?;
    Ok(())
}

// ============================================================================
// Itens
// ============================================================================

pub async fn insert_item(i: &FullShipmentItem) -> Result<Uuid> {
    let db = get_connection();
    let active = item::ActiveModel {
        id: Set(i.base.id.as_string()),
        code: Set(i.base.code.clone()),
        description: Set(i.base.description.clone()),
        comment: Set(i.base.comment.clone()),
        shipment_number: Set(i.shipment_number.clone()),
        ml_code: Set(i.ml_code.clone()),
        sku_text: Set(i.sku_text.clone()),
        qty: Set(i.qty),
        match_status: Set(i.match_status.as_str().to_string()),
        matched_sku: Set(i.matched_sku.clone()),
        is_deleted: Set(false),
        created_at: Set(Some(Utc::now())),
        updated_at: Set(Some(Utc::now())),
        version: Set(1),
    };
    item::Entity::insert(active).exec(db).await?;
    Ok(i.base.id.value())
}

pub async fn update_item(i: &FullShipmentItem) -> Result<()> {
    let db = get_connection();
    let active = item::ActiveModel {
        id: Set(i.base.id.as_string()),
        code: Set(i.base.code.clone()),
        description: Set(i.base.description.clone()),
        comment: Set(i.base.comment.clone()),
        shipment_number: Set(i.shipment_number.clone()),
        ml_code: Set(i.ml_code.clone()),
        sku_text: Set(i.sku_text.clone()),
        qty: Set(i.qty),
        match_status: Set(i.match_status.as_str().to_string()),
        matched_sku: Set(i.matched_sku.clone()),
        is_deleted: Set(i.base.metadata.is_deleted),
        created_at: sea_orm::ActiveValue::NotSet,
        updated_at: Set(Some(Utc::now())),
        version: Set(i.base.metadata.version + 1),
    };
    item::Entity::update(active).exec(db).await?;
    Ok(())
}

pub async fn get_item_by_id(id: Uuid) -> Result<Option<FullShipmentItem>> {
    let db = get_connection();
    let model = item::Entity::find_by_id(id.to_string()).one(db).await?;
    Ok(model.map(|m| m.into()))
}

pub async fn list_items_by_shipment(shipment_number: &str) -> Result<Vec<FullShipmentItem>> {
    let db = get_connection();
    let models = item::Entity::find()
        .filter(item::Column::ShipmentNumber.eq(shipment_number))
        .filter(item::Column::IsDeleted.eq(false))
        .order_by_asc(item::Column::SkuText)
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| m.into()).collect())
}

/// Localizar item pela chave natural, para a fusão de linhas duplicadas
/// na importação
pub async fn find_item_by_keys(
    shipment_number: &str,
    ml_code: &str,
    sku_text: &str,
) -> Result<Option<FullShipmentItem>> {
    let db = get_connection();
    let model = item::Entity::find()
        .filter(item::Column::ShipmentNumber.eq(shipment_number))
        .filter(item::Column::MlCode.eq(ml_code))
        .filter(item::Column::SkuText.eq(sku_text))
        .filter(item::Column::IsDeleted.eq(false))
        .one(db)
        .await?;
    Ok(model.map(|m| m.into()))
}

/// Itens pendentes, com filtros opcionais de envio/cliente
pub async fn list_pending_items(
    shipment_number: Option<&str>,
    client_id: Option<&str>,
) -> Result<Vec<FullShipmentItem>> {
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    let db = get_connection();

    let mut conditions = vec![
        "i.is_deleted = 0".to_string(),
        "i.match_status = 'pending'".to_string(),
    ];
    if let Some(number) = shipment_number {
        let escaped = number.replace('\'', "''");
        conditions.push(format!("i.shipment_number = '{}'", escaped));
    }
    if let Some(client) = client_id {
        let escaped = client.replace('\'', "''");
        conditions.push(format!("s.client_id = '{}'", escaped));
    }

    let sql = format!(
        "SELECT i.* FROM a006_full_shipment_item i \
         JOIN a006_full_shipment s ON s.code = i.shipment_number AND s.is_deleted = 0 \
         WHERE {} \
         ORDER BY i.shipment_number, i.sku_text",
        conditions.join(" AND ")
    );

    let rows = db
        .query_all(Statement::from_string(DatabaseBackend::Sqlite, sql))
        .await?;

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let model = item::Model {
            id: row.try_get("", "id").unwrap_or_default(),
            code: row.try_get("", "code").unwrap_or_default(),
            description: row.try_get("", "description").unwrap_or_default(),
            comment: row.try_get("", "comment").ok(),
            shipment_number: row.try_get("", "shipment_number").unwrap_or_default(),
            ml_code: row.try_get("", "ml_code").unwrap_or_default(),
            sku_text: row.try_get("", "sku_text").unwrap_or_default(),
            qty: row.try_get("", "qty").unwrap_or(0.0),
            match_status: row.try_get("", "match_status").unwrap_or_default(),
            matched_sku: row.try_get("", "matched_sku").ok(),
            is_deleted: false,
            created_at: None,
            updated_at: None,
            version: row.try_get("", "version").unwrap_or(0),
        };
        items.push(model.into());
    }

    Ok(items)
}
