use axum::{extract::Path, Json};
use serde_json::json;

use crate::domain::a004_payment::service;
use crate::shared::error::{to_api_error, ApiError, DomainError};
use contracts::domain::a004_payment::{Payment, PaymentDto};

/// GET /api/pagamentos
pub async fn list_all() -> Result<Json<Vec<Payment>>, ApiError> {
    service::list_all().await.map(Json).map_err(to_api_error)
}

/// GET /api/pagamentos/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Payment>, ApiError> {
    let uuid = uuid::Uuid::parse_str(&id)
        .map_err(|_| to_api_error(DomainError::validation("ID inválido")))?;
    match service::get_by_id(uuid).await.map_err(to_api_error)? {
        Some(p) => Ok(Json(p)),
        None => Err(to_api_error(DomainError::not_found(
            "Pagamento não encontrado",
        ))),
    }
}

/// POST /api/pagamentos (upsert)
pub async fn upsert(Json(dto): Json<PaymentDto>) -> Result<Json<serde_json::Value>, ApiError> {
    if dto.id.is_some() {
        service::update(dto).await.map_err(to_api_error)?;
        Ok(Json(json!({ "ok": true })))
    } else {
        let id = service::create(dto).await.map_err(to_api_error)?;
        Ok(Json(json!({ "id": id.to_string() })))
    }
}

/// DELETE /api/pagamentos/:id
pub async fn delete(Path(id): Path<String>) -> Result<Json<serde_json::Value>, ApiError> {
    let uuid = uuid::Uuid::parse_str(&id)
        .map_err(|_| to_api_error(DomainError::validation("ID inválido")))?;
    let removed = service::delete(uuid).await.map_err(to_api_error)?;
    if removed {
        Ok(Json(json!({ "ok": true })))
    } else {
        Err(to_api_error(DomainError::not_found(
            "Pagamento não encontrado",
        )))
    }
}
