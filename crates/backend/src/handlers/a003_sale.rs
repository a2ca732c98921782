use axum::{
    extract::{Path, Query},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::domain::a003_sale::service;
use crate::shared::error::{to_api_error, ApiError, DomainError};
use contracts::domain::a003_sale::{Sale, SaleDto};

#[derive(Deserialize)]
pub struct SaleListParams {
    /// Início do intervalo (RFC3339), opcional
    pub de: Option<String>,
    /// Fim do intervalo (RFC3339), opcional
    pub ate: Option<String>,
}

/// GET /api/vendas
pub async fn list(Query(params): Query<SaleListParams>) -> Result<Json<Vec<Sale>>, ApiError> {
    let result = match (params.de, params.ate) {
        (Some(de), Some(ate)) => service::list_in_range(&de, &ate).await,
        _ => service::list_all().await,
    };
    result.map(Json).map_err(to_api_error)
}

/// GET /api/vendas/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Sale>, ApiError> {
    let uuid = uuid::Uuid::parse_str(&id)
        .map_err(|_| to_api_error(DomainError::validation("ID inválido")))?;
    match service::get_by_id(uuid).await.map_err(to_api_error)? {
        Some(s) => Ok(Json(s)),
        None => Err(to_api_error(DomainError::not_found("Venda não encontrada"))),
    }
}

/// POST /api/vendas
///
/// A venda é validada inteira (inclusive cobertura de estoque) antes de
/// qualquer escrita; falha de estoque responde 422 com o SKU.
pub async fn create(Json(dto): Json<SaleDto>) -> Result<Json<serde_json::Value>, ApiError> {
    let id = service::create(dto).await.map_err(to_api_error)?;
    Ok(Json(json!({ "id": id.to_string() })))
}

/// DELETE /api/vendas/:id (exclusão lógica com estorno de estoque)
pub async fn delete(Path(id): Path<String>) -> Result<Json<serde_json::Value>, ApiError> {
    let uuid = uuid::Uuid::parse_str(&id)
        .map_err(|_| to_api_error(DomainError::validation("ID inválido")))?;
    let removed = service::delete(uuid).await.map_err(to_api_error)?;
    if removed {
        Ok(Json(json!({ "ok": true })))
    } else {
        Err(to_api_error(DomainError::not_found("Venda não encontrada")))
    }
}
