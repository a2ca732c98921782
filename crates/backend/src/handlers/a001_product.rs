use axum::{
    extract::{Path, Query},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::domain::a001_product::{repository, service};
use crate::shared::error::{to_api_error, ApiError, DomainError};
use contracts::domain::a001_product::{EstoqueRow, Product, ProductDto};

#[derive(Deserialize)]
pub struct ProductListParams {
    pub q: Option<String>,
    #[serde(default = "default_sort")]
    pub sort_by: String,
    #[serde(default)]
    pub sort_desc: bool,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_sort() -> String {
    "nome".to_string()
}

fn default_limit() -> usize {
    50
}

/// GET /api/produtos
pub async fn list_all() -> Result<Json<Vec<Product>>, ApiError> {
    service::list_all().await.map(Json).map_err(to_api_error)
}

/// GET /api/produtos/list (paginada, com busca)
pub async fn list_paginated(
    Query(params): Query<ProductListParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = repository::list_sql(repository::ProductListQuery {
        search_query: params.q,
        sort_by: params.sort_by,
        sort_desc: params.sort_desc,
        limit: params.limit,
        offset: params.offset,
    })
    .await
    .map_err(to_api_error)?;

    Ok(Json(json!({
        "items": result.items,
        "total": result.total,
    })))
}

/// GET /api/produtos/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Product>, ApiError> {
    let uuid = uuid::Uuid::parse_str(&id)
        .map_err(|_| to_api_error(DomainError::validation("ID inválido")))?;
    match service::get_by_id(uuid).await.map_err(to_api_error)? {
        Some(p) => Ok(Json(p)),
        None => Err(to_api_error(DomainError::not_found("Produto não encontrado"))),
    }
}

/// POST /api/produtos (upsert: com id atualiza, sem id cria)
pub async fn upsert(Json(dto): Json<ProductDto>) -> Result<Json<serde_json::Value>, ApiError> {
    if dto.id.is_some() {
        service::update(dto).await.map_err(to_api_error)?;
        Ok(Json(json!({ "ok": true })))
    } else {
        let id = service::create(dto).await.map_err(to_api_error)?;
        Ok(Json(json!({ "id": id.to_string() })))
    }
}

/// DELETE /api/produtos/:id
pub async fn delete(Path(id): Path<String>) -> Result<Json<serde_json::Value>, ApiError> {
    let uuid = uuid::Uuid::parse_str(&id)
        .map_err(|_| to_api_error(DomainError::validation("ID inválido")))?;
    let removed = service::delete(uuid).await.map_err(to_api_error)?;
    if removed {
        Ok(Json(json!({ "ok": true })))
    } else {
        Err(to_api_error(DomainError::not_found("Produto não encontrado")))
    }
}

/// GET /api/estoque (contrato legado): lista com quantidade efetiva
/// (kits reportam a quantidade derivada)
pub async fn estoque_list() -> Result<Json<Vec<EstoqueRow>>, ApiError> {
    service::estoque_rows().await.map(Json).map_err(to_api_error)
}
