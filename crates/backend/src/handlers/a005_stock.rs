use axum::{extract::Query, Json};
use serde::Deserialize;

use crate::domain::a005_stock_movement::service;
use crate::shared::error::{to_api_error, ApiError};
use contracts::domain::a005_stock_movement::{
    EntradaRequest, SaidaRequest, SaldoResponse, StockMovement,
};

/// POST /api/estoque/entrada (contrato legado): responde `{saldo_atual}`
pub async fn entrada(Json(req): Json<EntradaRequest>) -> Result<Json<SaldoResponse>, ApiError> {
    let saldo_atual = service::register_entrada(
        &req.sku,
        req.quantidade,
        &req.origem_tabela,
        req.origem_id,
        req.observacao,
    )
    .await
    .map_err(to_api_error)?;

    Ok(Json(SaldoResponse { saldo_atual }))
}

/// POST /api/estoque/saida
pub async fn saida(Json(req): Json<SaidaRequest>) -> Result<Json<SaldoResponse>, ApiError> {
    let saldo_atual = service::register_saida(
        &req.sku,
        req.quantidade,
        &req.origem_tabela,
        req.origem_id,
        req.observacao,
    )
    .await
    .map_err(to_api_error)?;

    Ok(Json(SaldoResponse { saldo_atual }))
}

#[derive(Deserialize)]
pub struct MovementListParams {
    pub sku: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    100
}

/// GET /api/estoque/movimentos
pub async fn movimentos(
    Query(params): Query<MovementListParams>,
) -> Result<Json<Vec<StockMovement>>, ApiError> {
    let result = match params.sku.as_deref() {
        Some(sku) if !sku.trim().is_empty() => service::list_by_sku(sku).await,
        _ => service::list_recent(params.limit).await,
    };
    result.map(Json).map_err(to_api_error)
}
