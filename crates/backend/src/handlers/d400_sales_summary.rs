use axum::{
    extract::Query,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::dashboards::d400_sales_summary::service;
use crate::shared::error::{to_api_error, ApiError};
use crate::shared::export;
use contracts::dashboards::d400_sales_summary::{
    CategorySharesResponse, Granularity, RevenueSeriesRequest, RevenueSeriesResponse,
    TopProductsResponse,
};

#[derive(Deserialize)]
pub struct RangeParams {
    pub de: String,
    pub ate: String,
    #[serde(default)]
    pub granularidade: Granularity,
    pub n: Option<usize>,
}

/// GET /api/d400/resumo-vendas?de=&ate=&granularidade=
pub async fn resumo_vendas(
    Query(params): Query<RangeParams>,
) -> Result<Json<RevenueSeriesResponse>, ApiError> {
    service::revenue_series_range(RevenueSeriesRequest {
        de: params.de,
        ate: params.ate,
        granularidade: params.granularidade,
    })
    .await
    .map(Json)
    .map_err(to_api_error)
}

/// GET /api/d400/top-produtos?de=&ate=&n=
pub async fn top_produtos(
    Query(params): Query<RangeParams>,
) -> Result<Json<TopProductsResponse>, ApiError> {
    service::top_products_range(params.de, params.ate, params.n)
        .await
        .map(Json)
        .map_err(to_api_error)
}

/// GET /api/d400/categorias?de=&ate=
pub async fn categorias(
    Query(params): Query<RangeParams>,
) -> Result<Json<CategorySharesResponse>, ApiError> {
    service::category_shares_range(params.de, params.ate)
        .await
        .map(Json)
        .map_err(to_api_error)
}

/// GET /api/d400/resumo-vendas.csv: download do CSV da série
pub async fn resumo_vendas_csv(Query(params): Query<RangeParams>) -> Result<Response, ApiError> {
    let response = service::revenue_series_range(RevenueSeriesRequest {
        de: params.de,
        ate: params.ate,
        granularidade: params.granularidade,
    })
    .await
    .map_err(to_api_error)?;

    let csv = export::csv::revenue_series_csv(&response.buckets).map_err(to_api_error)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"resumo-vendas.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}
