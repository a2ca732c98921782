use axum::{extract::Path, Json};

use crate::dashboards::d401_customer_balances::service;
use crate::shared::error::{to_api_error, ApiError};
use contracts::dashboards::d401_customer_balances::{
    CustomerBalancesResponse, CustomerStatementResponse,
};

/// GET /api/d401/saldos
pub async fn saldos() -> Result<Json<CustomerBalancesResponse>, ApiError> {
    service::balances().await.map(Json).map_err(to_api_error)
}

/// GET /api/d401/saldos/:customer/extrato
pub async fn extrato(
    Path(customer): Path<String>,
) -> Result<Json<CustomerStatementResponse>, ApiError> {
    service::statement(&customer)
        .await
        .map(Json)
        .map_err(to_api_error)
}
