use axum::{
    extract::{Path, Query},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::domain::a006_full_shipment::{repository, service};
use crate::shared::error::{to_api_error, ApiError};
use contracts::domain::a006_full_shipment::{
    CreateKitAndRelateRequest, CreateKitResponse, FullShipmentItem, KitCompositionQuery,
    KitSearchResponse, RelateManualRequest, ShipmentGroup,
};

/// GET /api/envios/full: itens agrupados por envio, com contagem de
/// pendentes por grupo
pub async fn list_groups() -> Result<Json<Vec<ShipmentGroup>>, ApiError> {
    service::list_groups().await.map(Json).map_err(to_api_error)
}

#[derive(Deserialize)]
pub struct PendingParams {
    #[serde(rename = "envio")]
    pub shipment_number: Option<String>,
    #[serde(rename = "cliente")]
    pub client_id: Option<String>,
}

/// GET /api/envios/full/pendentes?envio=&cliente=
pub async fn pendentes(
    Query(params): Query<PendingParams>,
) -> Result<Json<Vec<FullShipmentItem>>, ApiError> {
    repository::list_pending_items(
        params.shipment_number.as_deref(),
        params.client_id.as_deref(),
    )
    .await
    .map(Json)
    .map_err(to_api_error)
}

/// GET /api/envios/full/:shipment_number
pub async fn get_group(
    Path(shipment_number): Path<String>,
) -> Result<Json<ShipmentGroup>, ApiError> {
    service::get_group(&shipment_number)
        .await
        .map(Json)
        .map_err(to_api_error)
}

/// POST /api/envios/full/relacionar-manual (contrato legado): só
/// sucesso/falha no corpo
pub async fn relacionar_manual(
    Json(req): Json<RelateManualRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    service::relate_manual(req).await.map_err(to_api_error)?;
    Ok(Json(json!({ "ok": true })))
}

/// POST /api/envios/full/kits/find-by-composition (contrato legado):
/// `sku_kit` ausente significa "não encontrado", não erro
pub async fn kits_find_by_composition(
    Json(query): Json<KitCompositionQuery>,
) -> Result<Json<KitSearchResponse>, ApiError> {
    let sku_kit = service::find_kit_by_composition(&query.components)
        .await
        .map_err(to_api_error)?;
    Ok(Json(KitSearchResponse { sku_kit }))
}

/// POST /api/envios/full/kits/create-and-relate: cria o kit e relaciona o
/// item numa única chamada
pub async fn kits_create_and_relate(
    Json(req): Json<CreateKitAndRelateRequest>,
) -> Result<Json<CreateKitResponse>, ApiError> {
    let sku_kit = service::create_kit_and_relate(req)
        .await
        .map_err(to_api_error)?;
    Ok(Json(CreateKitResponse { sku_kit }))
}

/// POST /api/envios/full/:shipment_number/emitir
pub async fn emitir(
    Path(shipment_number): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    service::emit(&shipment_number).await.map_err(to_api_error)?;
    Ok(Json(json!({ "ok": true })))
}
