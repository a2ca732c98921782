use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, Origin};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Envio FULL (cabeçalho por número de envio)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FullShipmentId(pub Uuid);

impl FullShipmentId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for FullShipmentId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(FullShipmentId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

/// Envio FULL (agregado a006)
///
/// O número do envio é o código de negócio. A emissão é o estado grosso do
/// envio inteiro, separado do estado fino de conciliação de cada item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullShipment {
    #[serde(flatten)]
    pub base: BaseAggregate<FullShipmentId>,

    /// Cliente dono do envio (id de a002)
    #[serde(rename = "clientId")]
    pub client_id: String,

    /// Momento da emissão; None enquanto não emitido
    #[serde(rename = "emittedAt")]
    pub emitted_at: Option<DateTime<Utc>>,
}

impl FullShipment {
    pub fn new_for_insert(shipment_number: String, client_id: String) -> Self {
        let description = format!("Envio FULL {}", shipment_number);
        Self {
            base: BaseAggregate::new(FullShipmentId::new_v4(), shipment_number, description),
            client_id,
            emitted_at: None,
        }
    }

    pub fn shipment_number(&self) -> &str {
        &self.base.code
    }

    pub fn is_emitted(&self) -> bool {
        self.emitted_at.is_some()
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for FullShipment {
    type Id = FullShipmentId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a006"
    }

    fn collection_name() -> &'static str {
        "full_shipment"
    }

    fn element_name() -> &'static str {
        "Envio FULL"
    }

    fn list_name() -> &'static str {
        "Envios FULL"
    }

    fn origin() -> Origin {
        Origin::MercadoLivre
    }
}

// ============================================================================
// Item bruto do envio
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FullItemId(pub Uuid);

impl FullItemId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for FullItemId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(FullItemId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

/// Estado de conciliação de um item bruto.
///
/// A única transição modelada é `Pending -> Matched`; não existe caminho
/// de volta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MatchStatus {
    #[default]
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "matched")]
    Matched,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Matched => "matched",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "matched" => MatchStatus::Matched,
            _ => MatchStatus::Pending,
        }
    }
}

/// Item bruto importado de um envio FULL
///
/// Criado pela importação, nunca excluído; só muda por uma ação de
/// relacionamento (manual ou via kit), que o leva a `Matched`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullShipmentItem {
    #[serde(flatten)]
    pub base: BaseAggregate<FullItemId>,

    /// Número do envio a que o item pertence
    #[serde(rename = "shipmentNumber")]
    pub shipment_number: String,

    /// Código do anúncio no Mercado Livre (MLB...)
    #[serde(rename = "mlCode")]
    pub ml_code: String,

    /// SKU em texto livre informado pelo marketplace
    #[serde(rename = "skuText")]
    pub sku_text: String,

    /// Quantidade enviada
    #[serde(rename = "qty")]
    pub qty: f64,

    /// Estado de conciliação
    #[serde(rename = "matchStatus", default)]
    pub match_status: MatchStatus,

    /// SKU do catálogo relacionado (presente quando Matched)
    #[serde(rename = "matchedSku")]
    pub matched_sku: Option<String>,
}

impl FullShipmentItem {
    pub fn new_for_insert(
        code: String,
        shipment_number: String,
        ml_code: String,
        sku_text: String,
        qty: f64,
    ) -> Self {
        let description = sku_text.clone();
        Self {
            base: BaseAggregate::new(FullItemId::new_v4(), code, description),
            shipment_number,
            ml_code,
            sku_text,
            qty,
            match_status: MatchStatus::Pending,
            matched_sku: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.match_status == MatchStatus::Pending
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Relacionar o item a um SKU do catálogo (Pending -> Matched).
    ///
    /// Rechamar sobre um item já relacionado apenas troca o SKU; o estado
    /// nunca volta para Pending.
    pub fn relate(&mut self, stock_sku: &str) -> Result<(), String> {
        if stock_sku.trim().is_empty() {
            return Err("SKU de estoque não pode ser vazio".into());
        }
        self.match_status = MatchStatus::Matched;
        self.matched_sku = Some(stock_sku.trim().to_string());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.shipment_number.trim().is_empty() {
            return Err("Item sem número de envio".into());
        }
        if self.sku_text.trim().is_empty() {
            return Err("Item sem SKU de marketplace".into());
        }
        if self.qty <= 0.0 {
            return Err("Quantidade do item deve ser maior que zero".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for FullShipmentItem {
    type Id = FullItemId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a006"
    }

    fn collection_name() -> &'static str {
        "full_shipment_item"
    }

    fn element_name() -> &'static str {
        "Item de envio FULL"
    }

    fn list_name() -> &'static str {
        "Itens de envio FULL"
    }

    fn origin() -> Origin {
        Origin::MercadoLivre
    }
}

// ============================================================================
// Visão agrupada por envio
// ============================================================================

/// Agrupamento de itens por número de envio, para exibição
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentGroup {
    #[serde(rename = "shipmentNumber")]
    pub shipment_number: String,
    #[serde(rename = "clientId")]
    pub client_id: String,
    #[serde(rename = "emittedAt")]
    pub emitted_at: Option<DateTime<Utc>>,
    #[serde(rename = "pendingCount")]
    pub pending_count: usize,
    pub items: Vec<FullShipmentItem>,
}

impl ShipmentGroup {
    pub fn from_items(shipment: &FullShipment, items: Vec<FullShipmentItem>) -> Self {
        let pending_count = items.iter().filter(|i| i.is_pending()).count();
        Self {
            shipment_number: shipment.shipment_number().to_string(),
            client_id: shipment.client_id.clone(),
            emitted_at: shipment.emitted_at,
            pending_count,
            items,
        }
    }
}

// ============================================================================
// Contratos legados dos endpoints de conciliação (snake_case em português)
// ============================================================================

/// Componente de kit na busca por composição: `{sku, q}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KitComponentRef {
    pub sku: String,
    pub q: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitCompositionQuery {
    pub components: Vec<KitComponentRef>,
}

/// Resposta da busca de kit: `sku_kit` ausente significa "não encontrado",
/// não é erro.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitSearchResponse {
    pub sku_kit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitMeta {
    pub nome: String,
    pub categoria: String,
    pub preco_unitario: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateKitAndRelateRequest {
    pub raw_id: String,
    pub kit: KitMeta,
    pub components: Vec<KitComponentRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateKitResponse {
    pub sku_kit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelateManualRequest {
    pub raw_id: String,
    pub stock_sku: String,
    pub client_id: String,
    #[serde(default)]
    pub learn: bool,
}

/// Resultado da busca de kit do ponto de vista do consumidor.
///
/// União etiquetada no lugar de flags booleanas/nuláveis: é ela que decide
/// quais ações ficam habilitadas (relacionar kit existente vs. criar kit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KitSearchOutcome {
    /// Nenhuma busca feita ainda
    NotSearched,
    /// Kit existente com exatamente essa composição
    Found(String),
    /// Nenhum kit com essa composição
    NotFound,
    /// Falha na busca (o item segue acionável)
    Error(String),
}

impl From<KitSearchResponse> for KitSearchOutcome {
    fn from(resp: KitSearchResponse) -> Self {
        match resp.sku_kit {
            Some(sku) if !sku.is_empty() => KitSearchOutcome::Found(sku),
            _ => KitSearchOutcome::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> FullShipmentItem {
        FullShipmentItem::new_for_insert(
            "ITEM-1".into(),
            "43210987".into(),
            "MLB123".into(),
            "CANECA-AZUL 300ML".into(),
            5.0,
        )
    }

    #[test]
    fn new_item_starts_pending() {
        let i = item();
        assert_eq!(i.match_status, MatchStatus::Pending);
        assert!(i.matched_sku.is_none());
    }

    #[test]
    fn relate_moves_to_matched_and_never_back() {
        let mut i = item();
        i.relate("CAN-300-AZ").unwrap();
        assert_eq!(i.match_status, MatchStatus::Matched);
        assert_eq!(i.matched_sku.as_deref(), Some("CAN-300-AZ"));

        // re-relacionar troca o SKU mas nunca volta a Pending
        i.relate("CAN-300-AZ-V2").unwrap();
        assert_eq!(i.match_status, MatchStatus::Matched);
        assert_eq!(i.matched_sku.as_deref(), Some("CAN-300-AZ-V2"));
    }

    #[test]
    fn relate_rejects_empty_sku_and_keeps_state() {
        let mut i = item();
        assert!(i.relate("  ").is_err());
        assert_eq!(i.match_status, MatchStatus::Pending);
        assert!(i.matched_sku.is_none());
    }

    #[test]
    fn group_counts_pending_items() {
        let shipment = FullShipment::new_for_insert("43210987".into(), "cli-1".into());
        let mut matched = item();
        matched.relate("SKU-X").unwrap();
        let group = ShipmentGroup::from_items(&shipment, vec![item(), item(), matched]);
        assert_eq!(group.pending_count, 2);
        assert_eq!(group.items.len(), 3);
    }

    #[test]
    fn kit_search_outcome_from_response() {
        let found: KitSearchOutcome = KitSearchResponse {
            sku_kit: Some("KIT-9".into()),
        }
        .into();
        assert_eq!(found, KitSearchOutcome::Found("KIT-9".into()));

        let not_found: KitSearchOutcome = KitSearchResponse { sku_kit: None }.into();
        assert_eq!(not_found, KitSearchOutcome::NotFound);

        // sku_kit vazio também é "não encontrado", não erro
        let empty: KitSearchOutcome = KitSearchResponse {
            sku_kit: Some(String::new()),
        }
        .into();
        assert_eq!(empty, KitSearchOutcome::NotFound);
    }
}
