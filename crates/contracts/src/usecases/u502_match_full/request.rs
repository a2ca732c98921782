use serde::{Deserialize, Serialize};

/// Requisição de conciliação automática
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequest {
    /// Restringir a um cliente (opcional; vazio processa todos)
    #[serde(rename = "clientId")]
    pub client_id: Option<String>,

    /// Restringir a um envio (opcional)
    #[serde(rename = "shipmentNumber")]
    pub shipment_number: Option<String>,

    /// Ignorar caixa ao comparar SKU em texto com o catálogo
    #[serde(rename = "ignoreCase", default = "default_true")]
    pub ignore_case: bool,
}

fn default_true() -> bool {
    true
}

impl Default for MatchRequest {
    fn default() -> Self {
        Self {
            client_id: None,
            shipment_number: None,
            ignore_case: true,
        }
    }
}
