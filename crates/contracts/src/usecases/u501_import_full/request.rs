use serde::{Deserialize, Serialize};

/// Fonte das linhas brutas da importação
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ImportSource {
    /// Linhas enviadas no próprio payload (upload de planilha convertida)
    Payload { rows: Vec<serde_json::Value> },
    /// Busca direta na API do Mercado Livre
    MercadoLivre {
        #[serde(rename = "shipmentNumber")]
        shipment_number: String,
    },
}

/// Requisição de importação de envio FULL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    /// ID do cliente dono do envio (a002); quando ausente, o cliente é
    /// resolvido por `client_name`
    #[serde(rename = "clientId")]
    pub client_id: Option<String>,

    /// Nome do cliente para resolução (comparação sem caixa, com trim;
    /// comportamento da lista de clientes de importação)
    #[serde(rename = "clientName")]
    pub client_name: Option<String>,

    /// Número do envio; obrigatório quando as linhas não trazem o campo
    #[serde(rename = "shipmentNumber")]
    pub shipment_number: Option<String>,

    #[serde(flatten)]
    pub source: ImportSource,
}
