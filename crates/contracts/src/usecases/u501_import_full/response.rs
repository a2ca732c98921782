use serde::{Deserialize, Serialize};

/// Resposta ao disparo da importação
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    /// ID da sessão de importação
    #[serde(rename = "sessionId")]
    pub session_id: String,

    /// Status do disparo
    pub status: ImportStartStatus,

    /// Mensagem
    pub message: String,
}

/// Status do disparo da importação
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ImportStartStatus {
    /// Disparada com sucesso
    Started,
    /// Falha no disparo
    Failed,
}
