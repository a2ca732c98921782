use serde::{Deserialize, Serialize};

/// Resposta ao disparo da conciliação
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    /// ID da sessão de conciliação
    #[serde(rename = "sessionId")]
    pub session_id: String,

    /// Status do disparo
    pub status: MatchStartStatus,

    /// Mensagem
    pub message: String,
}

/// Status do disparo da conciliação
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum MatchStartStatus {
    /// Disparada com sucesso
    Started,
    /// Falha no disparo
    Failed,
}
