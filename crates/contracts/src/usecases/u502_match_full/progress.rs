use serde::{Deserialize, Serialize};

/// Progresso de uma sessão de conciliação automática
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchProgress {
    /// ID da sessão
    #[serde(rename = "sessionId")]
    pub session_id: String,

    /// Status de execução
    pub status: MatchStatus,

    /// Total de itens pendentes a processar
    pub total: Option<i32>,

    /// Itens processados
    pub processed: i32,

    /// Itens relacionados (exatamente 1 correspondência)
    pub matched: i32,

    /// Itens deixados pendentes (nenhuma correspondência)
    #[serde(rename = "leftPending")]
    pub left_pending: i32,

    /// Itens com correspondência ambígua (>1), deixados pendentes
    pub ambiguous: i32,

    /// Quantidade de erros
    pub errors: i32,

    /// Lista de erros
    #[serde(rename = "errorList", default)]
    pub error_list: Vec<MatchError>,

    /// Item em processamento
    #[serde(rename = "currentItem")]
    pub current_item: Option<String>,

    /// Início da sessão
    #[serde(rename = "startedAt")]
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// Fim da sessão
    #[serde(rename = "completedAt")]
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Status de execução da conciliação
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum MatchStatus {
    /// Em andamento
    InProgress,
    /// Concluída
    Completed,
    /// Concluída com erros
    CompletedWithErrors,
    /// Falhou
    Failed,
}

/// Erro de conciliação de um item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchError {
    /// Descrição do erro
    pub message: String,

    /// Detalhes
    pub details: Option<String>,

    /// SKU em texto do item com problema
    #[serde(rename = "skuText")]
    pub sku_text: Option<String>,
}
