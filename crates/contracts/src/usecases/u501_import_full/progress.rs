use serde::{Deserialize, Serialize};

/// Progresso de uma sessão de importação FULL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportProgress {
    /// ID da sessão
    #[serde(rename = "sessionId")]
    pub session_id: String,

    /// Status de execução
    pub status: ImportStatus,

    /// Total de linhas a processar
    pub total: Option<i32>,

    /// Linhas processadas
    pub processed: i32,

    /// Itens criados
    pub imported: i32,

    /// Linhas duplicadas fundidas em itens existentes
    pub merged: i32,

    /// Quantidade de erros
    pub errors: i32,

    /// Lista de erros
    #[serde(rename = "errorList", default)]
    pub error_list: Vec<ImportError>,

    /// Linha em processamento
    #[serde(rename = "currentItem")]
    pub current_item: Option<String>,

    /// Início da sessão
    #[serde(rename = "startedAt")]
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// Fim da sessão
    #[serde(rename = "completedAt")]
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Status de execução da importação
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ImportStatus {
    /// Em andamento
    InProgress,
    /// Concluída
    Completed,
    /// Concluída com erros
    CompletedWithErrors,
    /// Falhou
    Failed,
}

/// Erro de importação de uma linha
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportError {
    /// Descrição do erro
    pub message: String,

    /// Detalhes
    pub details: Option<String>,

    /// Identificação da linha com problema
    pub row: Option<String>,
}
