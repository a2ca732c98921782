use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

/// Erro de domínio do serviço
///
/// Os services devolvem `anyhow::Result`; quando o erro carrega um
/// `DomainError`, os handlers o traduzem no status HTTP adequado em vez de
/// responder 500 genérico.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// Falha de validação detectada antes de qualquer escrita
    #[error("{0}")]
    Validation(String),

    /// Registro não encontrado
    #[error("{0}")]
    NotFound(String),

    /// Conflito de estado (ex.: SKU duplicado, envio já emitido)
    #[error("{0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> anyhow::Error {
        anyhow::Error::new(DomainError::Validation(msg.into()))
    }

    pub fn not_found(msg: impl Into<String>) -> anyhow::Error {
        anyhow::Error::new(DomainError::NotFound(msg.into()))
    }

    pub fn conflict(msg: impl Into<String>) -> anyhow::Error {
        anyhow::Error::new(DomainError::Conflict(msg.into()))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

/// Corpo de erro padrão: `{"error": "..."}`
pub type ApiError = (StatusCode, Json<serde_json::Value>);

/// Traduzir um erro de service em resposta HTTP. Erros de domínio viram o
/// status correspondente com a mensagem; o resto vira 500 com causa logada.
pub fn to_api_error(err: anyhow::Error) -> ApiError {
    match err.downcast_ref::<DomainError>() {
        Some(domain) => (domain.status(), Json(json!({ "error": domain.to_string() }))),
        None => {
            tracing::error!("unhandled service error: {:#}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "erro interno" })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_expected_status() {
        assert_eq!(
            DomainError::Validation("x".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            DomainError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DomainError::Conflict("x".into()).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn validation_message_survives_downcast() {
        let err = DomainError::validation("estoque insuficiente para o SKU X");
        let domain = err.downcast_ref::<DomainError>().unwrap();
        assert_eq!(domain.to_string(), "estoque insuficiente para o SKU X");
    }
}
