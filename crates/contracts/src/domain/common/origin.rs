use serde::{Deserialize, Serialize};

/// Origem dos dados de um agregado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// Cadastrado localmente pelo operador
    Local,
    /// Mercado Livre (importação FULL)
    MercadoLivre,
    /// Importado de planilha/payload externo
    Import,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Local => "local",
            Origin::MercadoLivre => "mercado_livre",
            Origin::Import => "import",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
