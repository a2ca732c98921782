use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, Origin};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub Uuid);

impl CustomerId {
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

impl AggregateId for CustomerId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(CustomerId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

/// Cliente (agregado a002)
///
/// O nome (`base.description`) é a chave de junção com vendas e pagamentos,
/// comparada por igualdade exata (case-sensitive) nos relatórios.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(flatten)]
    pub base: BaseAggregate<CustomerId>,

    /// CPF/CNPJ
    #[serde(rename = "documento")]
    pub documento: Option<String>,

    #[serde(rename = "cidade")]
    pub cidade: Option<String>,

    #[serde(rename = "telefone")]
    pub telefone: Option<String>,

    #[serde(rename = "email")]
    pub email: Option<String>,
}

impl Customer {
    pub fn new_for_insert(code: String, nome: String) -> Self {
        Self {
            base: BaseAggregate::new(CustomerId::new_v4(), code, nome),
            documento: None,
            cidade: None,
            telefone: None,
            email: None,
        }
    }

    pub fn nome(&self) -> &str {
        &self.base.description
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &CustomerDto) {
        self.base.description = dto.nome.clone();
        self.base.comment = dto.comment.clone();
        self.documento = dto.documento.clone();
        self.cidade = dto.cidade.clone();
        self.telefone = dto.telefone.clone();
        self.email = dto.email.clone();
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Nome do cliente não pode ser vazio".into());
        }
        if let Some(email) = &self.email {
            if !email.trim().is_empty() && !email.contains('@') {
                return Err("E-mail inválido".into());
            }
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for Customer {
    type Id = CustomerId;

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
        "a002"
    }

    fn collection_name() -> &'static str {
        "customer"
    }

    fn element_name() -> &'static str {
        "Cliente"
    }

    fn list_name() -> &'static str {
        "Clientes"
    }

    fn origin() -> Origin {
        Origin::Local
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CustomerDto {
    pub id: Option<String>,
    pub nome: String,
    pub documento: Option<String>,
    pub cidade: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub comment: Option<String>,
}
