use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, Origin};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentId(pub Uuid);

impl PaymentId {
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

impl AggregateId for PaymentId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(PaymentId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

/// Pagamento recebido de um cliente (agregado a004)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(flatten)]
    pub base: BaseAggregate<PaymentId>,

    /// Nome do cliente (chave de junção, igualdade exata)
    #[serde(rename = "clienteNome")]
    pub customer_name: String,

    /// Data do pagamento
    #[serde(rename = "dataPagamento")]
    pub payment_date: DateTime<Utc>,

    /// Valor recebido
    #[serde(rename = "valor")]
    pub amount: f64,

    /// Forma de pagamento (pix, boleto, cartão...)
    #[serde(rename = "metodo")]
    pub metodo: Option<String>,
}

impl Payment {
    pub fn new_for_insert(
        code: String,
        customer_name: String,
        payment_date: DateTime<Utc>,
        amount: f64,
    ) -> Self {
        let description = format!("Pagamento de {}", customer_name);
        Self {
            base: BaseAggregate::new(PaymentId::new_v4(), code, description),
            customer_name,
            payment_date,
            amount,
            metodo: None,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.customer_name.trim().is_empty() {
            return Err("Cliente do pagamento não pode ser vazio".into());
        }
        if self.amount <= 0.0 {
            return Err("Valor do pagamento deve ser maior que zero".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for Payment {
    type Id = PaymentId;

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
        "a004"
    }

    fn collection_name() -> &'static str {
        "payment"
    }

    fn element_name() -> &'static str {
        "Pagamento"
    }

    fn list_name() -> &'static str {
        "Pagamentos"
    }

    fn origin() -> Origin {
        Origin::Local
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PaymentDto {
    pub id: Option<String>,
    #[serde(rename = "clienteNome")]
    pub customer_name: String,
    #[serde(rename = "dataPagamento")]
    pub payment_date: Option<DateTime<Utc>>,
    #[serde(rename = "valor")]
    pub amount: f64,
    #[serde(rename = "metodo")]
    pub metodo: Option<String>,
    pub comment: Option<String>,
}
