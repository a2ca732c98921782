use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, Origin};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockMovementId(pub Uuid);

impl StockMovementId {
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

impl AggregateId for StockMovementId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(StockMovementId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

/// Sentido da movimentação
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    #[serde(rename = "entrada")]
    Entrada,
    #[serde(rename = "saida")]
    Saida,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Entrada => "entrada",
            MovementKind::Saida => "saida",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "saida" => MovementKind::Saida,
            _ => MovementKind::Entrada,
        }
    }
}

/// Movimentação de estoque (agregado a005, log append-only)
///
/// Cada entrada/saída registra a quantidade movimentada e o saldo do SKU
/// após a movimentação. Kits nunca são movimentados: o estoque deles é
/// derivado da composição.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    #[serde(flatten)]
    pub base: BaseAggregate<StockMovementId>,

    pub sku: String,

    /// Sentido da movimentação
    #[serde(rename = "tipo")]
    pub kind: MovementKind,

    /// Quantidade movimentada (sempre positiva)
    #[serde(rename = "quantidade")]
    pub quantity: f64,

    /// Tabela de origem da movimentação (ex.: "vendas", "manual")
    #[serde(rename = "origemTabela")]
    pub origem_tabela: String,

    /// ID do registro de origem, quando houver
    #[serde(rename = "origemId")]
    pub origem_id: Option<String>,

    #[serde(rename = "observacao")]
    pub observacao: Option<String>,

    /// Saldo do SKU após a movimentação
    #[serde(rename = "saldoApos")]
    pub saldo_apos: f64,

    /// Momento da movimentação
    #[serde(rename = "movidoEm")]
    pub moved_at: DateTime<Utc>,
}

impl StockMovement {
    #[allow(clippy::too_many_arguments)]
    pub fn new_for_insert(
        code: String,
        sku: String,
        kind: MovementKind,
        quantity: f64,
        origem_tabela: String,
        origem_id: Option<String>,
        observacao: Option<String>,
        saldo_apos: f64,
    ) -> Self {
        let description = format!("{} de {} x {}", kind.as_str(), quantity, sku);
        Self {
            base: BaseAggregate::new(StockMovementId::new_v4(), code, description),
            sku,
            kind,
            quantity,
            origem_tabela,
            origem_id,
            observacao,
            saldo_apos,
            moved_at: Utc::now(),
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sku.trim().is_empty() {
            return Err("SKU da movimentação não pode ser vazio".into());
        }
        if self.quantity <= 0.0 {
            return Err("Quantidade deve ser maior que zero".into());
        }
        if self.origem_tabela.trim().is_empty() {
            return Err("Origem da movimentação não pode ser vazia".into());
        }
        Ok(())
    }
}

impl AggregateRoot for StockMovement {
    type Id = StockMovementId;

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
        "a005"
    }

    fn collection_name() -> &'static str {
        "stock_movement"
    }

    fn element_name() -> &'static str {
        "Movimentação de estoque"
    }

    fn list_name() -> &'static str {
        "Movimentações de estoque"
    }

    fn origin() -> Origin {
        Origin::Local
    }
}

// ============================================================================
// Contrato legado POST /api/estoque/entrada (snake_case em português)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntradaRequest {
    pub sku: String,
    pub quantidade: f64,
    pub origem_tabela: String,
    pub origem_id: Option<String>,
    pub observacao: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaidaRequest {
    pub sku: String,
    pub quantidade: f64,
    pub origem_tabela: String,
    pub origem_id: Option<String>,
    pub observacao: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaldoResponse {
    pub saldo_atual: f64,
}
