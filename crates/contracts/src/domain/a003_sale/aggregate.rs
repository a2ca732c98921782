use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, Origin};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SaleId(pub Uuid);

impl SaleId {
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

impl AggregateId for SaleId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(SaleId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

/// Item de uma venda (serializado em lines_json)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleLine {
    pub sku: String,
    pub descricao: String,
    #[serde(rename = "quantidade")]
    pub quantity: f64,
    #[serde(rename = "precoUnitario")]
    pub unit_price: f64,
}

impl SaleLine {
    pub fn subtotal(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// Venda (documento, agregado a003)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    #[serde(flatten)]
    pub base: BaseAggregate<SaleId>,

    /// Nome do cliente (chave de junção, igualdade exata)
    #[serde(rename = "clienteNome")]
    pub customer_name: String,

    /// Data da venda
    #[serde(rename = "dataVenda")]
    pub sale_date: DateTime<Utc>,

    /// Itens da venda
    #[serde(rename = "itens")]
    pub lines: Vec<SaleLine>,

    /// Total da venda (soma dos subtotais)
    pub total: f64,
}

impl Sale {
    pub fn new_for_insert(
        code: String,
        customer_name: String,
        sale_date: DateTime<Utc>,
        lines: Vec<SaleLine>,
    ) -> Self {
        let description = format!("Venda para {}", customer_name);
        let total = Self::compute_total(&lines);
        Self {
            base: BaseAggregate::new(SaleId::new_v4(), code, description),
            customer_name,
            sale_date,
            lines,
            total,
        }
    }

    pub fn compute_total(lines: &[SaleLine]) -> f64 {
        lines.iter().map(|l| l.subtotal()).sum()
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.customer_name.trim().is_empty() {
            return Err("Cliente da venda não pode ser vazio".into());
        }
        if self.lines.is_empty() {
            return Err("Venda deve ter ao menos um item".into());
        }
        for line in &self.lines {
            if line.sku.trim().is_empty() {
                return Err("Item de venda sem SKU".into());
            }
            if line.quantity <= 0.0 {
                return Err(format!(
                    "Quantidade do item {} deve ser maior que zero",
                    line.sku
                ));
            }
            if line.unit_price < 0.0 {
                return Err(format!("Preço do item {} não pode ser negativo", line.sku));
            }
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.total = Self::compute_total(&self.lines);
        self.base.touch();
    }
}

impl AggregateRoot for Sale {
    type Id = SaleId;

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
        "a003"
    }

    fn collection_name() -> &'static str {
        "sale"
    }

    fn element_name() -> &'static str {
        "Venda"
    }

    fn list_name() -> &'static str {
        "Vendas"
    }

    fn origin() -> Origin {
        Origin::Local
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SaleDto {
    pub id: Option<String>,
    #[serde(rename = "clienteNome")]
    pub customer_name: String,
    #[serde(rename = "dataVenda")]
    pub sale_date: Option<DateTime<Utc>>,
    #[serde(rename = "itens")]
    pub lines: Vec<SaleLine>,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(sku: &str, qty: f64, price: f64) -> SaleLine {
        SaleLine {
            sku: sku.into(),
            descricao: sku.into(),
            quantity: qty,
            unit_price: price,
        }
    }

    #[test]
    fn total_is_sum_of_subtotals() {
        let lines = vec![line("A", 2.0, 10.0), line("B", 1.0, 5.5)];
        assert!((Sale::compute_total(&lines) - 25.5).abs() < 1e-9);
    }

    #[test]
    fn validate_rejects_empty_lines_and_bad_quantities() {
        let sale = Sale::new_for_insert("VND-1".into(), "Maria".into(), Utc::now(), vec![]);
        assert!(sale.validate().is_err());

        let sale = Sale::new_for_insert(
            "VND-2".into(),
            "Maria".into(),
            Utc::now(),
            vec![line("A", 0.0, 10.0)],
        );
        assert!(sale.validate().is_err());
    }
}
