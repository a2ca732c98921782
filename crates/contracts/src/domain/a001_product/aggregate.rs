use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, Origin};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub Uuid);

impl ProductId {
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

impl AggregateId for ProductId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ProductId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Tipo do produto
// ============================================================================

/// Tipo do produto: simples (estoque próprio) ou kit (estoque derivado)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProductKind {
    #[default]
    #[serde(rename = "simples")]
    Simples,
    #[serde(rename = "kit")]
    Kit,
}

impl ProductKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Simples => "simples",
            ProductKind::Kit => "kit",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "kit" => ProductKind::Kit,
            _ => ProductKind::Simples,
        }
    }
}

// ============================================================================
// Composição do kit
// ============================================================================

/// Linha de composição de um kit (serializada em components_json)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KitComponent {
    /// SKU do produto componente
    #[serde(rename = "componentSku")]
    pub component_sku: String,
    /// Quantidade do componente por kit
    #[serde(rename = "qtyPerKit")]
    pub qty_per_kit: f64,
    /// Preço unitário do componente no momento da inclusão
    #[serde(rename = "unitPriceAtAdd")]
    pub unit_price_at_add: f64,
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Produto do catálogo (agregado a001)
///
/// Para produtos do tipo kit, `quantidade_atual` não é autoritativa: a
/// quantidade vendável é derivada da composição e do estoque dos componentes
/// (ver [`Product::derived_quantity`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(flatten)]
    pub base: BaseAggregate<ProductId>,

    /// Categoria do produto
    #[serde(rename = "categoria", default)]
    pub categoria: String,

    /// Unidade de medida (un, cx, kg...)
    #[serde(rename = "unidadeMedida", default)]
    pub unidade_medida: String,

    /// Preço unitário de venda
    #[serde(rename = "precoUnitario", default)]
    pub preco_unitario: f64,

    /// Saldo de estoque (apenas para produtos simples)
    #[serde(rename = "quantidadeAtual", default)]
    pub quantidade_atual: f64,

    /// Tipo do produto
    #[serde(rename = "tipoProduto", default)]
    pub kind: ProductKind,

    /// Composição do kit (vazia para produtos simples)
    #[serde(rename = "components", default)]
    pub components: Vec<KitComponent>,
}

impl Product {
    pub fn new_for_insert(
        sku: String,
        nome: String,
        categoria: String,
        unidade_medida: String,
        preco_unitario: f64,
        kind: ProductKind,
    ) -> Self {
        Self {
            base: BaseAggregate::new(ProductId::new_v4(), sku, nome),
            categoria,
            unidade_medida,
            preco_unitario,
            quantidade_atual: 0.0,
            kind,
            components: Vec::new(),
        }
    }

    /// O SKU é o código de negócio do produto
    pub fn sku(&self) -> &str {
        &self.base.code
    }

    pub fn nome(&self) -> &str {
        &self.base.description
    }

    pub fn is_kit(&self) -> bool {
        self.kind == ProductKind::Kit
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Quantidade vendável derivada da composição do kit.
    ///
    /// `floor(min(saldo(componente) / qty_per_kit))` sobre todos os
    /// componentes. Composição vazia => 0. Componente sem saldo no
    /// snapshot => saldo 0.
    pub fn derived_quantity(&self, stock: &HashMap<String, f64>) -> i64 {
        if self.components.is_empty() {
            return 0;
        }
        let mut min_kits: Option<i64> = None;
        for c in &self.components {
            if c.qty_per_kit <= 0.0 {
                continue;
            }
            let available = stock.get(&c.component_sku).copied().unwrap_or(0.0);
            let kits = (available / c.qty_per_kit).floor() as i64;
            min_kits = Some(match min_kits {
                Some(m) => m.min(kits),
                None => kits,
            });
        }
        min_kits.unwrap_or(0)
    }

    /// Preço sugerido do kit: soma de qty × preço de cada componente.
    ///
    /// Apenas sugestão: o operador pode sobrescrever `preco_unitario`
    /// sem alterar a derivação de quantidade.
    pub fn derived_price(&self) -> f64 {
        self.components
            .iter()
            .map(|c| c.qty_per_kit * c.unit_price_at_add)
            .sum()
    }

    /// Quantidade efetiva para venda: saldo próprio para produtos simples,
    /// quantidade derivada para kits.
    pub fn effective_quantity(&self, stock: &HashMap<String, f64>) -> f64 {
        if self.is_kit() {
            self.derived_quantity(stock) as f64
        } else {
            self.quantidade_atual
        }
    }

    /// Incluir um componente na composição. Se o SKU já existe na lista,
    /// as quantidades são somadas em vez de criar linha duplicada; o preço
    /// registrado na inclusão original é mantido.
    pub fn add_component(&mut self, component: KitComponent) {
        if let Some(existing) = self
            .components
            .iter_mut()
            .find(|c| c.component_sku == component.component_sku)
        {
            existing.qty_per_kit += component.qty_per_kit;
        } else {
            self.components.push(component);
        }
    }

    pub fn update(&mut self, dto: &ProductDto) {
        if let Some(sku) = &dto.sku {
            self.base.code = sku.clone();
        }
        self.base.description = dto.nome.clone();
        self.base.comment = dto.comment.clone();
        self.categoria = dto.categoria.clone().unwrap_or_default();
        self.unidade_medida = dto.unidade_medida.clone().unwrap_or_default();
        if let Some(preco) = dto.preco_unitario {
            self.preco_unitario = preco;
        }
        if let Some(kind) = dto.tipo_produto {
            self.kind = kind;
        }
        if let Some(components) = &dto.components {
            self.components = Vec::new();
            for c in components {
                self.add_component(c.clone());
            }
        }
        // quantidade_atual só muda por movimentação de estoque (a005)
    }

    /// Validações locais do agregado. A checagem de kit aninhado depende do
    /// catálogo e fica no service.
    pub fn validate(&self) -> Result<(), String> {
        if self.base.code.trim().is_empty() {
            return Err("SKU não pode ser vazio".into());
        }
        if self.base.description.trim().is_empty() {
            return Err("Nome não pode ser vazio".into());
        }
        if self.preco_unitario < 0.0 {
            return Err("Preço unitário não pode ser negativo".into());
        }
        if self.is_kit() {
            if self.components.is_empty() {
                return Err("Kit deve ter ao menos um componente".into());
            }
            for c in &self.components {
                if c.component_sku.trim().is_empty() {
                    return Err("Componente sem SKU".into());
                }
                if c.qty_per_kit <= 0.0 {
                    return Err(format!(
                        "Quantidade por kit do componente {} deve ser maior que zero",
                        c.component_sku
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for Product {
    type Id = ProductId;

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
        "a001"
    }

    fn collection_name() -> &'static str {
        "product"
    }

    fn element_name() -> &'static str {
        "Produto"
    }

    fn list_name() -> &'static str {
        "Produtos"
    }

    fn origin() -> Origin {
        Origin::Local
    }
}

// ============================================================================
// DTO
// ============================================================================
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductDto {
    pub id: Option<String>,
    pub sku: Option<String>,
    pub nome: String,
    pub categoria: Option<String>,
    #[serde(rename = "unidadeMedida")]
    pub unidade_medida: Option<String>,
    #[serde(rename = "precoUnitario")]
    pub preco_unitario: Option<f64>,
    #[serde(rename = "tipoProduto")]
    pub tipo_produto: Option<ProductKind>,
    pub components: Option<Vec<KitComponent>>,
    pub comment: Option<String>,
}

// ============================================================================
// Linha do contrato legado GET /api/estoque
// ============================================================================

/// Linha da listagem de estoque. Os nomes de campo seguem o contrato
/// legado do endpoint (snake_case em português).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstoqueRow {
    pub sku: String,
    pub nome: String,
    pub categoria: String,
    pub tipo_produto: String,
    pub quantidade_atual: f64,
    pub unidade_medida: String,
    pub preco_unitario: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kit_with(components: Vec<(&str, f64, f64)>) -> Product {
        let mut p = Product::new_for_insert(
            "KIT-001".into(),
            "Kit teste".into(),
            "Kits".into(),
            "un".into(),
            0.0,
            ProductKind::Kit,
        );
        for (sku, qty, price) in components {
            p.add_component(KitComponent {
                component_sku: sku.into(),
                qty_per_kit: qty,
                unit_price_at_add: price,
            });
        }
        p
    }

    fn stock(entries: &[(&str, f64)]) -> HashMap<String, f64> {
        entries.iter().map(|(s, q)| (s.to_string(), *q)).collect()
    }

    #[test]
    fn derived_quantity_is_min_of_floors() {
        let kit = kit_with(vec![("A", 2.0, 10.0), ("B", 1.0, 5.0)]);
        // A: 7/2 = 3.5 -> 3; B: 5/1 = 5 -> min = 3
        let s = stock(&[("A", 7.0), ("B", 5.0)]);
        assert_eq!(kit.derived_quantity(&s), 3);
    }

    #[test]
    fn derived_quantity_empty_components_is_zero() {
        let kit = kit_with(vec![]);
        assert_eq!(kit.derived_quantity(&stock(&[("A", 100.0)])), 0);
    }

    #[test]
    fn derived_quantity_missing_stock_entry_counts_as_zero() {
        let kit = kit_with(vec![("A", 1.0, 10.0), ("B", 2.0, 5.0)]);
        // B ausente do snapshot => saldo 0 => 0 kits
        let s = stock(&[("A", 50.0)]);
        assert_eq!(kit.derived_quantity(&s), 0);
    }

    #[test]
    fn derived_price_is_sum_of_component_prices() {
        let kit = kit_with(vec![("A", 2.0, 10.0), ("B", 3.0, 4.0)]);
        assert!((kit.derived_price() - 32.0).abs() < 1e-9);
    }

    #[test]
    fn price_override_does_not_affect_quantity_derivation() {
        let mut kit = kit_with(vec![("A", 2.0, 10.0)]);
        let s = stock(&[("A", 10.0)]);
        let before = kit.derived_quantity(&s);
        kit.preco_unitario = 999.99;
        assert_eq!(kit.derived_quantity(&s), before);
        // e a sugestão de preço também não muda
        assert!((kit.derived_price() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn add_component_merges_duplicate_sku() {
        let mut kit = kit_with(vec![("A", 2.0, 10.0)]);
        kit.add_component(KitComponent {
            component_sku: "A".into(),
            qty_per_kit: 3.0,
            unit_price_at_add: 12.0,
        });
        assert_eq!(kit.components.len(), 1);
        assert!((kit.components[0].qty_per_kit - 5.0).abs() < 1e-9);
        // preço da inclusão original é mantido
        assert!((kit.components[0].unit_price_at_add - 10.0).abs() < 1e-9);
    }

    #[test]
    fn validate_rejects_kit_without_components() {
        let kit = kit_with(vec![]);
        assert!(kit.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_positive_component_qty() {
        let mut kit = kit_with(vec![("A", 1.0, 10.0)]);
        kit.components[0].qty_per_kit = 0.0;
        assert!(kit.validate().is_err());
    }

    #[test]
    fn simple_product_uses_own_stock() {
        let mut p = Product::new_for_insert(
            "P-001".into(),
            "Produto".into(),
            "Geral".into(),
            "un".into(),
            10.0,
            ProductKind::Simples,
        );
        p.quantidade_atual = 42.0;
        assert!((p.effective_quantity(&stock(&[])) - 42.0).abs() < 1e-9);
    }
}
