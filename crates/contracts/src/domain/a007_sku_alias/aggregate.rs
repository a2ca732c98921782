use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, Origin};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Normalizar um alias de SKU para indexação: trim, espaços internos
/// colapsados, caixa alta.
pub fn normalize_alias(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkuAliasId(pub Uuid);

impl SkuAliasId {
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

impl AggregateId for SkuAliasId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(SkuAliasId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

/// De-Para de SKU (agregado a007)
///
/// Mapeamento aprendido de um SKU em texto livre do marketplace para um SKU
/// do catálogo. Alimentado pelos relacionamentos manuais com `learn = true`
/// e consumido pela conciliação automática (u502).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuAlias {
    #[serde(flatten)]
    pub base: BaseAggregate<SkuAliasId>,

    /// Alias normalizado (chave de busca, ver [`normalize_alias`])
    #[serde(rename = "aliasNorm")]
    pub alias_norm: String,

    /// SKU do catálogo
    #[serde(rename = "stockSku")]
    pub stock_sku: String,

    /// Envio de onde o mapeamento foi aprendido
    #[serde(rename = "learnedFrom")]
    pub learned_from: Option<String>,
}

impl SkuAlias {
    pub fn new_for_insert(alias_raw: &str, stock_sku: String, learned_from: Option<String>) -> Self {
        let alias_norm = normalize_alias(alias_raw);
        let code = format!("ALIAS-{}", &Uuid::new_v4().to_string()[..8]);
        Self {
            base: BaseAggregate::new(SkuAliasId::new_v4(), code, alias_raw.trim().to_string()),
            alias_norm,
            stock_sku,
            learned_from,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.alias_norm.is_empty() {
            return Err("Alias não pode ser vazio".into());
        }
        if self.stock_sku.trim().is_empty() {
            return Err("SKU de estoque não pode ser vazio".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for SkuAlias {
    type Id = SkuAliasId;

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
        "a007"
    }

    fn collection_name() -> &'static str {
        "sku_alias"
    }

    fn element_name() -> &'static str {
        "De-Para de SKU"
    }

    fn list_name() -> &'static str {
        "De-Para de SKUs"
    }

    fn origin() -> Origin {
        Origin::Import
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_collapses_and_uppercases() {
        assert_eq!(normalize_alias("  caneca  azul 300ml "), "CANECA AZUL 300ML");
        assert_eq!(normalize_alias("CAN-300"), "CAN-300");
        assert_eq!(normalize_alias(""), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_alias(" kit  caneca \t dupla ");
        assert_eq!(normalize_alias(&once), once);
    }
}
