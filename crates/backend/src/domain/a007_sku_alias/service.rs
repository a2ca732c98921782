use anyhow::Result;
use contracts::domain::a007_sku_alias::{normalize_alias, SkuAlias};

use super::repository;
use crate::shared::error::DomainError;

/// Aprender (ou reapontar) o mapeamento alias -> SKU de catálogo.
/// Um alias tem no máximo um SKU: reaprender substitui o destino.
pub async fn learn(alias_raw: &str, stock_sku: &str, learned_from: Option<String>) -> Result<()> {
    let alias_norm = normalize_alias(alias_raw);
    if alias_norm.is_empty() {
        return Err(DomainError::validation("Alias não pode ser vazio"));
    }

    match repository::get_by_alias_norm(&alias_norm).await? {
        Some(existing) if existing.stock_sku == stock_sku => {
            // já aprendido, nada a fazer
            Ok(())
        }
        Some(existing) => {
            tracing::info!(
                "Alias \"{}\" re-learned: {} -> {}",
                alias_norm,
                existing.stock_sku,
                stock_sku
            );
            repository::update_stock_sku(
                existing.base.id.0,
                stock_sku,
                learned_from.as_deref(),
            )
            .await
        }
        None => {
            let alias = SkuAlias::new_for_insert(alias_raw, stock_sku.to_string(), learned_from);
            alias.validate().map_err(DomainError::validation)?;
            repository::insert(&alias).await?;
            tracing::info!("Alias \"{}\" learned -> {}", alias_norm, stock_sku);
            Ok(())
        }
    }
}

/// SKU do catálogo apontado por um alias, se já aprendido
pub async fn lookup(alias_raw: &str) -> Result<Option<String>> {
    let alias_norm = normalize_alias(alias_raw);
    if alias_norm.is_empty() {
        return Ok(None);
    }
    Ok(repository::get_by_alias_norm(&alias_norm)
        .await?
        .map(|a| a.stock_sku))
}

pub async fn list_all() -> Result<Vec<SkuAlias>> {
    repository::list_all().await
}
