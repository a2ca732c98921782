use anyhow::Result;
use chrono::Utc;
use contracts::domain::a001_product::Product;
use contracts::domain::a003_sale::{Sale, SaleDto, SaleLine};
use std::collections::HashMap;
use uuid::Uuid;

use super::repository;
use crate::domain::{a001_product, a005_stock_movement};
use crate::shared::error::DomainError;
use crate::shared::format::format_brl;

fn generate_code() -> String {
    format!("VND-{}", &Uuid::new_v4().to_string()[..8])
}

/// Checar a disponibilidade de estoque de cada item antes de persistir.
///
/// Produto simples: saldo próprio; kit: quantidade derivada da composição.
/// Qualquer item sem cobertura rejeita a venda inteira; nada é gravado.
pub fn check_stock(
    lines: &[SaleLine],
    catalog: &HashMap<String, Product>,
    stock: &HashMap<String, f64>,
) -> Result<(), String> {
    for line in lines {
        let product = catalog
            .get(&line.sku)
            .ok_or_else(|| format!("SKU {} não existe no catálogo", line.sku))?;
        let available = product.effective_quantity(stock);
        if line.quantity > available {
            return Err(format!("estoque insuficiente para o SKU {}", line.sku));
        }
    }
    Ok(())
}

pub async fn create(dto: SaleDto) -> Result<Uuid> {
    let sale = Sale::new_for_insert(
        generate_code(),
        dto.customer_name.trim().to_string(),
        dto.sale_date.unwrap_or_else(Utc::now),
        dto.lines.clone(),
    );

    sale.validate().map_err(DomainError::validation)?;

    // Snapshot do catálogo + saldo para a checagem de disponibilidade
    let products = a001_product::repository::list_all().await?;
    let stock: HashMap<String, f64> = products
        .iter()
        .filter(|p| !p.is_kit())
        .map(|p| (p.base.code.clone(), p.quantidade_atual))
        .collect();
    let catalog: HashMap<String, Product> = products
        .into_iter()
        .map(|p| (p.base.code.clone(), p))
        .collect();

    check_stock(&sale.lines, &catalog, &stock).map_err(DomainError::validation)?;

    let mut sale = sale;
    sale.before_write();
    let sale_id = repository::insert(&sale).await?;

    // Baixa de estoque: itens simples saem direto; itens de kit baixam
    // cada componente por qty x qty_per_kit.
    for line in &sale.lines {
        let Some(product) = catalog.get(&line.sku) else {
            continue;
        };
        if product.is_kit() {
            for component in &product.components {
                a005_stock_movement::service::register_saida(
                    &component.component_sku,
                    line.quantity * component.qty_per_kit,
                    "vendas",
                    Some(sale_id.to_string()),
                    Some(format!("Venda {} (kit {})", sale.base.code, line.sku)),
                )
                .await?;
            }
        } else {
            a005_stock_movement::service::register_saida(
                &line.sku,
                line.quantity,
                "vendas",
                Some(sale_id.to_string()),
                Some(format!("Venda {}", sale.base.code)),
            )
            .await?;
        }
    }

    tracing::info!(
        "Sale {} created for {} ({} items, total {})",
        sale.base.code,
        sale.customer_name,
        sale.lines.len(),
        format_brl(sale.total)
    );

    Ok(sale_id)
}

/// Excluir (logicamente) uma venda, devolvendo o estoque baixado por ela.
pub async fn delete(id: Uuid) -> Result<bool> {
    let sale = match repository::get_by_id(id).await? {
        Some(s) if !s.base.metadata.is_deleted => s,
        _ => return Ok(false),
    };

    let products = a001_product::repository::list_all().await?;
    let catalog: HashMap<String, Product> = products
        .into_iter()
        .map(|p| (p.base.code.clone(), p))
        .collect();

    for line in &sale.lines {
        match catalog.get(&line.sku) {
            Some(product) if product.is_kit() => {
                for component in &product.components {
                    a005_stock_movement::service::register_entrada(
                        &component.component_sku,
                        line.quantity * component.qty_per_kit,
                        "vendas_estorno",
                        Some(id.to_string()),
                        Some(format!("Estorno da venda {} (kit {})", sale.base.code, line.sku)),
                    )
                    .await?;
                }
            }
            Some(_) => {
                a005_stock_movement::service::register_entrada(
                    &line.sku,
                    line.quantity,
                    "vendas_estorno",
                    Some(id.to_string()),
                    Some(format!("Estorno da venda {}", sale.base.code)),
                )
                .await?;
            }
            None => {
                // Produto saiu do catálogo depois da venda; não há o que devolver
                tracing::warn!(
                    "Sale {} line references unknown SKU {}, skipping restock",
                    sale.base.code,
                    line.sku
                );
            }
        }
    }

    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> Result<Option<Sale>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> Result<Vec<Sale>> {
    repository::list_all().await
}

pub async fn list_in_range(de: &str, ate: &str) -> Result<Vec<Sale>> {
    repository::list_in_range(de, ate).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_product::{KitComponent, ProductKind};

    fn product(sku: &str, qty: f64) -> Product {
        let mut p = Product::new_for_insert(
            sku.into(),
            sku.into(),
            "Geral".into(),
            "un".into(),
            10.0,
            ProductKind::Simples,
        );
        p.quantidade_atual = qty;
        p
    }

    fn kit(sku: &str, components: Vec<(&str, f64)>) -> Product {
        let mut p = Product::new_for_insert(
            sku.into(),
            sku.into(),
            "Kits".into(),
            "un".into(),
            0.0,
            ProductKind::Kit,
        );
        for (c, q) in components {
            p.add_component(KitComponent {
                component_sku: c.into(),
                qty_per_kit: q,
                unit_price_at_add: 1.0,
            });
        }
        p
    }

    fn line(sku: &str, qty: f64) -> SaleLine {
        SaleLine {
            sku: sku.into(),
            descricao: sku.into(),
            quantity: qty,
            unit_price: 10.0,
        }
    }

    fn setup(products: Vec<Product>) -> (HashMap<String, Product>, HashMap<String, f64>) {
        let stock = products
            .iter()
            .filter(|p| !p.is_kit())
            .map(|p| (p.base.code.clone(), p.quantidade_atual))
            .collect();
        let catalog = products
            .into_iter()
            .map(|p| (p.base.code.clone(), p))
            .collect();
        (catalog, stock)
    }

    #[test]
    fn rejects_line_exceeding_stock_and_names_the_sku() {
        let (catalog, stock) = setup(vec![product("A", 10.0), product("B", 1.0)]);
        // duas linhas, uma coberta e outra não: a venda inteira é rejeitada
        let lines = vec![line("A", 2.0), line("B", 5.0)];
        let err = check_stock(&lines, &catalog, &stock).unwrap_err();
        assert_eq!(err, "estoque insuficiente para o SKU B");
    }

    #[test]
    fn accepts_when_all_lines_covered() {
        let (catalog, stock) = setup(vec![product("A", 10.0)]);
        assert!(check_stock(&[line("A", 10.0)], &catalog, &stock).is_ok());
    }

    #[test]
    fn kit_line_uses_derived_quantity() {
        let (catalog, stock) = setup(vec![
            product("A", 6.0),
            kit("KIT-1", vec![("A", 2.0)]), // deriva 3 kits
        ]);
        assert!(check_stock(&[line("KIT-1", 3.0)], &catalog, &stock).is_ok());
        let err = check_stock(&[line("KIT-1", 4.0)], &catalog, &stock).unwrap_err();
        assert_eq!(err, "estoque insuficiente para o SKU KIT-1");
    }

    #[test]
    fn unknown_sku_is_rejected() {
        let (catalog, stock) = setup(vec![]);
        assert!(check_stock(&[line("X", 1.0)], &catalog, &stock).is_err());
    }
}
