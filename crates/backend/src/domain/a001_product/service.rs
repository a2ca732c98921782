use anyhow::Result;
use contracts::domain::a001_product::{EstoqueRow, KitComponent, Product, ProductDto, ProductKind};
use std::collections::HashMap;
use uuid::Uuid;

use super::repository;
use crate::shared::error::DomainError;

pub async fn create(dto: ProductDto) -> Result<Uuid> {
    let sku = dto
        .sku
        .clone()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DomainError::validation("SKU é obrigatório"))?;

    if repository::get_by_sku(&sku).await?.is_some() {
        return Err(DomainError::conflict(format!("SKU {} já cadastrado", sku)));
    }

    let mut aggregate = Product::new_for_insert(
        sku,
        dto.nome.clone(),
        dto.categoria.clone().unwrap_or_default(),
        dto.unidade_medida.clone().unwrap_or_else(|| "un".into()),
        dto.preco_unitario.unwrap_or(0.0),
        dto.tipo_produto.unwrap_or_default(),
    );
    aggregate.base.comment = dto.comment.clone();
    if let Some(components) = &dto.components {
        for c in components {
            aggregate.add_component(c.clone());
        }
    }

    aggregate
        .validate()
        .map_err(DomainError::validation)?;
    if aggregate.is_kit() {
        validate_kit_components(&aggregate.components).await?;
    }
    aggregate.before_write();

    repository::insert(&aggregate).await
}

pub async fn update(dto: ProductDto) -> Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| DomainError::validation("ID inválido"))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Produto não encontrado"))?;

    aggregate.update(&dto);

    aggregate
        .validate()
        .map_err(DomainError::validation)?;
    if aggregate.is_kit() {
        validate_kit_components(&aggregate.components).await?;
    }
    aggregate.before_write();

    repository::update(&aggregate).await
}

pub async fn delete(id: Uuid) -> Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> Result<Option<Product>> {
    repository::get_by_id(id).await
}

pub async fn get_by_sku(sku: &str) -> Result<Option<Product>> {
    repository::get_by_sku(sku).await
}

pub async fn list_all() -> Result<Vec<Product>> {
    repository::list_all().await
}

/// Checagens de composição que dependem do catálogo: todo componente deve
/// existir e não pode ser ele próprio um kit (kits aninhados não existem).
pub async fn validate_kit_components(components: &[KitComponent]) -> Result<()> {
    for c in components {
        let product = repository::get_by_sku(&c.component_sku)
            .await?
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "Componente {} não existe no catálogo",
                    c.component_sku
                ))
            })?;
        if product.is_kit() {
            return Err(DomainError::validation(format!(
                "Componente {} é um kit; kits não podem conter kits",
                c.component_sku
            )));
        }
    }
    Ok(())
}

/// Snapshot de saldo dos produtos simples: SKU -> quantidade_atual.
/// É a entrada da derivação de quantidade dos kits.
pub async fn current_stock_map() -> Result<HashMap<String, f64>> {
    let products = repository::list_all().await?;
    Ok(products
        .into_iter()
        .filter(|p| !p.is_kit())
        .map(|p| (p.base.code.clone(), p.quantidade_atual))
        .collect())
}

/// Listagem do contrato legado GET /api/estoque. Kits reportam a
/// quantidade derivada, nunca a coluna armazenada.
pub async fn estoque_rows() -> Result<Vec<EstoqueRow>> {
    let products = repository::list_all().await?;
    let stock: HashMap<String, f64> = products
        .iter()
        .filter(|p| !p.is_kit())
        .map(|p| (p.base.code.clone(), p.quantidade_atual))
        .collect();

    let mut rows: Vec<EstoqueRow> = products
        .iter()
        .map(|p| EstoqueRow {
            sku: p.base.code.clone(),
            nome: p.base.description.clone(),
            categoria: p.categoria.clone(),
            tipo_produto: p.kind.as_str().to_string(),
            quantidade_atual: p.effective_quantity(&stock),
            unidade_medida: p.unidade_medida.clone(),
            preco_unitario: p.preco_unitario,
        })
        .collect();
    rows.sort_by(|a, b| a.sku.cmp(&b.sku));
    Ok(rows)
}

/// Criar um kit a partir da conciliação FULL: SKU gerado, componentes com
/// preço congelado no momento da criação.
pub async fn create_kit(
    nome: &str,
    categoria: &str,
    preco_unitario: f64,
    component_refs: &[(String, f64)],
) -> Result<String> {
    if component_refs.is_empty() {
        return Err(DomainError::validation("Kit deve ter ao menos um componente"));
    }

    let sku = generate_kit_sku();
    let mut kit = Product::new_for_insert(
        sku.clone(),
        nome.to_string(),
        categoria.to_string(),
        "un".to_string(),
        preco_unitario,
        ProductKind::Kit,
    );

    for (component_sku, qty) in component_refs {
        let component = repository::get_by_sku(component_sku)
            .await?
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "Componente {} não existe no catálogo",
                    component_sku
                ))
            })?;
        if component.is_kit() {
            return Err(DomainError::validation(format!(
                "Componente {} é um kit; kits não podem conter kits",
                component_sku
            )));
        }
        kit.add_component(KitComponent {
            component_sku: component.base.code.clone(),
            qty_per_kit: *qty,
            unit_price_at_add: component.preco_unitario,
        });
    }

    kit.validate().map_err(DomainError::validation)?;
    kit.before_write();
    repository::insert(&kit).await?;

    Ok(sku)
}

fn generate_kit_sku() -> String {
    let suffix = Uuid::new_v4().to_string();
    format!("KIT-{}", suffix[..8].to_uppercase())
}
