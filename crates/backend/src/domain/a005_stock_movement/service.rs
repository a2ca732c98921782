use anyhow::Result;
use contracts::domain::a005_stock_movement::{MovementKind, StockMovement};
use uuid::Uuid;

use super::repository;
use crate::domain::a001_product;
use crate::shared::error::DomainError;

fn generate_code() -> String {
    format!("MOV-{}", &Uuid::new_v4().to_string()[..8])
}

/// Registrar uma entrada de estoque; devolve o saldo resultante.
pub async fn register_entrada(
    sku: &str,
    quantidade: f64,
    origem_tabela: &str,
    origem_id: Option<String>,
    observacao: Option<String>,
) -> Result<f64> {
    register(
        sku,
        MovementKind::Entrada,
        quantidade,
        origem_tabela,
        origem_id,
        observacao,
    )
    .await
}

/// Registrar uma saída de estoque; devolve o saldo resultante.
/// Saídas maiores que o saldo atual são rejeitadas antes de qualquer escrita.
pub async fn register_saida(
    sku: &str,
    quantidade: f64,
    origem_tabela: &str,
    origem_id: Option<String>,
    observacao: Option<String>,
) -> Result<f64> {
    register(
        sku,
        MovementKind::Saida,
        quantidade,
        origem_tabela,
        origem_id,
        observacao,
    )
    .await
}

async fn register(
    sku: &str,
    kind: MovementKind,
    quantidade: f64,
    origem_tabela: &str,
    origem_id: Option<String>,
    observacao: Option<String>,
) -> Result<f64> {
    let sku = sku.trim();
    if quantidade <= 0.0 {
        return Err(DomainError::validation(
            "Quantidade deve ser maior que zero",
        ));
    }

    let product = a001_product::repository::get_by_sku(sku)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("SKU {} não encontrado", sku)))?;

    // O estoque de kit é derivado da composição; movimentar o kit em si
    // não tem significado.
    if product.is_kit() {
        return Err(DomainError::validation(format!(
            "SKU {} é um kit e não pode ser movimentado diretamente",
            sku
        )));
    }

    let saldo_atual = product.quantidade_atual;
    let novo_saldo = match kind {
        MovementKind::Entrada => saldo_atual + quantidade,
        MovementKind::Saida => {
            if quantidade > saldo_atual {
                return Err(DomainError::validation(format!(
                    "estoque insuficiente para o SKU {}",
                    sku
                )));
            }
            saldo_atual - quantidade
        }
    };

    let movement = StockMovement::new_for_insert(
        generate_code(),
        sku.to_string(),
        kind,
        quantidade,
        origem_tabela.to_string(),
        origem_id,
        observacao,
        novo_saldo,
    );
    movement.validate().map_err(DomainError::validation)?;

    a001_product::repository::update_quantidade(sku, novo_saldo).await?;
    repository::insert(&movement).await?;

    tracing::info!(
        "Stock {} registered: {} x {} (saldo {} -> {})",
        movement.kind.as_str(),
        quantidade,
        sku,
        saldo_atual,
        novo_saldo
    );

    Ok(novo_saldo)
}

pub async fn list_by_sku(sku: &str) -> Result<Vec<StockMovement>> {
    repository::list_by_sku(sku.trim()).await
}

pub async fn list_recent(limit: u64) -> Result<Vec<StockMovement>> {
    repository::list_recent(limit).await
}
