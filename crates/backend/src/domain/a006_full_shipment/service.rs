use anyhow::Result;
use contracts::domain::a001_product::Product;
use contracts::domain::a006_full_shipment::{
    CreateKitAndRelateRequest, FullShipment, FullShipmentItem, KitComponentRef, RelateManualRequest,
    ShipmentGroup,
};
use std::collections::HashMap;
use uuid::Uuid;

use super::repository;
use crate::domain::{a001_product, a007_sku_alias};
use crate::shared::error::DomainError;

/// Resultado de uma linha da importação (item novo ou fundido)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportRowOutcome {
    Imported,
    Merged,
}

/// Garantir o cabeçalho do envio; cria quando ainda não existe.
pub async fn ensure_shipment(shipment_number: &str, client_id: &str) -> Result<FullShipment> {
    let number = shipment_number.trim();
    if number.is_empty() {
        return Err(DomainError::validation("Número do envio não pode ser vazio"));
    }

    if let Some(existing) = repository::get_shipment_by_number(number).await? {
        return Ok(existing);
    }

    let shipment = FullShipment::new_for_insert(number.to_string(), client_id.to_string());
    repository::insert_shipment(&shipment).await?;
    tracing::info!("Created FULL shipment {} for client {}", number, client_id);
    Ok(shipment)
}

/// Inserir uma linha bruta no envio. Linhas com a mesma chave natural
/// (envio, código ML, SKU em texto) são fundidas somando a quantidade,
/// nunca duplicadas.
pub async fn import_row(
    shipment_number: &str,
    ml_code: &str,
    sku_text: &str,
    qty: f64,
) -> Result<ImportRowOutcome> {
    if let Some(mut existing) =
        repository::find_item_by_keys(shipment_number, ml_code, sku_text).await?
    {
        existing.qty += qty;
        existing.before_write();
        repository::update_item(&existing).await?;
        return Ok(ImportRowOutcome::Merged);
    }

    let code = format!("FULL-{}", &Uuid::new_v4().to_string()[..8]);
    let item = FullShipmentItem::new_for_insert(
        code,
        shipment_number.to_string(),
        ml_code.to_string(),
        sku_text.to_string(),
        qty,
    );
    item.validate().map_err(DomainError::validation)?;
    repository::insert_item(&item).await?;
    Ok(ImportRowOutcome::Imported)
}

/// Listagem agrupada por envio, com contagem de pendentes por grupo.
pub async fn list_groups() -> Result<Vec<ShipmentGroup>> {
    let shipments = repository::list_shipments().await?;
    let mut groups = Vec::with_capacity(shipments.len());
    for shipment in &shipments {
        let items = repository::list_items_by_shipment(shipment.shipment_number()).await?;
        groups.push(ShipmentGroup::from_items(shipment, items));
    }
    Ok(groups)
}

pub async fn get_group(shipment_number: &str) -> Result<ShipmentGroup> {
    let shipment = repository::get_shipment_by_number(shipment_number)
        .await?
        .ok_or_else(|| DomainError::not_found("Envio não encontrado"))?;
    let items = repository::list_items_by_shipment(shipment.shipment_number()).await?;
    Ok(ShipmentGroup::from_items(&shipment, items))
}

/// Relacionamento manual: o operador escolhe o SKU do catálogo para um
/// item pendente. Com `learn`, o alias é aprendido para a conciliação
/// automática; falha no aprendizado não desfaz o relacionamento.
pub async fn relate_manual(req: RelateManualRequest) -> Result<()> {
    let item_id = Uuid::parse_str(&req.raw_id)
        .map_err(|_| DomainError::validation("raw_id inválido"))?;

    let mut item = repository::get_item_by_id(item_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Item do envio não encontrado"))?;

    let product = a001_product::repository::get_by_sku(req.stock_sku.trim())
        .await?
        .ok_or_else(|| {
            DomainError::validation(format!("SKU {} não existe no catálogo", req.stock_sku))
        })?;

    item.relate(&product.base.code)
        .map_err(DomainError::validation)?;
    item.before_write();
    repository::update_item(&item).await?;

    tracing::info!(
        "Item {} related to {} (shipment {})",
        req.raw_id,
        product.base.code,
        item.shipment_number
    );

    if req.learn {
        // Fire-and-forget: o relacionamento já está persistido
        if let Err(e) = a007_sku_alias::service::learn(
            &item.sku_text,
            &product.base.code,
            Some(item.shipment_number.clone()),
        )
        .await
        {
            tracing::warn!("Failed to learn alias for {}: {}", item.sku_text, e);
        }
    }

    Ok(())
}

/// Comparar a composição de um kit com a composição pedida, como
/// multiconjunto SKU -> quantidade (somando repetições dos dois lados).
pub fn composition_matches(kit: &Product, wanted: &[KitComponentRef]) -> bool {
    if !kit.is_kit() || wanted.is_empty() {
        return false;
    }

    let mut kit_map: HashMap<String, f64> = HashMap::new();
    for c in &kit.components {
        *kit_map.entry(c.component_sku.trim().to_string()).or_insert(0.0) += c.qty_per_kit;
    }

    let mut wanted_map: HashMap<String, f64> = HashMap::new();
    for c in wanted {
        *wanted_map.entry(c.sku.trim().to_string()).or_insert(0.0) += c.q;
    }

    if kit_map.len() != wanted_map.len() {
        return false;
    }

    kit_map.iter().all(|(sku, qty)| {
        wanted_map
            .get(sku)
            .map(|w| (w - qty).abs() < 1e-9)
            .unwrap_or(false)
    })
}

/// Buscar um kit existente com exatamente a composição dada.
///
/// `None` significa "não encontrado" (não é erro). Havendo mais de um kit
/// com a mesma composição, o de menor SKU vence, para a resposta ser
/// determinística.
pub async fn find_kit_by_composition(
    components: &[KitComponentRef],
) -> Result<Option<String>> {
    if components.is_empty() {
        return Err(DomainError::validation(
            "Busca de kit exige ao menos um componente",
        ));
    }

    let kits = a001_product::repository::list_kits().await?;
    let mut matches: Vec<String> = kits
        .iter()
        .filter(|kit| composition_matches(kit, components))
        .map(|kit| kit.base.code.clone())
        .collect();
    matches.sort();

    Ok(matches.into_iter().next())
}

/// Criar o kit e relacionar o item bruto numa única operação: o chamador
/// não precisa coordenar falha parcial entre as duas etapas.
pub async fn create_kit_and_relate(req: CreateKitAndRelateRequest) -> Result<String> {
    let item_id = Uuid::parse_str(&req.raw_id)
        .map_err(|_| DomainError::validation("raw_id inválido"))?;

    let mut item = repository::get_item_by_id(item_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Item do envio não encontrado"))?;

    if req.kit.nome.trim().is_empty() {
        return Err(DomainError::validation("Nome do kit não pode ser vazio"));
    }

    let component_refs: Vec<(String, f64)> = req
        .components
        .iter()
        .map(|c| (c.sku.trim().to_string(), c.q))
        .collect();

    let sku_kit = a001_product::service::create_kit(
        req.kit.nome.trim(),
        req.kit.categoria.trim(),
        req.kit.preco_unitario,
        &component_refs,
    )
    .await?;

    item.relate(&sku_kit).map_err(DomainError::validation)?;
    item.before_write();
    repository::update_item(&item).await?;

    tracing::info!(
        "Kit {} created and related to item {} (shipment {})",
        sku_kit,
        req.raw_id,
        item.shipment_number
    );

    // Aprender o alias do item para os próximos envios (fire-and-forget)
    if let Err(e) =
        a007_sku_alias::service::learn(&item.sku_text, &sku_kit, Some(item.shipment_number.clone()))
            .await
    {
        tracing::warn!("Failed to learn alias for {}: {}", item.sku_text, e);
    }

    Ok(sku_kit)
}

/// Emitir o envio: estado grosso por envio inteiro, permitido apenas sem
/// itens pendentes.
pub async fn emit(shipment_number: &str) -> Result<()> {
    let shipment = repository::get_shipment_by_number(shipment_number)
        .await?
        .ok_or_else(|| DomainError::not_found("Envio não encontrado"))?;

    if shipment.is_emitted() {
        return Err(DomainError::conflict("Envio já emitido"));
    }

    let items = repository::list_items_by_shipment(shipment_number).await?;
    let pending = items.iter().filter(|i| i.is_pending()).count();
    if pending > 0 {
        return Err(DomainError::conflict(format!(
            "Envio tem {} item(ns) pendente(s) de conciliação",
            pending
        )));
    }

    repository::set_emitted(shipment_number).await?;
    tracing::info!("Shipment {} emitted", shipment_number);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_product::{KitComponent, ProductKind};

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

    fn wanted(refs: Vec<(&str, f64)>) -> Vec<KitComponentRef> {
        refs.into_iter()
            .map(|(sku, q)| KitComponentRef { sku: sku.into(), q })
            .collect()
    }

    #[test]
    fn composition_matches_exact_multiset() {
        let k = kit("KIT-1", vec![("A", 2.0), ("B", 1.0)]);
        assert!(composition_matches(&k, &wanted(vec![("A", 2.0), ("B", 1.0)])));
        // ordem não importa
        assert!(composition_matches(&k, &wanted(vec![("B", 1.0), ("A", 2.0)])));
    }

    #[test]
    fn composition_rejects_different_quantity_or_extra_sku() {
        let k = kit("KIT-1", vec![("A", 2.0), ("B", 1.0)]);
        assert!(!composition_matches(&k, &wanted(vec![("A", 3.0), ("B", 1.0)])));
        assert!(!composition_matches(&k, &wanted(vec![("A", 2.0)])));
        assert!(!composition_matches(
            &k,
            &wanted(vec![("A", 2.0), ("B", 1.0), ("C", 1.0)])
        ));
    }

    #[test]
    fn composition_sums_repeated_skus_on_both_sides() {
        // pedido repete o mesmo SKU: (A,1) + (A,1) equivale a (A,2)
        let k = kit("KIT-1", vec![("A", 2.0)]);
        assert!(composition_matches(&k, &wanted(vec![("A", 1.0), ("A", 1.0)])));
    }

    #[test]
    fn composition_never_matches_simple_product_or_empty_query() {
        let simple = Product::new_for_insert(
            "P-1".into(),
            "Produto".into(),
            "Geral".into(),
            "un".into(),
            1.0,
            ProductKind::Simples,
        );
        assert!(!composition_matches(&simple, &wanted(vec![("A", 1.0)])));

        let k = kit("KIT-1", vec![("A", 2.0)]);
        assert!(!composition_matches(&k, &[]));
    }
}
