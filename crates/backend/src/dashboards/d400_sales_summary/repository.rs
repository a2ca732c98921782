use anyhow::Result;
use chrono::NaiveDate;
use contracts::domain::a003_sale::SaleLine;
use std::collections::HashMap;

use crate::domain::{a001_product, a003_sale};

/// Fato de venda para os folds do dashboard (apenas leitura)
#[derive(Debug, Clone)]
pub struct SaleFact {
    pub date: NaiveDate,
    pub total: f64,
    pub lines: Vec<SaleLine>,
}

/// Vendas do intervalo [de, ate] (datas "YYYY-MM-DD", inclusivas)
pub async fn fetch_sales(de: &str, ate: &str) -> Result<Vec<SaleFact>> {
    let de_ts = format!("{}T00:00:00+00:00", de);
    let ate_ts = format!("{}T23:59:59.999999+00:00", ate);

    let sales = a003_sale::repository::list_in_range(&de_ts, &ate_ts).await?;
    Ok(sales
        .into_iter()
        .map(|s| SaleFact {
            date: s.sale_date.date_naive(),
            total: s.total,
            lines: s.lines,
        })
        .collect())
}

/// Mapa SKU -> (nome, categoria) do catálogo, para rotular os folds
pub async fn fetch_catalog_labels() -> Result<HashMap<String, (String, String)>> {
    let products = a001_product::repository::list_all().await?;
    Ok(products
        .into_iter()
        .map(|p| {
            (
                p.base.code.clone(),
                (p.base.description.clone(), p.categoria.clone()),
            )
        })
        .collect())
}
