use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::domain::{a003_sale, a004_payment};

/// Lançamento de venda ou pagamento para os folds de saldo
#[derive(Debug, Clone)]
pub struct LedgerFact {
    pub customer_name: String,
    pub code: String,
    pub date: DateTime<Utc>,
    pub amount: f64,
}

pub async fn fetch_sales() -> Result<Vec<LedgerFact>> {
    let sales = a003_sale::repository::list_all().await?;
    Ok(sales
        .into_iter()
        .map(|s| LedgerFact {
            customer_name: s.customer_name.clone(),
            code: s.base.code.clone(),
            date: s.sale_date,
            amount: s.total,
        })
        .collect())
}

pub async fn fetch_payments() -> Result<Vec<LedgerFact>> {
    let payments = a004_payment::repository::list_all().await?;
    Ok(payments
        .into_iter()
        .map(|p| LedgerFact {
            customer_name: p.customer_name.clone(),
            code: p.base.code.clone(),
            date: p.payment_date,
            amount: p.amount,
        })
        .collect())
}

pub async fn fetch_sales_by_customer(customer_name: &str) -> Result<Vec<LedgerFact>> {
    let sales = a003_sale::repository::list_by_customer(customer_name).await?;
    Ok(sales
        .into_iter()
        .map(|s| LedgerFact {
            customer_name: s.customer_name.clone(),
            code: s.base.code.clone(),
            date: s.sale_date,
            amount: s.total,
        })
        .collect())
}

pub async fn fetch_payments_by_customer(customer_name: &str) -> Result<Vec<LedgerFact>> {
    let payments = a004_payment::repository::list_by_customer(customer_name).await?;
    Ok(payments
        .into_iter()
        .map(|p| LedgerFact {
            customer_name: p.customer_name.clone(),
            code: p.base.code.clone(),
            date: p.payment_date,
            amount: p.amount,
        })
        .collect())
}
