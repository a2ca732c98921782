use anyhow::Result;
use contracts::dashboards::d401_customer_balances::{
    CustomerBalanceRow, CustomerBalancesResponse, CustomerStatementResponse, StatementEntry,
};
use std::collections::HashMap;

use super::repository::{self, LedgerFact};

/// Saldos por cliente: vendas − pagamentos, junção pelo nome com igualdade
/// EXATA (case-sensitive). O sinal não é truncado: saldo negativo significa
/// pagamento a maior. Fold puro sobre os lançamentos.
pub fn fold_balances(sales: &[LedgerFact], payments: &[LedgerFact]) -> Vec<CustomerBalanceRow> {
    let mut totals: HashMap<String, (f64, f64)> = HashMap::new();

    for sale in sales {
        totals.entry(sale.customer_name.clone()).or_insert((0.0, 0.0)).0 += sale.amount;
    }
    for payment in payments {
        totals
            .entry(payment.customer_name.clone())
            .or_insert((0.0, 0.0))
            .1 += payment.amount;
    }

    let mut rows: Vec<CustomerBalanceRow> = totals
        .into_iter()
        .map(|(customer_name, (total_sales, total_payments))| CustomerBalanceRow {
            customer_name,
            total_sales,
            total_payments,
            balance: total_sales - total_payments,
        })
        .collect();
    rows.sort_by(|a, b| a.customer_name.cmp(&b.customer_name));
    rows
}

/// Extrato de um cliente: vendas (débito) e pagamentos (crédito)
/// intercalados por data, com saldo acumulado.
pub fn fold_statement(sales: &[LedgerFact], payments: &[LedgerFact]) -> Vec<StatementEntry> {
    let mut entries: Vec<StatementEntry> = Vec::with_capacity(sales.len() + payments.len());

    for sale in sales {
        entries.push(StatementEntry {
            kind: "venda".to_string(),
            code: sale.code.clone(),
            date: sale.date,
            amount: sale.amount,
            balance_after: 0.0,
        });
    }
    for payment in payments {
        entries.push(StatementEntry {
            kind: "pagamento".to_string(),
            code: payment.code.clone(),
            date: payment.date,
            amount: -payment.amount,
            balance_after: 0.0,
        });
    }

    entries.sort_by(|a, b| a.date.cmp(&b.date));

    let mut balance = 0.0;
    for entry in &mut entries {
        balance += entry.amount;
        entry.balance_after = balance;
    }

    entries
}

pub async fn balances() -> Result<CustomerBalancesResponse> {
    let sales = repository::fetch_sales().await?;
    let payments = repository::fetch_payments().await?;
    Ok(CustomerBalancesResponse {
        rows: fold_balances(&sales, &payments),
    })
}

pub async fn statement(customer_name: &str) -> Result<CustomerStatementResponse> {
    let sales = repository::fetch_sales_by_customer(customer_name).await?;
    let payments = repository::fetch_payments_by_customer(customer_name).await?;
    let entries = fold_statement(&sales, &payments);
    let final_balance = entries.last().map(|e| e.balance_after).unwrap_or(0.0);

    Ok(CustomerStatementResponse {
        customer_name: customer_name.to_string(),
        entries,
        final_balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ledger(customer: &str, code: &str, day: u32, amount: f64) -> LedgerFact {
        LedgerFact {
            customer_name: customer.to_string(),
            code: code.to_string(),
            date: Utc.with_ymd_and_hms(2026, 1, day, 12, 0, 0).unwrap(),
            amount,
        }
    }

    #[test]
    fn balance_is_sales_minus_payments_unclamped() {
        let sales = vec![ledger("Maria", "VND-1", 1, 100.0)];
        let payments = vec![ledger("Maria", "PAG-1", 2, 150.0)];
        let rows = fold_balances(&sales, &payments);
        assert_eq!(rows.len(), 1);
        // pagamento a maior: saldo negativo, sem truncar
        assert!((rows[0].balance + 50.0).abs() < 1e-9);
    }

    #[test]
    fn names_differing_only_in_case_are_distinct_customers() {
        // comportamento herdado: a junção de saldos é case-sensitive,
        // diferente da lista de clientes de importação (sem caixa)
        let sales = vec![
            ledger("Maria", "VND-1", 1, 100.0),
            ledger("maria", "VND-2", 2, 40.0),
        ];
        let rows = fold_balances(&sales, &[]);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn statement_interleaves_by_date_with_running_balance() {
        let sales = vec![
            ledger("Maria", "VND-1", 1, 100.0),
            ledger("Maria", "VND-2", 5, 30.0),
        ];
        let payments = vec![ledger("Maria", "PAG-1", 3, 60.0)];
        let entries = fold_statement(&sales, &payments);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].code, "VND-1");
        assert!((entries[0].balance_after - 100.0).abs() < 1e-9);
        assert_eq!(entries[1].code, "PAG-1");
        assert!((entries[1].balance_after - 40.0).abs() < 1e-9);
        assert_eq!(entries[2].code, "VND-2");
        assert!((entries[2].balance_after - 70.0).abs() < 1e-9);
    }
}
