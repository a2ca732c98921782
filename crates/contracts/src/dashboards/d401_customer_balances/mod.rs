use serde::{Deserialize, Serialize};

/// Saldo em aberto de um cliente
///
/// `balance = vendas - pagamentos`, junção pelo nome com igualdade exata;
/// o sinal não é truncado (negativo significa pagamento a maior).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerBalanceRow {
    #[serde(rename = "clienteNome")]
    pub customer_name: String,
    #[serde(rename = "totalVendas")]
    pub total_sales: f64,
    #[serde(rename = "totalPagamentos")]
    pub total_payments: f64,
    #[serde(rename = "saldo")]
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerBalancesResponse {
    pub rows: Vec<CustomerBalanceRow>,
}

/// Lançamento do extrato de um cliente (vendas e pagamentos intercalados
/// por data)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementEntry {
    /// "venda" ou "pagamento"
    pub kind: String,
    pub code: String,
    pub date: chrono::DateTime<chrono::Utc>,
    /// Positivo para venda, negativo para pagamento
    pub amount: f64,
    /// Saldo acumulado após o lançamento
    #[serde(rename = "saldoApos")]
    pub balance_after: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerStatementResponse {
    #[serde(rename = "clienteNome")]
    pub customer_name: String,
    pub entries: Vec<StatementEntry>,
    #[serde(rename = "saldoFinal")]
    pub final_balance: f64,
}
