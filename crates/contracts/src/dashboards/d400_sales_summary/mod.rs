use serde::{Deserialize, Serialize};

/// Granularidade dos buckets da série de faturamento
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Granularity {
    #[default]
    #[serde(rename = "month")]
    Month,
    #[serde(rename = "day")]
    Day,
}

/// Requisição da série de faturamento por período
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueSeriesRequest {
    /// Início do intervalo, "YYYY-MM-DD"
    pub de: String,
    /// Fim do intervalo, "YYYY-MM-DD"
    pub ate: String,
    #[serde(default)]
    pub granularidade: Granularity,
}

/// Bucket da série de faturamento
///
/// Todo período-calendário do intervalo gera um bucket, mesmo sem vendas
/// (valor zero), para a série do gráfico ser contígua.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevenueBucket {
    /// "YYYY-MM" (mês) ou "YYYY-MM-DD" (dia)
    pub period: String,
    /// Soma dos totais das vendas do período
    pub total: f64,
    /// Quantidade de vendas no período
    pub count: i64,
}

/// Resposta da série de faturamento
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueSeriesResponse {
    pub de: String,
    pub ate: String,
    pub granularidade: Granularity,
    pub buckets: Vec<RevenueBucket>,
}

/// Linha do ranking de produtos por quantidade vendida
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopProductRow {
    pub sku: String,
    pub nome: String,
    /// Quantidade total vendida no intervalo
    #[serde(rename = "quantidade")]
    pub quantity: f64,
    /// Faturamento do SKU no intervalo
    #[serde(rename = "faturamento")]
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopProductsResponse {
    pub de: String,
    pub ate: String,
    pub rows: Vec<TopProductRow>,
}

/// Fatia da participação por categoria
///
/// Categorias de cauda longa (abaixo do limiar de participação ou além do
/// teto de fatias) são dobradas em "Outros".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryShareRow {
    pub categoria: String,
    pub total: f64,
    /// Participação no total (0.0–1.0)
    #[serde(rename = "participacao")]
    pub share: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySharesResponse {
    pub de: String,
    pub ate: String,
    pub rows: Vec<CategoryShareRow>,
}
