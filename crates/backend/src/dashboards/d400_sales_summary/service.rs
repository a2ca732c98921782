use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use contracts::dashboards::d400_sales_summary::{
    CategoryShareRow, CategorySharesResponse, Granularity, RevenueBucket, RevenueSeriesRequest,
    RevenueSeriesResponse, TopProductRow, TopProductsResponse,
};
use std::collections::HashMap;

use super::repository::{self, SaleFact};
use crate::shared::error::DomainError;

/// Participação mínima para uma categoria não ser dobrada em "Outros"
const CATEGORY_SHARE_THRESHOLD: f64 = 0.02;
/// Máximo de fatias individuais no gráfico de categorias
const CATEGORY_MAX_SLICES: usize = 8;
/// Tamanho padrão do ranking de produtos
const DEFAULT_TOP_N: usize = 5;

fn parse_date(s: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| DomainError::validation(format!("Data inválida em \"{}\": {}", field, s)))
}

/// Todos os períodos-calendário "YYYY-MM" do intervalo, em ordem
fn month_periods(from: NaiveDate, to: NaiveDate) -> Vec<String> {
    let mut periods = Vec::new();
    let mut year = from.year();
    let mut month = from.month();
    loop {
        let current = match NaiveDate::from_ymd_opt(year, month, 1) {
            Some(d) => d,
            None => break,
        };
        if current > to {
            break;
        }
        periods.push(format!("{:04}-{:02}", year, month));
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    periods
}

/// Todos os dias "YYYY-MM-DD" do intervalo, em ordem
fn day_periods(from: NaiveDate, to: NaiveDate) -> Vec<String> {
    let mut periods = Vec::new();
    let mut current = from;
    while current <= to {
        periods.push(current.format("%Y-%m-%d").to_string());
        current = current + Duration::days(1);
    }
    periods
}

fn bucket_key(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Month => format!("{:04}-{:02}", date.year(), date.month()),
        Granularity::Day => date.format("%Y-%m-%d").to_string(),
    }
}

/// Série de faturamento por período.
///
/// Fold puro: as entradas não são alteradas; todo período do intervalo
/// vira bucket, com zero quando não há vendas, para a série ser contígua.
pub fn revenue_series(
    facts: &[SaleFact],
    granularity: Granularity,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<RevenueBucket> {
    let periods = match granularity {
        Granularity::Month => month_periods(from, to),
        Granularity::Day => day_periods(from, to),
    };

    let mut totals: HashMap<String, (f64, i64)> = HashMap::new();
    for fact in facts {
        if fact.date < from || fact.date > to {
            continue;
        }
        let key = bucket_key(fact.date, granularity);
        let entry = totals.entry(key).or_insert((0.0, 0));
        entry.0 += fact.total;
        entry.1 += 1;
    }

    periods
        .into_iter()
        .map(|period| {
            let (total, count) = totals.get(&period).copied().unwrap_or((0.0, 0));
            RevenueBucket {
                period,
                total,
                count,
            }
        })
        .collect()
}

/// Ranking de produtos por quantidade vendida.
///
/// Empates preservam a ordem de primeira aparição nas vendas (sort
/// estável).
pub fn top_products(
    facts: &[SaleFact],
    labels: &HashMap<String, (String, String)>,
    n: usize,
) -> Vec<TopProductRow> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, (f64, f64)> = HashMap::new();

    for fact in facts {
        for line in &fact.lines {
            if !totals.contains_key(&line.sku) {
                order.push(line.sku.clone());
            }
            let entry = totals.entry(line.sku.clone()).or_insert((0.0, 0.0));
            entry.0 += line.quantity;
            entry.1 += line.subtotal();
        }
    }

    let mut rows: Vec<TopProductRow> = order
        .into_iter()
        .map(|sku| {
            let (quantity, revenue) = totals[&sku];
            let nome = labels
                .get(&sku)
                .map(|(nome, _)| nome.clone())
                .unwrap_or_else(|| sku.clone());
            TopProductRow {
                sku,
                nome,
                quantity,
                revenue,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.quantity
            .partial_cmp(&a.quantity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows.truncate(n);
    rows
}

/// Participação por categoria com dobra de cauda longa.
///
/// Categorias abaixo do limiar de participação, ou além do teto de fatias,
/// somam em "Outros" para o gráfico continuar legível.
pub fn category_shares(
    facts: &[SaleFact],
    labels: &HashMap<String, (String, String)>,
) -> Vec<CategoryShareRow> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, f64> = HashMap::new();

    for fact in facts {
        for line in &fact.lines {
            let categoria = labels
                .get(&line.sku)
                .map(|(_, cat)| cat.clone())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "Sem categoria".to_string());
            if !totals.contains_key(&categoria) {
                order.push(categoria.clone());
            }
            *totals.entry(categoria).or_insert(0.0) += line.subtotal();
        }
    }

    let grand_total: f64 = totals.values().sum();
    if grand_total <= 0.0 {
        return Vec::new();
    }

    let mut rows: Vec<CategoryShareRow> = order
        .into_iter()
        .map(|categoria| {
            let total = totals[&categoria];
            CategoryShareRow {
                categoria,
                total,
                share: total / grand_total,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept = Vec::new();
    let mut outros_total = 0.0;
    for (idx, row) in rows.into_iter().enumerate() {
        if idx < CATEGORY_MAX_SLICES && row.share >= CATEGORY_SHARE_THRESHOLD {
            kept.push(row);
        } else {
            outros_total += row.total;
        }
    }

    if outros_total > 0.0 {
        kept.push(CategoryShareRow {
            categoria: "Outros".to_string(),
            total: outros_total,
            share: outros_total / grand_total,
        });
    }

    kept
}

// ============================================================================
// Endpoints
// ============================================================================

pub async fn revenue_series_range(request: RevenueSeriesRequest) -> Result<RevenueSeriesResponse> {
    let from = parse_date(&request.de, "de")?;
    let to = parse_date(&request.ate, "ate")?;
    if from > to {
        return Err(DomainError::validation("Intervalo invertido: de > ate"));
    }

    let facts = repository::fetch_sales(&request.de, &request.ate).await?;
    let buckets = revenue_series(&facts, request.granularidade, from, to);

    Ok(RevenueSeriesResponse {
        de: request.de,
        ate: request.ate,
        granularidade: request.granularidade,
        buckets,
    })
}

pub async fn top_products_range(
    de: String,
    ate: String,
    n: Option<usize>,
) -> Result<TopProductsResponse> {
    parse_date(&de, "de")?;
    parse_date(&ate, "ate")?;

    let facts = repository::fetch_sales(&de, &ate).await?;
    let labels = repository::fetch_catalog_labels().await?;
    let rows = top_products(&facts, &labels, n.unwrap_or(DEFAULT_TOP_N));

    Ok(TopProductsResponse { de, ate, rows })
}

pub async fn category_shares_range(de: String, ate: String) -> Result<CategorySharesResponse> {
    parse_date(&de, "de")?;
    parse_date(&ate, "ate")?;

    let facts = repository::fetch_sales(&de, &ate).await?;
    let labels = repository::fetch_catalog_labels().await?;
    let rows = category_shares(&facts, &labels);

    Ok(CategorySharesResponse { de, ate, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a003_sale::SaleLine;

    fn fact(date: &str, total: f64, lines: Vec<(&str, f64, f64)>) -> SaleFact {
        SaleFact {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            total,
            lines: lines
                .into_iter()
                .map(|(sku, qty, price)| SaleLine {
                    sku: sku.into(),
                    descricao: sku.into(),
                    quantity: qty,
                    unit_price: price,
                })
                .collect(),
        }
    }

    fn labels(entries: &[(&str, &str, &str)]) -> HashMap<String, (String, String)> {
        entries
            .iter()
            .map(|(sku, nome, cat)| (sku.to_string(), (nome.to_string(), cat.to_string())))
            .collect()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn month_series_is_contiguous_with_zero_buckets() {
        // vendas só em fevereiro; jan-mar gera 3 buckets, jan=0 e mar=0
        let facts = vec![
            fact("2026-02-10", 100.0, vec![]),
            fact("2026-02-20", 50.0, vec![]),
        ];
        let buckets = revenue_series(
            &facts,
            Granularity::Month,
            date("2026-01-01"),
            date("2026-03-31"),
        );
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0], RevenueBucket { period: "2026-01".into(), total: 0.0, count: 0 });
        assert_eq!(buckets[1].period, "2026-02");
        assert!((buckets[1].total - 150.0).abs() < 1e-9);
        assert_eq!(buckets[1].count, 2);
        assert_eq!(buckets[2], RevenueBucket { period: "2026-03".into(), total: 0.0, count: 0 });
    }

    #[test]
    fn month_series_crosses_year_boundary() {
        let buckets = revenue_series(
            &[],
            Granularity::Month,
            date("2025-11-15"),
            date("2026-02-01"),
        );
        let periods: Vec<&str> = buckets.iter().map(|b| b.period.as_str()).collect();
        assert_eq!(periods, vec!["2025-11", "2025-12", "2026-01", "2026-02"]);
    }

    #[test]
    fn day_series_emits_every_day() {
        let facts = vec![fact("2026-01-02", 10.0, vec![])];
        let buckets = revenue_series(
            &facts,
            Granularity::Day,
            date("2026-01-01"),
            date("2026-01-03"),
        );
        assert_eq!(buckets.len(), 3);
        assert!((buckets[1].total - 10.0).abs() < 1e-9);
        assert_eq!(buckets[0].total, 0.0);
        assert_eq!(buckets[2].total, 0.0);
    }

    #[test]
    fn sales_outside_range_are_ignored() {
        let facts = vec![fact("2026-05-01", 999.0, vec![])];
        let buckets = revenue_series(
            &facts,
            Granularity::Month,
            date("2026-01-01"),
            date("2026-01-31"),
        );
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].total, 0.0);
    }

    #[test]
    fn top_products_sums_by_sku_and_is_stable_on_ties() {
        let facts = vec![
            fact("2026-01-01", 0.0, vec![("A", 2.0, 10.0), ("B", 5.0, 1.0)]),
            fact("2026-01-02", 0.0, vec![("C", 5.0, 1.0), ("A", 1.0, 10.0)]),
        ];
        let rows = top_products(&facts, &labels(&[]), 5);
        // A=3, B=5, C=5; empate B/C resolve pela primeira aparição (B antes)
        assert_eq!(rows[0].sku, "B");
        assert_eq!(rows[1].sku, "C");
        assert_eq!(rows[2].sku, "A");
        assert!((rows[2].quantity - 3.0).abs() < 1e-9);
        assert!((rows[2].revenue - 30.0).abs() < 1e-9);
    }

    #[test]
    fn top_products_takes_first_n() {
        let facts = vec![fact(
            "2026-01-01",
            0.0,
            vec![("A", 5.0, 1.0), ("B", 4.0, 1.0), ("C", 3.0, 1.0)],
        )];
        let rows = top_products(&facts, &labels(&[]), 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sku, "A");
        assert_eq!(rows[1].sku, "B");
    }

    #[test]
    fn categories_all_above_threshold_stay_separate() {
        // participações 50/30/15/5 com limiar de 2% e teto 8: nada dobra
        let facts = vec![fact(
            "2026-01-01",
            0.0,
            vec![
                ("A", 1.0, 50.0),
                ("B", 1.0, 30.0),
                ("C", 1.0, 15.0),
                ("D", 1.0, 5.0),
            ],
        )];
        let l = labels(&[
            ("A", "A", "Cat A"),
            ("B", "B", "Cat B"),
            ("C", "C", "Cat C"),
            ("D", "D", "Cat D"),
        ]);
        let rows = category_shares(&facts, &l);
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.categoria != "Outros"));
    }

    #[test]
    fn long_tail_categories_fold_into_outros() {
        // participações 97/1/1/1: as três de 1% viram "Outros" = 3%
        let facts = vec![fact(
            "2026-01-01",
            0.0,
            vec![
                ("A", 1.0, 97.0),
                ("B", 1.0, 1.0),
                ("C", 1.0, 1.0),
                ("D", 1.0, 1.0),
            ],
        )];
        let l = labels(&[
            ("A", "A", "Cat A"),
            ("B", "B", "Cat B"),
            ("C", "C", "Cat C"),
            ("D", "D", "Cat D"),
        ]);
        let rows = category_shares(&facts, &l);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].categoria, "Cat A");
        let outros = &rows[1];
        assert_eq!(outros.categoria, "Outros");
        assert!((outros.total - 3.0).abs() < 1e-9);
        assert!((outros.share - 0.03).abs() < 1e-9);
    }

    #[test]
    fn slice_cap_folds_even_above_threshold() {
        // 10 categorias de 10%: além da 8a fatia dobra mesmo acima do limiar
        let lines: Vec<(String, f64, f64)> = (0..10)
            .map(|i| (format!("S{}", i), 1.0, 10.0))
            .collect();
        let facts = vec![SaleFact {
            date: date("2026-01-01"),
            total: 0.0,
            lines: lines
                .iter()
                .map(|(sku, q, p)| SaleLine {
                    sku: sku.clone(),
                    descricao: sku.clone(),
                    quantity: *q,
                    unit_price: *p,
                })
                .collect(),
        }];
        let l: HashMap<String, (String, String)> = (0..10)
            .map(|i| {
                (
                    format!("S{}", i),
                    (format!("S{}", i), format!("Cat {}", i)),
                )
            })
            .collect();
        let rows = category_shares(&facts, &l);
        assert_eq!(rows.len(), 9); // 8 fatias + Outros
        assert_eq!(rows.last().unwrap().categoria, "Outros");
        assert!((rows.last().unwrap().total - 20.0).abs() < 1e-9);
    }

    #[test]
    fn inputs_are_not_mutated() {
        let facts = vec![fact("2026-01-01", 10.0, vec![("A", 1.0, 10.0)])];
        let before = facts[0].lines.clone();
        let _ = revenue_series(
            &facts,
            Granularity::Month,
            date("2026-01-01"),
            date("2026-01-31"),
        );
        let _ = top_products(&facts, &labels(&[]), 5);
        let _ = category_shares(&facts, &labels(&[]));
        assert_eq!(facts[0].lines, before);
    }
}
