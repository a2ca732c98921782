use anyhow::Result;
use contracts::dashboards::d400_sales_summary::RevenueBucket;

/// Serializa a série de faturamento em CSV para download.
/// Arquivo de saída apenas; nada é lido de volta pela aplicação.
pub fn revenue_series_csv(buckets: &[RevenueBucket]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["periodo", "total", "vendas"])?;
    for bucket in buckets {
        wtr.write_record([
            bucket.period.clone(),
            format!("{:.2}", bucket.total),
            bucket.count.to_string(),
        ])?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("csv flush failed: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_has_header_and_zero_buckets() {
        let buckets = vec![
            RevenueBucket {
                period: "2026-01".into(),
                total: 0.0,
                count: 0,
            },
            RevenueBucket {
                period: "2026-02".into(),
                total: 150.5,
                count: 3,
            },
        ];
        let out = revenue_series_csv(&buckets).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "periodo,total,vendas");
        assert_eq!(lines[1], "2026-01,0.00,0");
        assert_eq!(lines[2], "2026-02,150.50,3");
    }
}
