use anyhow::{Context, Result};
use serde::Deserialize;

use crate::shared::config::MeliConfig;

const PAGE_SIZE: usize = 50;

/// Cliente HTTP da API do Mercado Livre (somente leitura de envios FULL)
pub struct MeliClient {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PagedResponse {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

impl MeliClient {
    pub fn from_config(config: &MeliConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        }
    }

    /// Buscar as linhas brutas de um envio FULL, paginadas.
    ///
    /// As linhas voltam como JSON cru; a normalização de nomes de campo é
    /// feita adiante, na fronteira de importação (u501).
    pub async fn fetch_shipment_rows(
        &self,
        shipment_number: &str,
    ) -> Result<Vec<serde_json::Value>> {
        let token = self
            .access_token
            .as_deref()
            .context("importação via API indisponível: access token do Mercado Livre não configurado")?;

        let mut rows = Vec::new();
        let mut offset = 0usize;

        loop {
            let url = format!(
                "{}/fulfillments/shipments/{}/items?limit={}&offset={}",
                self.base_url,
                urlencoding::encode(shipment_number.trim()),
                PAGE_SIZE,
                offset
            );

            let response = self
                .http
                .get(&url)
                .bearer_auth(token)
                .send()
                .await
                .context("falha na chamada à API do Mercado Livre")?;

            if !response.status().is_success() {
                anyhow::bail!(
                    "API do Mercado Livre respondeu {} para o envio {}",
                    response.status(),
                    shipment_number
                );
            }

            let page: PagedResponse = response
                .json()
                .await
                .context("resposta inesperada da API do Mercado Livre")?;

            let fetched = page.results.len();
            rows.extend(page.results);

            if fetched < PAGE_SIZE {
                break;
            }
            offset += PAGE_SIZE;
        }

        tracing::info!(
            "Fetched {} rows for shipment {} from Mercado Livre",
            rows.len(),
            shipment_number
        );

        Ok(rows)
    }
}
