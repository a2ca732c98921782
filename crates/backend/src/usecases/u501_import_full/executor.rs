use super::normalization::{canonical_row, CanonicalFullRow};
use super::progress_tracker::ProgressTracker;
use anyhow::Result;
use async_trait::async_trait;
use contracts::usecases::u501_import_full::{
    progress::ImportStatus,
    request::{ImportRequest, ImportSource},
    response::{ImportResponse, ImportStartStatus},
};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{a002_customer, a006_full_shipment};
use crate::shared::config;
use crate::shared::meli::client::MeliClient;

/// Fonte de linhas brutas para a importação
#[async_trait]
trait RowSource: Send {
    async fn fetch(&self) -> Result<Vec<serde_json::Value>>;
}

struct PayloadSource {
    rows: Vec<serde_json::Value>,
}

#[async_trait]
impl RowSource for PayloadSource {
    async fn fetch(&self) -> Result<Vec<serde_json::Value>> {
        Ok(self.rows.clone())
    }
}

struct MeliSource {
    shipment_number: String,
}

#[async_trait]
impl RowSource for MeliSource {
    async fn fetch(&self) -> Result<Vec<serde_json::Value>> {
        let cfg = config::load_config()?;
        let client = MeliClient::from_config(&cfg.meli);
        client.fetch_shipment_rows(&self.shipment_number).await
    }
}

/// Executor do caso de uso de importação FULL
pub struct ImportExecutor {
    progress_tracker: Arc<ProgressTracker>,
}

impl ImportExecutor {
    pub fn new(progress_tracker: Arc<ProgressTracker>) -> Self {
        Self { progress_tracker }
    }

    /// Disparar a importação (cria task async e devolve o session_id)
    pub async fn start_import(&self, request: ImportRequest) -> Result<ImportResponse> {
        tracing::info!("Starting FULL import with request: {:?}", request);

        // O cliente é resolvido antes do disparo: erro aqui é erro da
        // requisição, não da sessão
        let client = a002_customer::service::resolve_for_import(
            request.client_id.as_deref(),
            request.client_name.as_deref(),
        )
        .await?;

        let session_id = Uuid::new_v4().to_string();
        let total = match &request.source {
            ImportSource::Payload { rows } => Some(rows.len() as i32),
            ImportSource::MercadoLivre { .. } => None,
        };
        self.progress_tracker.create_session(session_id.clone(), total);

        let self_clone = self.clone();
        let session_id_clone = session_id.clone();
        let client_id = client.to_string_id();

        tokio::spawn(async move {
            if let Err(e) = self_clone
                .run_import(&session_id_clone, &request, &client_id)
                .await
            {
                tracing::error!("FULL import failed: {}", e);
                self_clone.progress_tracker.add_error(
                    &session_id_clone,
                    format!("Importação falhou: {}", e),
                    None,
                    None,
                );
                self_clone
                    .progress_tracker
                    .complete_session(&session_id_clone, ImportStatus::Failed);
            }
        });

        Ok(ImportResponse {
            session_id,
            status: ImportStartStatus::Started,
            message: format!("Importação disparada para o cliente {}", client.nome()),
        })
    }

    pub fn get_progress(
        &self,
        session_id: &str,
    ) -> Option<contracts::usecases::u501_import_full::ImportProgress> {
        self.progress_tracker.get_progress(session_id)
    }

    async fn run_import(
        &self,
        session_id: &str,
        request: &ImportRequest,
        client_id: &str,
    ) -> Result<()> {
        let source: Box<dyn RowSource> = match &request.source {
            ImportSource::Payload { rows } => Box::new(PayloadSource { rows: rows.clone() }),
            ImportSource::MercadoLivre { shipment_number } => Box::new(MeliSource {
                shipment_number: shipment_number.clone(),
            }),
        };

        let raw_rows = source.fetch().await?;
        tracing::info!("Import session {}: {} raw rows", session_id, raw_rows.len());

        let mut processed = 0;
        let mut imported = 0;
        let mut merged = 0;
        let mut ensured_shipments: HashSet<String> = HashSet::new();

        for raw in &raw_rows {
            processed += 1;

            let row: CanonicalFullRow = match canonical_row(raw) {
                Ok(r) => r,
                Err(e) => {
                    self.progress_tracker.add_error(
                        session_id,
                        "Linha ignorada".to_string(),
                        Some(e),
                        None,
                    );
                    self.progress_tracker
                        .update_progress(session_id, processed, imported, merged);
                    continue;
                }
            };

            let display = match &row.product_name {
                Some(nome) => format!("{} - {}", row.sku_text, nome),
                None => row.sku_text.clone(),
            };
            self.progress_tracker
                .set_current_item(session_id, Some(display));

            // Número do envio: da linha, senão o da requisição
            let shipment_number = match row
                .shipment_number
                .clone()
                .or_else(|| request.shipment_number.clone())
            {
                Some(n) => n,
                None => {
                    self.progress_tracker.add_error(
                        session_id,
                        "Linha sem número de envio".to_string(),
                        None,
                        Some(row.sku_text.clone()),
                    );
                    self.progress_tracker
                        .update_progress(session_id, processed, imported, merged);
                    continue;
                }
            };

            if !ensured_shipments.contains(&shipment_number) {
                a006_full_shipment::service::ensure_shipment(&shipment_number, client_id).await?;
                ensured_shipments.insert(shipment_number.clone());
            }

            match a006_full_shipment::service::import_row(
                &shipment_number,
                &row.ml_code,
                &row.sku_text,
                row.qty,
            )
            .await
            {
                Ok(a006_full_shipment::service::ImportRowOutcome::Imported) => imported += 1,
                Ok(a006_full_shipment::service::ImportRowOutcome::Merged) => merged += 1,
                Err(e) => {
                    tracing::error!("Failed to import row {}: {}", row.sku_text, e);
                    self.progress_tracker.add_error(
                        session_id,
                        format!("Falha ao importar {}", row.sku_text),
                        Some(e.to_string()),
                        Some(row.sku_text.clone()),
                    );
                }
            }

            self.progress_tracker
                .update_progress(session_id, processed, imported, merged);
        }

        self.progress_tracker.set_current_item(session_id, None);

        let final_status = if self
            .progress_tracker
            .get_progress(session_id)
            .map(|p| p.errors > 0)
            .unwrap_or(false)
        {
            ImportStatus::CompletedWithErrors
        } else {
            ImportStatus::Completed
        };
        self.progress_tracker
            .complete_session(session_id, final_status);

        tracing::info!(
            "Import session {} finished. Processed: {}, Imported: {}, Merged: {}",
            session_id,
            processed,
            imported,
            merged
        );

        Ok(())
    }
}

impl Clone for ImportExecutor {
    fn clone(&self) -> Self {
        Self {
            progress_tracker: Arc::clone(&self.progress_tracker),
        }
    }
}
