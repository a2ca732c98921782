use super::progress_tracker::ProgressTracker;
use anyhow::Result;
use contracts::domain::a006_full_shipment::FullShipmentItem;
use contracts::domain::a007_sku_alias::normalize_alias;
use contracts::usecases::u502_match_full::{
    progress::MatchStatus,
    request::MatchRequest,
    response::{MatchResponse, MatchStartStatus},
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{a001_product, a006_full_shipment, a007_sku_alias};

/// Índice de busca da conciliação: SKUs do catálogo e De-Para aprendido,
/// ambos com chave normalizada.
pub struct MatchIndex {
    /// chave (SKU normalizado conforme ignore_case) -> SKUs do catálogo
    catalog: HashMap<String, Vec<String>>,
    /// alias normalizado -> SKU do catálogo
    aliases: HashMap<String, String>,
    ignore_case: bool,
}

/// Decisão da conciliação para um item
#[derive(Debug, Clone, PartialEq)]
pub enum MatchDecision {
    /// Exatamente um candidato
    Related(String),
    /// Nenhum candidato; o item continua pendente
    LeftPending,
    /// Mais de um candidato distinto; o item continua pendente
    Ambiguous(usize),
}

impl MatchIndex {
    pub fn new(
        catalog_skus: &[String],
        aliases: &[(String, String)],
        ignore_case: bool,
    ) -> Self {
        let mut catalog: HashMap<String, Vec<String>> = HashMap::new();
        for sku in catalog_skus {
            let trimmed = sku.trim();
            if trimmed.is_empty() {
                continue;
            }
            let key = if ignore_case {
                trimmed.to_lowercase()
            } else {
                trimmed.to_string()
            };
            catalog.entry(key).or_default().push(trimmed.to_string());
        }

        let alias_map = aliases
            .iter()
            .map(|(alias_norm, sku)| (alias_norm.clone(), sku.clone()))
            .collect();

        Self {
            catalog,
            aliases: alias_map,
            ignore_case,
        }
    }

    /// Decidir o destino de um SKU em texto livre: primeiro o catálogo
    /// direto, depois o De-Para. Candidatos distintos somam; repetidos não.
    pub fn decide(&self, sku_text: &str) -> MatchDecision {
        let trimmed = sku_text.trim();
        if trimmed.is_empty() {
            return MatchDecision::LeftPending;
        }

        let key = if self.ignore_case {
            trimmed.to_lowercase()
        } else {
            trimmed.to_string()
        };

        let mut candidates: Vec<String> = Vec::new();
        if let Some(direct) = self.catalog.get(&key) {
            for sku in direct {
                if !candidates.contains(sku) {
                    candidates.push(sku.clone());
                }
            }
        }
        if let Some(learned) = self.aliases.get(&normalize_alias(trimmed)) {
            if !candidates.contains(learned) {
                candidates.push(learned.clone());
            }
        }

        match candidates.len() {
            0 => MatchDecision::LeftPending,
            1 => MatchDecision::Related(candidates.remove(0)),
            n => MatchDecision::Ambiguous(n),
        }
    }
}

/// Executor do caso de uso de conciliação automática
pub struct MatchExecutor {
    progress_tracker: Arc<ProgressTracker>,
}

impl MatchExecutor {
    pub fn new(progress_tracker: Arc<ProgressTracker>) -> Self {
        Self { progress_tracker }
    }

    /// Disparar a conciliação (cria task async e devolve o session_id)
    pub async fn start_matching(&self, request: MatchRequest) -> Result<MatchResponse> {
        tracing::info!("Starting FULL matching with request: {:?}", request);

        let pending = a006_full_shipment::repository::list_pending_items(
            request.shipment_number.as_deref(),
            request.client_id.as_deref(),
        )
        .await?;

        let total = pending.len() as i32;
        let session_id = Uuid::new_v4().to_string();
        self.progress_tracker
            .create_session(session_id.clone(), Some(total));

        let self_clone = self.clone();
        let session_id_clone = session_id.clone();
        let ignore_case = request.ignore_case;

        tokio::spawn(async move {
            if let Err(e) = self_clone
                .run_matching(&session_id_clone, pending, ignore_case)
                .await
            {
                tracing::error!("FULL matching failed: {}", e);
                self_clone.progress_tracker.add_error(
                    &session_id_clone,
                    format!("Conciliação falhou: {}", e),
                    None,
                    None,
                );
                self_clone
                    .progress_tracker
                    .complete_session(&session_id_clone, MatchStatus::Failed);
            }
        });

        Ok(MatchResponse {
            session_id,
            status: MatchStartStatus::Started,
            message: format!("Conciliação disparada para {} item(ns) pendente(s)", total),
        })
    }

    pub fn get_progress(
        &self,
        session_id: &str,
    ) -> Option<contracts::usecases::u502_match_full::MatchProgress> {
        self.progress_tracker.get_progress(session_id)
    }

    async fn build_index(ignore_case: bool) -> Result<MatchIndex> {
        let start_time = std::time::Instant::now();

        let products = a001_product::repository::list_all().await?;
        let catalog_skus: Vec<String> = products.iter().map(|p| p.base.code.clone()).collect();

        let aliases: Vec<(String, String)> = a007_sku_alias::repository::list_all()
            .await?
            .into_iter()
            .map(|a| (a.alias_norm, a.stock_sku))
            .collect();

        tracing::info!(
            "Built match index in {:?}ms: {} catalog SKUs, {} aliases (ignore_case: {})",
            start_time.elapsed().as_millis(),
            catalog_skus.len(),
            aliases.len(),
            ignore_case
        );

        Ok(MatchIndex::new(&catalog_skus, &aliases, ignore_case))
    }

    async fn run_matching(
        &self,
        session_id: &str,
        pending: Vec<FullShipmentItem>,
        ignore_case: bool,
    ) -> Result<()> {
        let index = Self::build_index(ignore_case).await?;

        let mut processed = 0;
        let mut matched = 0;
        let mut left_pending = 0;
        let mut ambiguous = 0;

        for mut item in pending {
            self.progress_tracker
                .set_current_item(session_id, Some(item.sku_text.clone()));

            match index.decide(&item.sku_text) {
                MatchDecision::Related(sku) => {
                    match item.relate(&sku) {
                        Ok(()) => {
                            item.before_write();
                            if let Err(e) =
                                a006_full_shipment::repository::update_item(&item).await
                            {
                                tracing::error!(
                                    "Failed to persist match for {}: {}",
                                    item.sku_text,
                                    e
                                );
                                self.progress_tracker.add_error(
                                    session_id,
                                    format!("Falha ao relacionar {}", item.sku_text),
                                    Some(e.to_string()),
                                    Some(item.sku_text.clone()),
                                );
                            } else {
                                matched += 1;
                            }
                        }
                        Err(e) => {
                            self.progress_tracker.add_error(
                                session_id,
                                format!("Falha ao relacionar {}", item.sku_text),
                                Some(e),
                                Some(item.sku_text.clone()),
                            );
                        }
                    }
                }
                MatchDecision::LeftPending => {
                    left_pending += 1;
                }
                MatchDecision::Ambiguous(count) => {
                    tracing::warn!(
                        "Ambiguous match for \"{}\": {} candidates",
                        item.sku_text,
                        count
                    );
                    ambiguous += 1;
                    left_pending += 1;
                }
            }

            processed += 1;
            self.progress_tracker.update_progress(
                session_id,
                processed,
                matched,
                left_pending,
                ambiguous,
            );
        }

        self.progress_tracker.set_current_item(session_id, None);

        let final_status = if self
            .progress_tracker
            .get_progress(session_id)
            .map(|p| p.errors > 0)
            .unwrap_or(false)
        {
            MatchStatus::CompletedWithErrors
        } else {
            MatchStatus::Completed
        };
        self.progress_tracker
            .complete_session(session_id, final_status);

        tracing::info!(
            "Match session {} finished. Processed: {}, Matched: {}, Left pending: {}, Ambiguous: {}",
            session_id,
            processed,
            matched,
            left_pending,
            ambiguous
        );

        Ok(())
    }
}

impl Clone for MatchExecutor {
    fn clone(&self) -> Self {
        Self {
            progress_tracker: Arc::clone(&self.progress_tracker),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(catalog: &[&str], aliases: &[(&str, &str)], ignore_case: bool) -> MatchIndex {
        let catalog: Vec<String> = catalog.iter().map(|s| s.to_string()).collect();
        let aliases: Vec<(String, String)> = aliases
            .iter()
            .map(|(a, s)| (normalize_alias(a), s.to_string()))
            .collect();
        MatchIndex::new(&catalog, &aliases, ignore_case)
    }

    #[test]
    fn direct_catalog_hit_relates() {
        let idx = index(&["CAN-300-AZ"], &[], true);
        assert_eq!(
            idx.decide("can-300-az"),
            MatchDecision::Related("CAN-300-AZ".into())
        );
    }

    #[test]
    fn case_sensitive_mode_respects_case() {
        let idx = index(&["CAN-300-AZ"], &[], false);
        assert_eq!(idx.decide("can-300-az"), MatchDecision::LeftPending);
        assert_eq!(
            idx.decide("CAN-300-AZ"),
            MatchDecision::Related("CAN-300-AZ".into())
        );
    }

    #[test]
    fn alias_hit_relates() {
        let idx = index(&["CAN-300-AZ"], &[("caneca azul 300ml", "CAN-300-AZ")], true);
        assert_eq!(
            idx.decide("  Caneca  Azul 300ml "),
            MatchDecision::Related("CAN-300-AZ".into())
        );
    }

    #[test]
    fn direct_and_alias_to_same_sku_is_not_ambiguous() {
        // o SKU do catálogo também foi aprendido como alias dele mesmo
        let idx = index(&["CAN-300-AZ"], &[("CAN-300-AZ", "CAN-300-AZ")], true);
        assert_eq!(
            idx.decide("CAN-300-AZ"),
            MatchDecision::Related("CAN-300-AZ".into())
        );
    }

    #[test]
    fn conflicting_candidates_are_ambiguous() {
        // alias aponta para um SKU diferente do hit direto
        let idx = index(&["CAN-300-AZ"], &[("CAN-300-AZ", "KIT-CANECA")], true);
        assert_eq!(idx.decide("CAN-300-AZ"), MatchDecision::Ambiguous(2));
    }

    #[test]
    fn no_candidates_leaves_pending() {
        let idx = index(&["CAN-300-AZ"], &[], true);
        assert_eq!(idx.decide("DESCONHECIDO"), MatchDecision::LeftPending);
        assert_eq!(idx.decide("   "), MatchDecision::LeftPending);
    }
}
