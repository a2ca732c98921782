use contracts::usecases::u502_match_full::progress::{MatchError, MatchProgress, MatchStatus};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Tracker de progresso da conciliação (in-memory, para acompanhamento em
/// tempo real)
#[derive(Clone)]
pub struct ProgressTracker {
    sessions: Arc<RwLock<HashMap<String, MatchProgress>>>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Criar uma sessão de conciliação
    pub fn create_session(&self, session_id: String, total: Option<i32>) {
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(
            session_id.clone(),
            MatchProgress {
                session_id,
                status: MatchStatus::InProgress,
                total,
                processed: 0,
                matched: 0,
                left_pending: 0,
                ambiguous: 0,
                errors: 0,
                error_list: Vec::new(),
                current_item: None,
                started_at: chrono::Utc::now(),
                completed_at: None,
            },
        );
    }

    pub fn update_progress(
        &self,
        session_id: &str,
        processed: i32,
        matched: i32,
        left_pending: i32,
        ambiguous: i32,
    ) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.processed = processed;
            progress.matched = matched;
            progress.left_pending = left_pending;
            progress.ambiguous = ambiguous;
        }
    }

    pub fn set_current_item(&self, session_id: &str, item: Option<String>) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.current_item = item;
        }
    }

    pub fn add_error(
        &self,
        session_id: &str,
        message: String,
        details: Option<String>,
        sku_text: Option<String>,
    ) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.errors += 1;
            progress.error_list.push(MatchError {
                message,
                details,
                sku_text,
            });
        }
    }

    pub fn complete_session(&self, session_id: &str, status: MatchStatus) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.status = status;
            progress.current_item = None;
            progress.completed_at = Some(chrono::Utc::now());
        }
    }

    pub fn get_progress(&self, session_id: &str) -> Option<MatchProgress> {
        let sessions = self.sessions.read().unwrap();
        sessions.get(session_id).cloned()
    }
}
