use contracts::usecases::u501_import_full::progress::{ImportError, ImportProgress, ImportStatus};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Tracker de progresso da importação (in-memory, para acompanhamento em
/// tempo real)
#[derive(Clone)]
pub struct ProgressTracker {
    sessions: Arc<RwLock<HashMap<String, ImportProgress>>>,
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

    /// Criar uma sessão de importação
    pub fn create_session(&self, session_id: String, total: Option<i32>) {
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(
            session_id.clone(),
            ImportProgress {
                session_id,
                status: ImportStatus::InProgress,
                total,
                processed: 0,
                imported: 0,
                merged: 0,
                errors: 0,
                error_list: Vec::new(),
                current_item: None,
                started_at: chrono::Utc::now(),
                completed_at: None,
            },
        );
    }

    pub fn update_progress(&self, session_id: &str, processed: i32, imported: i32, merged: i32) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.processed = processed;
            progress.imported = imported;
            progress.merged = merged;
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
        row: Option<String>,
    ) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.errors += 1;
            progress.error_list.push(ImportError {
                message,
                details,
                row,
            });
        }
    }

    pub fn complete_session(&self, session_id: &str, status: ImportStatus) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.status = status;
            progress.current_item = None;
            progress.completed_at = Some(chrono::Utc::now());
        }
    }

    pub fn get_progress(&self, session_id: &str) -> Option<ImportProgress> {
        let sessions = self.sessions.read().unwrap();
        sessions.get(session_id).cloned()
    }
}
