use axum::{extract::Path, Json};
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::shared::error::{to_api_error, ApiError, DomainError};
use crate::usecases::{u501_import_full, u502_match_full};
use contracts::usecases::u501_import_full::{ImportProgress, ImportRequest, ImportResponse};
use contracts::usecases::u502_match_full::{MatchProgress, MatchRequest, MatchResponse};

static IMPORT_EXECUTOR: Lazy<u501_import_full::executor::ImportExecutor> = Lazy::new(|| {
    u501_import_full::executor::ImportExecutor::new(Arc::new(
        u501_import_full::progress_tracker::ProgressTracker::new(),
    ))
});

static MATCH_EXECUTOR: Lazy<u502_match_full::executor::MatchExecutor> = Lazy::new(|| {
    u502_match_full::executor::MatchExecutor::new(Arc::new(
        u502_match_full::progress_tracker::ProgressTracker::new(),
    ))
});

/// POST /api/u501/import/start
pub async fn u501_start_import(
    Json(request): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, ApiError> {
    IMPORT_EXECUTOR
        .start_import(request)
        .await
        .map(Json)
        .map_err(to_api_error)
}

/// GET /api/u501/import/:session_id/progress
pub async fn u501_get_progress(
    Path(session_id): Path<String>,
) -> Result<Json<ImportProgress>, ApiError> {
    IMPORT_EXECUTOR
        .get_progress(&session_id)
        .map(Json)
        .ok_or_else(|| to_api_error(DomainError::not_found("Sessão de importação não encontrada")))
}

/// POST /api/u502/match/start
pub async fn u502_start_matching(
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, ApiError> {
    MATCH_EXECUTOR
        .start_matching(request)
        .await
        .map(Json)
        .map_err(to_api_error)
}

/// GET /api/u502/match/:session_id/progress
pub async fn u502_get_progress(
    Path(session_id): Path<String>,
) -> Result<Json<MatchProgress>, ApiError> {
    MATCH_EXECUTOR
        .get_progress(&session_id)
        .map(Json)
        .ok_or_else(|| to_api_error(DomainError::not_found("Sessão de conciliação não encontrada")))
}
