//! Review API handlers.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use lexireview_core::{
    resolve, GetNextWord, GetReviewCounts, GetSentence, GetTableWords, GetTomorrowCount,
    ReviewCounts, ReviewParams, SelectionConfig, StatusUpdateRequest, TomorrowCount,
    UpdateWordStatus,
};

use super::error::{respond, ApiError};
use super::middleware::SessionId;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for table mode
#[derive(Debug, Default, Deserialize)]
pub struct TableParams {
    #[serde(flatten)]
    pub review: ReviewParams,
    /// Maximum number of rows. Kept as text: flattened query values arrive
    /// as strings.
    pub limit: Option<String>,
}

impl TableParams {
    fn limit(&self) -> Result<Option<u32>, ApiError> {
        match self.limit.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse::<u32>()
                .map(Some)
                .map_err(|_| ApiError::BadRequest(format!("Invalid limit: {}", raw))),
        }
    }
}

/// Response for the current session criteria
#[derive(Debug, Serialize)]
pub struct CriteriaResponse {
    pub session_id: String,
    pub criteria: Option<SelectionConfig>,
    /// Short link form, empty when no criteria are stored.
    pub url_property: String,
    pub last_word_id: Option<i64>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Next quiz item, or the table listing when `table=1`
pub async fn next_word(
    State(state): State<Arc<AppState>>,
    SessionId(session_id): SessionId,
    Query(params): Query<TableParams>,
) -> Response {
    let session = state.session(&session_id);
    let config = resolve(&params.review, &session);

    if config.is_table_mode() {
        return table_response(&state, &config, &params);
    }

    debug!(session = %session_id, selection = %config.to_url_property(), "Next word requested");
    respond(GetNextWord::new(state.repository()).execute(&config, &session))
}

/// Every testable word of the selection
pub async fn table_words(
    State(state): State<Arc<AppState>>,
    SessionId(session_id): SessionId,
    Query(params): Query<TableParams>,
) -> Response {
    let session = state.session(&session_id);
    let config = resolve(&params.review, &session).with_table_mode(true);
    table_response(&state, &config, &params)
}

fn table_response(state: &AppState, config: &SelectionConfig, params: &TableParams) -> Response {
    let limit = match params.limit() {
        Ok(limit) => limit,
        Err(e) => return e.into_response(),
    };
    respond(GetTableWords::new(state.repository(), &state.config().review).execute(config, limit))
}

/// Due-now and total counts
pub async fn review_counts(
    State(state): State<Arc<AppState>>,
    SessionId(session_id): SessionId,
    Query(params): Query<ReviewParams>,
) -> Result<Json<ReviewCounts>, ApiError> {
    let config = resolve(&params, &state.session(&session_id));
    let counts = GetReviewCounts::new(state.repository()).execute(&config)?;
    Ok(Json(counts))
}

/// Words due by tomorrow
pub async fn tomorrow_count(
    State(state): State<Arc<AppState>>,
    SessionId(session_id): SessionId,
    Query(params): Query<ReviewParams>,
) -> Result<Json<TomorrowCount>, ApiError> {
    let config = resolve(&params, &state.session(&session_id));
    let count = GetTomorrowCount::new(state.repository()).execute(&config)?;
    Ok(Json(count))
}

/// Criteria stored in the session, without modifying them
pub async fn current_criteria(
    State(state): State<Arc<AppState>>,
    SessionId(session_id): SessionId,
) -> Json<CriteriaResponse> {
    let session = state.session(&session_id);
    let criteria = session.criteria();
    Json(CriteriaResponse {
        url_property: criteria
            .as_ref()
            .map(SelectionConfig::to_url_property)
            .unwrap_or_default(),
        last_word_id: session.last_word_id(),
        criteria,
        session_id,
    })
}

/// Record a learner's answer
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StatusUpdateRequest>,
) -> Response {
    respond(UpdateWordStatus::new(state.repository()).execute(&body))
}

/// Example sentence for one term
pub async fn sentence(
    State(state): State<Arc<AppState>>,
    Path(term_id): Path<i64>,
) -> Response {
    respond(GetSentence::new(state.repository()).execute(term_id))
}
