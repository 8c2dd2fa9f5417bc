//! Turning request parameters plus session state into the configuration a
//! use case runs against.

use tracing::debug;

use crate::selection::{parse_from_params, parse_id_list, ReviewParams, ReviewType, SelectionConfig};
use crate::session::ReviewSession;

/// Resolve the effective configuration for a request.
///
/// A list selection sent without ids reuses the stored list of the same kind.
/// A request with no usable selection falls back to the stored criteria. In
/// both cases the request's review type and mode flags apply on top. A valid
/// result is written back to the session.
pub fn resolve(params: &ReviewParams, session: &ReviewSession<'_>) -> SelectionConfig {
    let parsed = parse_from_params(params);
    let stored = session.criteria().filter(SelectionConfig::is_valid);

    let list_without_ids = params.list_kind().filter(|_| {
        params
            .ids
            .as_deref()
            .and_then(parse_id_list)
            .is_none()
    });

    let resolved = match (list_without_ids, stored) {
        (Some(kind), Some(stored)) if stored.review_key() == Some(kind) => {
            debug!(session = session.id(), kind = %kind, "Reusing stored list selection");
            overlay(stored, params)
        }
        (_, Some(stored)) if !parsed.is_valid() => {
            debug!(session = session.id(), kind = ?stored.review_key(), "Falling back to stored criteria");
            overlay(stored, params)
        }
        _ => parsed,
    };

    if resolved.is_valid() {
        session.set_criteria(&resolved);
    }

    resolved
}

fn overlay(stored: SelectionConfig, params: &ReviewParams) -> SelectionConfig {
    stored
        .with_review_type(ReviewType::from_code(params.review_type_code()))
        .with_word_mode(params.word_mode_requested())
        .with_table_mode(params.table_mode())
}
