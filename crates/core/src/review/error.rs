//! Errors reported by the review engine.

use thiserror::Error;

/// User-facing and programmer errors of the review engine.
///
/// These are returned as structured values from the use cases. Storage
/// failures travel separately as [`crate::repository::RepositoryError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    /// Unrecognized selection kind.
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Missing or contradictory learner selection.
    #[error("No valid review selection: choose a language, a text or a list of terms")]
    InvalidConfiguration,

    /// The selection spans more than one language.
    #[error("The selected terms belong to {0} different languages; select terms of a single language")]
    MultiLanguageSelection(usize),

    /// Status outside the seven legal codes.
    #[error("Invalid status: {0} (expected 1-5, 98 or 99)")]
    InvalidStatus(i64),

    /// A signed change was requested for an ignored or well-known word.
    #[error("Status {0} cannot be changed by a step; set the status explicitly")]
    StatusNotAdjustable(i64),

    /// Update request carried neither an absolute status nor a change.
    #[error("Must provide either status or change")]
    MissingStatusChange,

    /// The selection resolves to no language, so there is nothing to test.
    #[error("No words available for this selection")]
    NoWordsAvailable,

    #[error("Term not found: {0}")]
    WordNotFound(i64),
}

impl ReviewError {
    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ReviewError::InvalidSelection(_) => "invalid_selection",
            ReviewError::InvalidConfiguration => "invalid_configuration",
            ReviewError::MultiLanguageSelection(_) => "multi_language_selection",
            ReviewError::InvalidStatus(_) => "invalid_status",
            ReviewError::StatusNotAdjustable(_) => "status_not_adjustable",
            ReviewError::MissingStatusChange => "missing_status_change",
            ReviewError::NoWordsAvailable => "no_words_available",
            ReviewError::WordNotFound(_) => "word_not_found",
        }
    }
}
