//! Review use cases.
//!
//! Each use case borrows a [`ReviewRepository`] and returns
//! `Result<Outcome<T>, RepositoryError>`: learner-facing failures are an
//! [`Outcome::Failure`], storage failures are the `Err` channel.

mod counts;
mod error;
mod next_word;
mod outcome;
mod resolve;
mod sentence;
mod status_update;
mod table;

pub use counts::{GetReviewCounts, GetTomorrowCount, TomorrowCount};
pub use error::ReviewError;
pub use next_word::{GetNextWord, NextQuizItem};
pub use outcome::Outcome;
pub use resolve::resolve;
pub use sentence::{GetSentence, SentenceView};
pub use status_update::{StatusUpdateRequest, StatusUpdated, UpdateWordStatus};
pub use table::{GetTableWords, TableWords};

use tracing::warn;

use crate::metrics::REVIEW_REJECTIONS;
use crate::repository::{RepositoryError, ReviewRepository};
use crate::selection::{QueryFragment, SelectionConfig};

/// Record and return a learner-facing failure.
pub(crate) fn reject<T>(error: ReviewError) -> Outcome<T> {
    REVIEW_REJECTIONS.with_label_values(&[error.kind()]).inc();
    warn!(reason = error.kind(), error = %error, "Review request rejected");
    Outcome::Failure(error)
}

/// A checked selection: its compiled fragment and the language it belongs to.
pub(crate) struct CheckedSelection {
    pub fragment: QueryFragment,
    pub language_id: i64,
}

/// Checks shared by every use case that reads words of one language.
pub(crate) fn check_selection(
    repository: &dyn ReviewRepository,
    config: &SelectionConfig,
) -> Result<Result<CheckedSelection, ReviewError>, RepositoryError> {
    let fragment = match config.to_sql_projection() {
        Ok(fragment) => fragment,
        Err(_) => return Ok(Err(ReviewError::InvalidConfiguration)),
    };

    let check = repository.validate_single_language(config)?;
    if !check.valid {
        return Ok(Err(check.error.unwrap_or(ReviewError::InvalidConfiguration)));
    }

    let Some(language_id) = repository.get_language_id_from_config(config)? else {
        return Ok(Err(ReviewError::NoWordsAvailable));
    };

    Ok(Ok(CheckedSelection {
        fragment,
        language_id,
    }))
}
