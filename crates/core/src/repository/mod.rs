//! Review repository: the storage boundary of the engine.
//!
//! An empty result is never an error; it means nothing is due. Backend
//! failures are reported as [`RepositoryError`].

mod sqlite;
mod types;

pub use sqlite::SqliteReviewRepository;
pub use types::*;

use crate::selection::{QueryFragment, SelectionConfig};
use crate::word::{WordRecord, WordStatus};

/// Trait for review storage backends.
pub trait ReviewRepository: Send + Sync {
    /// Next due word in the selection, skipping `exclude_previous_id`.
    fn find_next_word_for_review(
        &self,
        fragment: &QueryFragment,
        exclude_previous_id: Option<i64>,
    ) -> Result<Option<WordRecord>, RepositoryError>;

    /// Due-now and total testable counts.
    fn get_review_counts(&self, fragment: &QueryFragment) -> Result<ReviewCounts, RepositoryError>;

    /// Number of words that will be due tomorrow.
    fn get_tomorrow_count(&self, config: &SelectionConfig) -> Result<i64, RepositoryError>;

    /// Every testable word in the selection, most due first.
    fn get_table_words(
        &self,
        fragment: &QueryFragment,
        limit: u32,
    ) -> Result<Vec<WordRecord>, RepositoryError>;

    /// Persist a new status and stamp the change time.
    ///
    /// Returns `false` when no word has this id.
    fn update_word_status(&self, id: i64, new_status: WordStatus) -> Result<bool, RepositoryError>;

    /// Reject selections whose words span more than one language.
    fn validate_single_language(
        &self,
        config: &SelectionConfig,
    ) -> Result<LanguageCheck, RepositoryError>;

    /// Language the selection belongs to, if it resolves to any words.
    fn get_language_id_from_config(
        &self,
        config: &SelectionConfig,
    ) -> Result<Option<i64>, RepositoryError>;

    fn get_word(&self, id: i64) -> Result<Option<WordRecord>, RepositoryError>;

    fn get_language_settings(
        &self,
        language_id: i64,
    ) -> Result<Option<LanguageSettings>, RepositoryError>;

    /// An example sentence for the word with the term wrapped in `{}`.
    fn get_sentence_for_word(&self, word: &WordRecord) -> Result<Option<String>, RepositoryError> {
        Ok(self
            .get_sentence_with_annotations(word)?
            .filter(AnnotatedSentence::has_target)
            .map(|sentence| sentence.text))
    }

    /// The same sentence as annotated tokens.
    fn get_sentence_with_annotations(
        &self,
        word: &WordRecord,
    ) -> Result<Option<AnnotatedSentence>, RepositoryError>;
}
