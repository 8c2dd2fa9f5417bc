//! Mock review repository for testing.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::repository::{
    AnnotatedSentence, LanguageCheck, LanguageSettings, RepositoryError, ReviewCounts,
    ReviewRepository,
};
use crate::selection::{QueryFragment, SelectionConfig};
use crate::word::{WordRecord, WordStatus};

#[derive(Default)]
struct MockState {
    /// Words in due order; `find_next_word_for_review` returns the first one
    /// that is not excluded.
    due: Vec<WordRecord>,
    /// Every known word, by id.
    words: HashMap<i64, WordRecord>,
    counts: ReviewCounts,
    tomorrow: i64,
    language_check: Option<LanguageCheck>,
    language_id: Option<i64>,
    languages: HashMap<i64, LanguageSettings>,
    sentences: HashMap<i64, AnnotatedSentence>,
    fail_with: Option<String>,
    failing_methods: HashMap<String, String>,
    calls: HashMap<&'static str, usize>,
    fragments: Vec<String>,
    excluded: Vec<Option<i64>>,
    limits: Vec<u32>,
    updates: Vec<(i64, WordStatus)>,
}

/// In-memory [`ReviewRepository`] with scripted answers.
///
/// Fragments are recorded but never evaluated. Every call is counted so tests
/// can assert that a path does or does not touch storage.
///
/// # Example
///
/// ```rust,ignore
/// use lexireview_core::testing::{fixtures, MockReviewRepository};
///
/// let repo = MockReviewRepository::new();
/// repo.add_due_word(fixtures::word(1, "Haus", "house"));
///
/// let next = repo.find_next_word_for_review(&fragment, None)?;
/// assert_eq!(repo.call_count("find_next_word_for_review"), 1);
/// ```
#[derive(Default)]
pub struct MockReviewRepository {
    state: Mutex<MockState>,
}

impl std::fmt::Debug for MockReviewRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockReviewRepository")
            .field("state", &"<state>")
            .finish()
    }
}

impl MockReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: &'static str) -> Result<MutexGuard<'_, MockState>, RepositoryError> {
        let mut state = self.state();
        *state.calls.entry(call).or_default() += 1;
        if let Some(message) = state
            .fail_with
            .clone()
            .or_else(|| state.failing_methods.get(call).cloned())
        {
            return Err(RepositoryError::Database(message));
        }
        Ok(state)
    }

    /// Register a word without making it due.
    pub fn add_word(&self, word: WordRecord) {
        self.state().words.insert(word.id, word);
    }

    /// Register a word and queue it as due.
    pub fn add_due_word(&self, word: WordRecord) {
        let mut state = self.state();
        state.words.insert(word.id, word.clone());
        state.due.push(word);
    }

    pub fn set_counts(&self, counts: ReviewCounts) {
        self.state().counts = counts;
    }

    pub fn set_tomorrow_count(&self, count: i64) {
        self.state().tomorrow = count;
    }

    /// Answer for `validate_single_language`. Defaults to valid.
    pub fn set_language_check(&self, check: LanguageCheck) {
        self.state().language_check = Some(check);
    }

    /// Answer for `get_language_id_from_config`. Defaults to none.
    pub fn set_language_id(&self, id: Option<i64>) {
        self.state().language_id = id;
    }

    pub fn add_language(&self, settings: LanguageSettings) {
        self.state().languages.insert(settings.id, settings);
    }

    /// Sentence served for the given word id.
    pub fn set_sentence(&self, word_id: i64, sentence: AnnotatedSentence) {
        self.state().sentences.insert(word_id, sentence);
    }

    /// Make every subsequent call fail with a database error.
    pub fn fail_with(&self, message: &str) {
        self.state().fail_with = Some(message.to_string());
    }

    /// Make calls to one trait method fail with a database error.
    pub fn fail_method(&self, method: &str, message: &str) {
        self.state()
            .failing_methods
            .insert(method.to_string(), message.to_string());
    }

    /// Number of calls to one trait method, by method name.
    pub fn call_count(&self, method: &str) -> usize {
        self.state().calls.get(method).copied().unwrap_or(0)
    }

    /// Total number of calls to any trait method.
    pub fn total_calls(&self) -> usize {
        self.state().calls.values().sum()
    }

    /// Fragments passed to fragment-taking methods, in call order.
    pub fn recorded_fragments(&self) -> Vec<String> {
        self.state().fragments.clone()
    }

    /// `exclude_previous_id` arguments, in call order.
    pub fn recorded_exclusions(&self) -> Vec<Option<i64>> {
        self.state().excluded.clone()
    }

    pub fn recorded_limits(&self) -> Vec<u32> {
        self.state().limits.clone()
    }

    pub fn recorded_updates(&self) -> Vec<(i64, WordStatus)> {
        self.state().updates.clone()
    }
}

impl ReviewRepository for MockReviewRepository {
    fn find_next_word_for_review(
        &self,
        fragment: &QueryFragment,
        exclude_previous_id: Option<i64>,
    ) -> Result<Option<WordRecord>, RepositoryError> {
        let mut state = self.record("find_next_word_for_review")?;
        state.fragments.push(fragment.to_string());
        state.excluded.push(exclude_previous_id);
        Ok(state
            .due
            .iter()
            .find(|w| Some(w.id) != exclude_previous_id)
            .cloned())
    }

    fn get_review_counts(&self, fragment: &QueryFragment) -> Result<ReviewCounts, RepositoryError> {
        let mut state = self.record("get_review_counts")?;
        state.fragments.push(fragment.to_string());
        Ok(state.counts)
    }

    fn get_tomorrow_count(&self, _config: &SelectionConfig) -> Result<i64, RepositoryError> {
        let state = self.record("get_tomorrow_count")?;
        Ok(state.tomorrow)
    }

    fn get_table_words(
        &self,
        fragment: &QueryFragment,
        limit: u32,
    ) -> Result<Vec<WordRecord>, RepositoryError> {
        let mut state = self.record("get_table_words")?;
        state.fragments.push(fragment.to_string());
        state.limits.push(limit);
        Ok(state.due.iter().take(limit as usize).cloned().collect())
    }

    fn update_word_status(&self, id: i64, new_status: WordStatus) -> Result<bool, RepositoryError> {
        let mut state = self.record("update_word_status")?;
        state.updates.push((id, new_status));
        match state.words.get_mut(&id) {
            Some(word) => {
                word.status = new_status;
                word.days_old = 0;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn validate_single_language(
        &self,
        _config: &SelectionConfig,
    ) -> Result<LanguageCheck, RepositoryError> {
        let state = self.record("validate_single_language")?;
        Ok(state.language_check.clone().unwrap_or_else(LanguageCheck::ok))
    }

    fn get_language_id_from_config(
        &self,
        _config: &SelectionConfig,
    ) -> Result<Option<i64>, RepositoryError> {
        let state = self.record("get_language_id_from_config")?;
        Ok(state.language_id)
    }

    fn get_word(&self, id: i64) -> Result<Option<WordRecord>, RepositoryError> {
        let state = self.record("get_word")?;
        Ok(state.words.get(&id).cloned())
    }

    fn get_language_settings(
        &self,
        language_id: i64,
    ) -> Result<Option<LanguageSettings>, RepositoryError> {
        let state = self.record("get_language_settings")?;
        Ok(state.languages.get(&language_id).cloned())
    }

    fn get_sentence_with_annotations(
        &self,
        word: &WordRecord,
    ) -> Result<Option<AnnotatedSentence>, RepositoryError> {
        let state = self.record("get_sentence_with_annotations")?;
        Ok(state.sentences.get(&word.id).cloned())
    }
}
