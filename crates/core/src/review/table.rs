use serde::Serialize;
use tracing::debug;

use super::{check_selection, reject, Outcome, ReviewError};
use crate::config::ReviewConfig;
use crate::metrics::TABLE_ROWS;
use crate::repository::{LanguageSettings, RepositoryError, ReviewRepository};
use crate::selection::SelectionConfig;
use crate::word::{days_until_due, WordRecord};

/// A word row in table mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableWord {
    #[serde(flatten)]
    pub word: WordRecord,
    /// Days until the word is due; `0` when due now.
    pub due_in_days: Option<i64>,
}

/// Table-mode payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableWords {
    pub words: Vec<TableWord>,
    #[serde(rename = "langSettings")]
    pub lang_settings: Option<LanguageSettings>,
}

/// Lists every testable word of a selection, most due first.
pub struct GetTableWords<'a> {
    repository: &'a dyn ReviewRepository,
    limits: &'a ReviewConfig,
}

impl<'a> GetTableWords<'a> {
    pub fn new(repository: &'a dyn ReviewRepository, limits: &'a ReviewConfig) -> Self {
        Self { repository, limits }
    }

    /// Row count: `requested_limit` or the configured default, clamped to
    /// `1..=max_table_limit`.
    pub fn effective_limit(&self, requested_limit: Option<u32>) -> u32 {
        requested_limit
            .unwrap_or(self.limits.table_limit)
            .clamp(1, self.limits.max_table_limit.max(1))
    }

    pub fn execute(
        &self,
        config: &SelectionConfig,
        requested_limit: Option<u32>,
    ) -> Result<Outcome<TableWords>, RepositoryError> {
        if !config.is_valid() {
            return Ok(reject(ReviewError::InvalidConfiguration));
        }

        let checked = match check_selection(self.repository, config)? {
            Ok(checked) => checked,
            Err(error) => return Ok(reject(error)),
        };

        let limit = self.effective_limit(requested_limit);
        let words = self.repository.get_table_words(&checked.fragment, limit)?;
        let lang_settings = self.repository.get_language_settings(checked.language_id)?;

        TABLE_ROWS.observe(words.len() as f64);
        debug!(rows = words.len(), limit, language = checked.language_id, "Table words");

        let words = words
            .into_iter()
            .map(|word| TableWord {
                due_in_days: days_until_due(word.status, word.days_old),
                word,
            })
            .collect();

        Ok(Outcome::Success(TableWords {
            words,
            lang_settings,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Selection;
    use crate::testing::{fixtures, MockReviewRepository};

    fn limits() -> ReviewConfig {
        ReviewConfig {
            table_limit: 2,
            max_table_limit: 3,
            ..ReviewConfig::default()
        }
    }

    fn seeded_repo() -> MockReviewRepository {
        let repo = MockReviewRepository::new();
        repo.set_language_id(Some(1));
        repo.add_language(fixtures::language(1, "German"));
        for (id, text) in [(1, "eins"), (2, "zwei"), (3, "drei"), (4, "vier")] {
            repo.add_due_word(fixtures::word(id, text, "number"));
        }
        repo
    }

    #[test]
    fn test_limit_clamping() {
        let repo = MockReviewRepository::new();
        let limits = limits();
        let use_case = GetTableWords::new(&repo, &limits);
        assert_eq!(use_case.effective_limit(None), 2);
        assert_eq!(use_case.effective_limit(Some(0)), 1);
        assert_eq!(use_case.effective_limit(Some(50)), 3);
    }

    #[test]
    fn test_table_words_with_language_settings() {
        let repo = seeded_repo();
        let limits = limits();

        let table = GetTableWords::new(&repo, &limits)
            .execute(&SelectionConfig::new(Selection::Language(1), 1), Some(10))
            .unwrap()
            .success()
            .unwrap();
        assert_eq!(table.words.len(), 3);
        assert_eq!(table.lang_settings.as_ref().map(|l| l.name.as_str()), Some("German"));
        assert_eq!(repo.recorded_limits(), vec![3]);

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["langSettings"]["name"], "German");
        assert_eq!(json["words"][0]["text"], "eins");
    }

    #[test]
    fn test_table_rows_observed() {
        let repo = seeded_repo();
        let limits = limits();
        let before = TABLE_ROWS.get_sample_count();

        GetTableWords::new(&repo, &limits)
            .execute(&SelectionConfig::new(Selection::Language(1), 1), None)
            .unwrap();
        assert!(TABLE_ROWS.get_sample_count() > before);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let repo = seeded_repo();
        let limits = limits();
        let outcome = GetTableWords::new(&repo, &limits)
            .execute(&SelectionConfig::invalid(1), None)
            .unwrap();
        assert_eq!(outcome.failure(), Some(&ReviewError::InvalidConfiguration));
        assert_eq!(repo.total_calls(), 0);
    }
}
