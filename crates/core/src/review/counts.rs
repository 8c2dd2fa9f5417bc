use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::repository::{RepositoryError, ReviewCounts, ReviewRepository};
use crate::selection::SelectionConfig;

/// Number of words that will be due tomorrow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomorrowCount {
    pub count: i64,
}

/// Counts words due by tomorrow.
pub struct GetTomorrowCount<'a> {
    repository: &'a dyn ReviewRepository,
}

impl<'a> GetTomorrowCount<'a> {
    pub fn new(repository: &'a dyn ReviewRepository) -> Self {
        Self { repository }
    }

    /// An invalid configuration counts zero without touching storage.
    pub fn execute(&self, config: &SelectionConfig) -> Result<TomorrowCount, RepositoryError> {
        if !config.is_valid() {
            debug!("Tomorrow count for invalid configuration");
            return Ok(TomorrowCount { count: 0 });
        }

        let count = self.repository.get_tomorrow_count(config)?;
        Ok(TomorrowCount { count })
    }
}

/// Counts words due now and all testable words.
pub struct GetReviewCounts<'a> {
    repository: &'a dyn ReviewRepository,
}

impl<'a> GetReviewCounts<'a> {
    pub fn new(repository: &'a dyn ReviewRepository) -> Self {
        Self { repository }
    }

    pub fn execute(&self, config: &SelectionConfig) -> Result<ReviewCounts, RepositoryError> {
        let Ok(fragment) = config.to_sql_projection() else {
            return Ok(ReviewCounts::default());
        };

        let counts = self.repository.get_review_counts(&fragment)?;
        debug!(due_now = counts.due_now, total = counts.total, "Review counts");
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Selection;
    use crate::testing::MockReviewRepository;

    #[test]
    fn test_tomorrow_invalid_config_is_zero_without_calls() {
        let repo = MockReviewRepository::new();
        repo.set_tomorrow_count(12);

        let result = GetTomorrowCount::new(&repo)
            .execute(&SelectionConfig::invalid(1))
            .unwrap();
        assert_eq!(result, TomorrowCount { count: 0 });
        assert_eq!(repo.total_calls(), 0);
    }

    #[test]
    fn test_tomorrow_delegates() {
        let repo = MockReviewRepository::new();
        repo.set_tomorrow_count(12);

        let result = GetTomorrowCount::new(&repo)
            .execute(&SelectionConfig::new(Selection::Language(1), 1))
            .unwrap();
        assert_eq!(result.count, 12);
        assert_eq!(repo.call_count("get_tomorrow_count"), 1);
        assert_eq!(serde_json::to_value(result).unwrap()["count"], 12);
    }

    #[test]
    fn test_counts_for_word_list() {
        let repo = MockReviewRepository::new();
        repo.set_counts(ReviewCounts {
            due_now: 2,
            total: 5,
        });

        let counts = GetReviewCounts::new(&repo)
            .execute(&SelectionConfig::new(
                Selection::word_list([1, 2, 3, 4, 5]),
                1,
            ))
            .unwrap();
        assert_eq!(counts.total, 5);
        assert_eq!(repo.recorded_fragments(), vec!["words.id IN (1,2,3,4,5)"]);
    }

    #[test]
    fn test_counts_invalid_config_is_zero() {
        let repo = MockReviewRepository::new();
        let counts = GetReviewCounts::new(&repo)
            .execute(&SelectionConfig::invalid(2))
            .unwrap();
        assert_eq!(counts, ReviewCounts::default());
        assert_eq!(repo.total_calls(), 0);
    }
}
