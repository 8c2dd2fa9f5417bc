use serde::{Deserialize, Serialize};
use tracing::info;

use super::{reject, Outcome, ReviewError};
use crate::metrics::STATUS_CHANGES;
use crate::repository::{RepositoryError, ReviewRepository};
use crate::word::{apply_delta, set_absolute};

/// A learner's answer: either an absolute status or a signed change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub term_id: i64,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub change: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdated {
    pub success: bool,
    #[serde(rename = "newStatus")]
    pub new_status: i64,
}

/// Applies a status transition and persists it.
pub struct UpdateWordStatus<'a> {
    repository: &'a dyn ReviewRepository,
}

impl<'a> UpdateWordStatus<'a> {
    pub fn new(repository: &'a dyn ReviewRepository) -> Self {
        Self { repository }
    }

    /// `status` wins when both `status` and `change` are given.
    pub fn execute(
        &self,
        request: &StatusUpdateRequest,
    ) -> Result<Outcome<StatusUpdated>, RepositoryError> {
        if request.status.is_none() && request.change.is_none() {
            return Ok(reject(ReviewError::MissingStatusChange));
        }

        let Some(word) = self.repository.get_word(request.term_id)? else {
            return Ok(reject(ReviewError::WordNotFound(request.term_id)));
        };

        let by_delta = request.status.is_none();
        let computed = match (request.status, request.change) {
            (Some(status), _) => set_absolute(&word, status),
            (None, Some(delta)) => apply_delta(&word, delta),
            (None, None) => Err(ReviewError::MissingStatusChange),
        };
        let change = match computed {
            Ok(change) => change,
            Err(error) => return Ok(reject(error)),
        };

        if !self.repository.update_word_status(change.word_id, change.to)? {
            return Ok(reject(ReviewError::WordNotFound(change.word_id)));
        }

        STATUS_CHANGES
            .with_label_values(&[change.kind(by_delta)])
            .inc();
        info!(
            term_id = change.word_id,
            from = change.from.code(),
            to = change.to.code(),
            kind = change.kind(by_delta),
            "Word status changed"
        );

        Ok(Outcome::Success(StatusUpdated {
            success: true,
            new_status: change.to.code(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockReviewRepository};
    use crate::word::WordStatus;

    fn repo_with(level: i64) -> MockReviewRepository {
        let repo = MockReviewRepository::new();
        repo.add_word(fixtures::word(7, "Haus", "house").with_status(WordStatus::learning(level)));
        repo
    }

    fn request(status: Option<i64>, change: Option<i64>) -> StatusUpdateRequest {
        StatusUpdateRequest {
            term_id: 7,
            status,
            change,
        }
    }

    #[test]
    fn test_missing_status_and_change() {
        let repo = repo_with(1);
        let outcome = UpdateWordStatus::new(&repo)
            .execute(&request(None, None))
            .unwrap();
        assert_eq!(
            serde_json::to_value(&outcome).unwrap()["error"],
            "Must provide either status or change"
        );
        assert_eq!(repo.total_calls(), 0);
    }

    #[test]
    fn test_delta_clamps_at_top() {
        let repo = repo_with(5);
        let updated = UpdateWordStatus::new(&repo)
            .execute(&request(None, Some(1)))
            .unwrap()
            .success()
            .unwrap();
        assert_eq!(updated.new_status, 5);
        assert_eq!(repo.recorded_updates(), vec![(7, WordStatus::learning(5))]);
    }

    #[test]
    fn test_status_wins_over_change() {
        let repo = repo_with(2);
        let updated = UpdateWordStatus::new(&repo)
            .execute(&request(Some(99), Some(-1)))
            .unwrap()
            .success()
            .unwrap();
        assert_eq!(updated.new_status, 99);
        assert_eq!(
            serde_json::to_value(updated).unwrap(),
            serde_json::json!({"success": true, "newStatus": 99})
        );
    }

    #[test]
    fn test_invalid_absolute_status() {
        let repo = repo_with(2);
        let outcome = UpdateWordStatus::new(&repo)
            .execute(&request(Some(42), None))
            .unwrap();
        assert_eq!(outcome.failure(), Some(&ReviewError::InvalidStatus(42)));
        assert_eq!(repo.call_count("update_word_status"), 0);
    }

    #[test]
    fn test_delta_on_well_known_refused() {
        let repo = MockReviewRepository::new();
        repo.add_word(fixtures::word(7, "Haus", "house").with_status(WordStatus::WELL_KNOWN));
        let outcome = UpdateWordStatus::new(&repo)
            .execute(&request(None, Some(-1)))
            .unwrap();
        assert_eq!(outcome.failure(), Some(&ReviewError::StatusNotAdjustable(99)));
    }

    #[test]
    fn test_unknown_word() {
        let repo = MockReviewRepository::new();
        let outcome = UpdateWordStatus::new(&repo)
            .execute(&request(Some(3), None))
            .unwrap();
        assert_eq!(outcome.failure(), Some(&ReviewError::WordNotFound(7)));
    }
}
