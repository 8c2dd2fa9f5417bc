use serde::Serialize;

use super::{reject, Outcome, ReviewError};
use crate::repository::{AnnotatedSentence, RepositoryError, ReviewRepository};

/// Example sentence of one term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceView {
    pub term_id: i64,
    /// Sentence with the term wrapped in `{}`, if one exists.
    pub sentence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<AnnotatedSentence>,
}

/// Looks up an example sentence for a term.
pub struct GetSentence<'a> {
    repository: &'a dyn ReviewRepository,
}

impl<'a> GetSentence<'a> {
    pub fn new(repository: &'a dyn ReviewRepository) -> Self {
        Self { repository }
    }

    /// A stored sentence with a marker is returned as is; otherwise one is
    /// assembled from the word's occurrences.
    pub fn execute(&self, term_id: i64) -> Result<Outcome<SentenceView>, RepositoryError> {
        let Some(word) = self.repository.get_word(term_id)? else {
            return Ok(reject(ReviewError::WordNotFound(term_id)));
        };

        if !word.needs_new_sentence() {
            return Ok(Outcome::Success(SentenceView {
                term_id,
                sentence: word.sentence,
                annotations: None,
            }));
        }

        let annotations = self
            .repository
            .get_sentence_with_annotations(&word)?
            .filter(AnnotatedSentence::has_target);

        Ok(Outcome::Success(SentenceView {
            term_id,
            sentence: annotations.as_ref().map(|s| s.text.clone()),
            annotations,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockReviewRepository};

    #[test]
    fn test_stored_sentence_is_used() {
        let repo = MockReviewRepository::new();
        repo.add_word(fixtures::word_with_sentence(1, "Haus", "house", "Ein {Haus}.", 1));

        let view = GetSentence::new(&repo).execute(1).unwrap().success().unwrap();
        assert_eq!(view.sentence.as_deref(), Some("Ein {Haus}."));
        assert_eq!(repo.call_count("get_sentence_with_annotations"), 0);
    }

    #[test]
    fn test_sentence_assembled_when_marker_missing() {
        let repo = MockReviewRepository::new();
        repo.add_word(fixtures::word_with_sentence(1, "Haus", "house", "Ein Haus.", 1));
        repo.set_sentence(1, fixtures::sentence(3, "mein Haus", "Haus"));

        let view = GetSentence::new(&repo).execute(1).unwrap().success().unwrap();
        assert_eq!(view.sentence.as_deref(), Some("mein {Haus}"));
        assert_eq!(view.annotations.map(|a| a.sentence_id), Some(3));
    }

    #[test]
    fn test_no_sentence_found() {
        let repo = MockReviewRepository::new();
        repo.add_word(fixtures::word(1, "Haus", "house"));

        let view = GetSentence::new(&repo).execute(1).unwrap().success().unwrap();
        assert!(view.sentence.is_none());
    }

    #[test]
    fn test_unknown_term() {
        let repo = MockReviewRepository::new();
        let outcome = GetSentence::new(&repo).execute(5).unwrap();
        assert_eq!(outcome.failure(), Some(&ReviewError::WordNotFound(5)));
    }
}
