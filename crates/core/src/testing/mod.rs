//! Testing utilities and a scripted repository.
//!
//! # Example
//!
//! ```rust,ignore
//! use lexireview_core::testing::{fixtures, MockReviewRepository};
//!
//! let repo = MockReviewRepository::new();
//! repo.add_due_word(fixtures::word(1, "Haus", "house"));
//! repo.set_language_id(Some(1));
//!
//! // Use in AppState or hand to a use case...
//! ```

mod mock_repository;

pub use mock_repository::MockReviewRepository;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::repository::{AnnotatedSentence, LanguageSettings, SentenceToken};
    use crate::word::{WordRecord, WordStatus};

    /// A level-1 word with a translation.
    pub fn word(id: i64, text: &str, translation: &str) -> WordRecord {
        WordRecord::new(id, text, 1).with_translation(translation)
    }

    /// A word at `level` with a stored example sentence.
    pub fn word_with_sentence(
        id: i64,
        text: &str,
        translation: &str,
        sentence: &str,
        level: i64,
    ) -> WordRecord {
        word(id, text, translation)
            .with_sentence(sentence)
            .with_status(WordStatus::learning(level))
    }

    pub fn language(id: i64, name: &str) -> LanguageSettings {
        LanguageSettings {
            id,
            name: name.to_string(),
            show_romanization: false,
            text_size: 100,
            right_to_left: false,
        }
    }

    /// Whitespace-tokenized sentence; tokens equal to `target` are marked.
    pub fn sentence(sentence_id: i64, text: &str, target: &str) -> AnnotatedSentence {
        let mut tokens = Vec::new();
        for (i, part) in text.split(' ').enumerate() {
            if i > 0 {
                tokens.push(token(" ", false));
            }
            tokens.push(token(part, part == target));
        }
        AnnotatedSentence::from_tokens(sentence_id, tokens)
    }

    fn token(text: &str, is_target: bool) -> SentenceToken {
        SentenceToken {
            text: text.to_string(),
            term_id: None,
            status: None,
            translation: None,
            is_target,
        }
    }
}
