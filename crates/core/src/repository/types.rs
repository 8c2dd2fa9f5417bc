//! Data shapes returned by the review repository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::review::ReviewError;
use crate::word::WordStatus;

/// Storage failure. Never used for "nothing found".
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(e: rusqlite::Error) -> Self {
        RepositoryError::Database(e.to_string())
    }
}

/// Due and total counts for a selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCounts {
    /// Testable words due now.
    #[serde(rename = "dueNow")]
    pub due_now: i64,
    /// All testable words in the selection.
    pub total: i64,
}

/// Outcome of the single-language check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageCheck {
    pub valid: bool,
    pub error: Option<ReviewError>,
}

impl LanguageCheck {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn rejected(error: ReviewError) -> Self {
        Self {
            valid: false,
            error: Some(error),
        }
    }
}

/// Display settings of a language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageSettings {
    pub id: i64,
    pub name: String,
    pub show_romanization: bool,
    /// Font size in percent.
    pub text_size: u32,
    pub right_to_left: bool,
}

/// One token of an annotated example sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceToken {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    /// The token is the term under test.
    pub is_target: bool,
}

/// An example sentence split into annotated tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedSentence {
    pub sentence_id: i64,
    /// Reassembled sentence with the target wrapped in `{}`.
    pub text: String,
    pub tokens: Vec<SentenceToken>,
}

impl AnnotatedSentence {
    /// Build from tokens, wrapping target tokens in braces.
    pub fn from_tokens(sentence_id: i64, tokens: Vec<SentenceToken>) -> Self {
        let text = tokens
            .iter()
            .map(|token| {
                if token.is_target {
                    format!("{{{}}}", token.text)
                } else {
                    token.text.clone()
                }
            })
            .collect();
        Self {
            sentence_id,
            text,
            tokens,
        }
    }

    pub fn has_target(&self) -> bool {
        self.tokens.iter().any(|t| t.is_target)
    }
}

/// A language to insert.
#[derive(Debug, Clone)]
pub struct NewLanguage {
    pub name: String,
    pub show_romanization: bool,
    pub text_size: u32,
    pub right_to_left: bool,
}

impl NewLanguage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            show_romanization: false,
            text_size: 100,
            right_to_left: false,
        }
    }
}

/// A vocabulary item to insert.
#[derive(Debug, Clone)]
pub struct NewWord {
    pub language_id: i64,
    pub text: String,
    pub translation: Option<String>,
    pub romanization: Option<String>,
    pub sentence: Option<String>,
    pub status: WordStatus,
    /// When the current status was set. `None` means now.
    pub status_changed: Option<DateTime<Utc>>,
}

impl NewWord {
    pub fn new(language_id: i64, text: impl Into<String>) -> Self {
        Self {
            language_id,
            text: text.into(),
            translation: None,
            romanization: None,
            sentence: None,
            status: WordStatus::NEW,
            status_changed: None,
        }
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = Some(translation.into());
        self
    }

    pub fn with_sentence(mut self, sentence: impl Into<String>) -> Self {
        self.sentence = Some(sentence.into());
        self
    }

    pub fn with_status(mut self, status: WordStatus) -> Self {
        self.status = status;
        self
    }

    pub fn changed_at(mut self, at: DateTime<Utc>) -> Self {
        self.status_changed = Some(at);
        self
    }
}
