//! Denormalized view of a vocabulary item under review.

use serde::{Deserialize, Serialize};

use super::{first_translation, has_sentence_marker, WordStatus};

/// One vocabulary item plus its review metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    /// Stable identifier, never reused.
    pub id: i64,
    /// Surface form as entered.
    pub text: String,
    /// Lowercased surface form.
    pub text_lowercase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub romanization: Option<String>,
    /// Example sentence with the term wrapped in `{}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentence: Option<String>,
    pub language_id: i64,
    pub status: WordStatus,
    /// Review score, `0..=100`. Lower means closer to (or past) due.
    pub score: u8,
    /// Whole days since the last status change.
    pub days_old: i64,
}

impl WordRecord {
    /// A fresh level-1 record with no optional fields.
    pub fn new(id: i64, text: impl Into<String>, language_id: i64) -> Self {
        let text = text.into();
        Self {
            id,
            text_lowercase: text.to_lowercase(),
            text,
            translation: None,
            romanization: None,
            sentence: None,
            language_id,
            status: WordStatus::NEW,
            score: 0,
            days_old: 0,
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

    pub fn has_sentence(&self) -> bool {
        self.sentence.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    /// The stored sentence cannot be used as quiz context; a replacement must
    /// be fetched.
    pub fn needs_new_sentence(&self) -> bool {
        match self.sentence.as_deref() {
            Some(sentence) if !sentence.trim().is_empty() => !has_sentence_marker(sentence),
            _ => true,
        }
    }

    pub fn is_learning(&self) -> bool {
        self.status.is_learning()
    }

    pub fn is_well_known(&self) -> bool {
        self.status.is_well_known()
    }

    pub fn is_ignored(&self) -> bool {
        self.status.is_ignored()
    }

    /// Canonical quiz answer drawn from the translation field.
    pub fn first_translation(&self) -> Option<String> {
        self.translation.as_deref().and_then(first_translation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_lowercases_text() {
        let word = WordRecord::new(1, "Straße", 3);
        assert_eq!(word.text_lowercase, "straße");
        assert!(word.is_learning());
    }

    #[test]
    fn test_needs_new_sentence_without_sentence() {
        let word = WordRecord::new(1, "Haus", 1);
        assert!(!word.has_sentence());
        assert!(word.needs_new_sentence());
    }

    #[test]
    fn test_needs_new_sentence_with_empty_sentence() {
        let word = WordRecord::new(1, "Haus", 1).with_sentence("");
        assert!(!word.has_sentence());
        assert!(word.needs_new_sentence());
    }

    #[test]
    fn test_needs_new_sentence_without_marker() {
        let word = WordRecord::new(1, "Haus", 1).with_sentence("Das Haus ist rot.");
        assert!(word.has_sentence());
        assert!(word.needs_new_sentence());
    }

    #[test]
    fn test_marked_sentence_is_usable() {
        let word = WordRecord::new(1, "Haus", 1).with_sentence("Das {Haus} ist rot.");
        assert!(!word.needs_new_sentence());
    }

    #[test]
    fn test_status_predicates() {
        let word = WordRecord::new(1, "Haus", 1).with_status(WordStatus::WELL_KNOWN);
        assert!(word.is_well_known());
        assert!(!word.is_learning());
        let word = word.with_status(WordStatus::IGNORED);
        assert!(word.is_ignored());
    }

    #[test]
    fn test_first_translation_delegates() {
        let word = WordRecord::new(1, "Haus", 1).with_translation("house; home");
        assert_eq!(word.first_translation().as_deref(), Some("house"));
    }

    #[test]
    fn test_serializes_status_as_code() {
        let word = WordRecord::new(9, "Baum", 2).with_status(WordStatus::learning(4));
        let json = serde_json::to_value(&word).unwrap();
        assert_eq!(json["status"], 4);
        assert!(json.get("translation").is_none());
    }
}
