//! Selection configuration: which words a review session draws from and how
//! they are quizzed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::review::ReviewError;

/// The five ways a learner can select words for review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    Language,
    Text,
    WordList,
    TextList,
    RawQuery,
}

impl SelectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionKind::Language => "language",
            SelectionKind::Text => "text",
            SelectionKind::WordList => "word_list",
            SelectionKind::TextList => "text_list",
            SelectionKind::RawQuery => "raw_query",
        }
    }
}

impl fmt::Display for SelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionKind {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "language" | "lang" => Ok(SelectionKind::Language),
            "text" => Ok(SelectionKind::Text),
            "word_list" | "words" => Ok(SelectionKind::WordList),
            "text_list" | "texts" => Ok(SelectionKind::TextList),
            "raw_query" => Ok(SelectionKind::RawQuery),
            other => Err(ReviewError::InvalidSelection(other.to_string())),
        }
    }
}

/// A selection together with its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Selection {
    Language(i64),
    Text(i64),
    /// Term ids, sorted and deduplicated.
    WordList(Vec<i64>),
    /// Text ids, sorted and deduplicated.
    TextList(Vec<i64>),
    /// Pre-built predicate over `words`. Only internal callers may build one.
    RawQuery(String),
}

impl Selection {
    pub fn word_list(ids: impl IntoIterator<Item = i64>) -> Self {
        Selection::WordList(normalize_ids(ids))
    }

    pub fn text_list(ids: impl IntoIterator<Item = i64>) -> Self {
        Selection::TextList(normalize_ids(ids))
    }

    /// Wrap a trusted predicate. Never pass request input here.
    pub fn raw_query(fragment: impl Into<String>) -> Self {
        Selection::RawQuery(fragment.into())
    }

    pub fn kind(&self) -> SelectionKind {
        match self {
            Selection::Language(_) => SelectionKind::Language,
            Selection::Text(_) => SelectionKind::Text,
            Selection::WordList(_) => SelectionKind::WordList,
            Selection::TextList(_) => SelectionKind::TextList,
            Selection::RawQuery(_) => SelectionKind::RawQuery,
        }
    }

    /// True when the selection value carries nothing to select by.
    pub fn is_empty(&self) -> bool {
        match self {
            Selection::Language(_) | Selection::Text(_) => false,
            Selection::WordList(ids) | Selection::TextList(ids) => ids.is_empty(),
            Selection::RawQuery(fragment) => fragment.trim().is_empty(),
        }
    }

    /// Ids of a list selection.
    pub fn ids(&self) -> Option<&[i64]> {
        match self {
            Selection::WordList(ids) | Selection::TextList(ids) => Some(ids),
            _ => None,
        }
    }
}

fn normalize_ids(ids: impl IntoIterator<Item = i64>) -> Vec<i64> {
    let mut ids: Vec<i64> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Quiz direction of a review type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizDirection {
    /// Show the term, ask for the translation.
    TermToTranslation,
    /// Show the translation, ask for the term.
    TranslationToTerm,
    /// Show the sentence with the term blanked out, ask for the term.
    Cloze,
}

impl QuizDirection {
    pub fn base_code(&self) -> u8 {
        match self {
            QuizDirection::TermToTranslation => 1,
            QuizDirection::TranslationToTerm => 2,
            QuizDirection::Cloze => 3,
        }
    }
}

/// Review type as a direction plus a word-mode flag.
///
/// The legacy integer code folds both into one value: `1..=3` are the
/// sentence-context directions, `4` and `5` are directions `1` and `2`
/// without sentence context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct ReviewType {
    direction: QuizDirection,
    word_mode: bool,
}

impl ReviewType {
    pub const MIN_CODE: i64 = 1;
    pub const MAX_CODE: i64 = 5;
    const WORD_MODE_OFFSET: u8 = 3;

    /// Decode a legacy code, clamping out-of-range values into `1..=5`.
    pub fn from_code(code: i64) -> Self {
        match code.clamp(Self::MIN_CODE, Self::MAX_CODE) {
            1 => Self::new(QuizDirection::TermToTranslation, false),
            2 => Self::new(QuizDirection::TranslationToTerm, false),
            3 => Self::new(QuizDirection::Cloze, false),
            4 => Self::new(QuizDirection::TermToTranslation, true),
            _ => Self::new(QuizDirection::TranslationToTerm, true),
        }
    }

    /// Cloze has no word-mode variant; the flag is dropped for it.
    pub fn new(direction: QuizDirection, word_mode: bool) -> Self {
        Self {
            direction,
            word_mode: word_mode && direction != QuizDirection::Cloze,
        }
    }

    pub fn direction(&self) -> QuizDirection {
        self.direction
    }

    pub fn word_mode(&self) -> bool {
        self.word_mode
    }

    /// Legacy integer code.
    pub fn code(&self) -> u8 {
        let base = self.direction.base_code();
        if self.word_mode {
            base + Self::WORD_MODE_OFFSET
        } else {
            base
        }
    }

    /// Code with the word-mode offset stripped.
    pub fn base_type(&self) -> u8 {
        self.direction.base_code()
    }
}

impl Default for ReviewType {
    fn default() -> Self {
        Self::from_code(Self::MIN_CODE)
    }
}

impl From<i64> for ReviewType {
    fn from(code: i64) -> Self {
        Self::from_code(code)
    }
}

impl From<ReviewType> for i64 {
    fn from(review_type: ReviewType) -> Self {
        review_type.code() as i64
    }
}

/// Everything needed to run a review over a selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionConfig {
    selection: Option<Selection>,
    review_type: ReviewType,
    word_mode: bool,
    table_mode: bool,
}

impl SelectionConfig {
    pub fn new(selection: Selection, review_type: i64) -> Self {
        Self {
            selection: Some(selection),
            review_type: ReviewType::from_code(review_type),
            word_mode: false,
            table_mode: false,
        }
    }

    /// A configuration without a selection. `is_valid()` is false.
    pub fn invalid(review_type: i64) -> Self {
        Self {
            selection: None,
            review_type: ReviewType::from_code(review_type),
            word_mode: false,
            table_mode: false,
        }
    }

    /// Request word mode. Review types 4 and 5 are in word mode regardless.
    pub fn with_word_mode(mut self, requested: bool) -> Self {
        self.word_mode = requested;
        self
    }

    pub fn with_table_mode(mut self, table_mode: bool) -> Self {
        self.table_mode = table_mode;
        self
    }

    pub fn with_review_type(mut self, review_type: ReviewType) -> Self {
        self.review_type = review_type;
        self
    }

    pub fn is_valid(&self) -> bool {
        self.selection.as_ref().is_some_and(|s| !s.is_empty())
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Kind of the selection, if any.
    pub fn review_key(&self) -> Option<SelectionKind> {
        self.selection.as_ref().map(Selection::kind)
    }

    pub fn review_type(&self) -> ReviewType {
        self.review_type
    }

    /// `true` for review types 4 and 5 and whenever requested explicitly.
    pub fn word_mode(&self) -> bool {
        self.word_mode || self.review_type.word_mode()
    }

    pub fn is_table_mode(&self) -> bool {
        self.table_mode
    }

    pub fn base_type(&self) -> u8 {
        self.review_type.base_type()
    }

    /// Short canonical form for links: `lang=5`, `text=42`, `selection=2`
    /// (word list), `selection=3` (text list), `selection=1` (raw query).
    ///
    /// List contents are not embedded; they are recovered from session state.
    pub fn to_url_property(&self) -> String {
        match &self.selection {
            Some(Selection::Language(id)) => format!("lang={}", id),
            Some(Selection::Text(id)) => format!("text={}", id),
            Some(Selection::WordList(_)) => "selection=2".to_string(),
            Some(Selection::TextList(_)) => "selection=3".to_string(),
            Some(Selection::RawQuery(_)) => "selection=1".to_string(),
            None => String::new(),
        }
    }
}
