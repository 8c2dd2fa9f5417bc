//! Building a selection configuration from raw request parameters.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::Deserialize;

use super::{Selection, SelectionConfig, SelectionKind};

/// `selection` parameter value for a word-id list.
pub const SELECTION_WORD_LIST: &str = "2";
/// `selection` parameter value for a text-id list.
pub const SELECTION_TEXT_LIST: &str = "3";

static ID_LIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\(\s*(-?\d+(?:\s*,\s*-?\d+)*)\s*\)|(-?\d+(?:\s*,\s*-?\d+)*))$")
        .expect("valid id list pattern")
});

/// Raw review parameters as they arrive from a request. Every field is
/// optional and kept as text so malformed values degrade to "absent".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewParams {
    /// `2` for a word list, `3` for a text list.
    pub selection: Option<String>,
    /// Id list such as `(1,2,3)`.
    #[serde(alias = "raw_selection_ids")]
    pub ids: Option<String>,
    #[serde(alias = "language_id")]
    pub lang: Option<String>,
    #[serde(alias = "text_id")]
    pub text: Option<String>,
    #[serde(rename = "type", alias = "review_type")]
    pub review_type: Option<String>,
    #[serde(alias = "is_table_mode")]
    pub table: Option<String>,
    pub word_mode: Option<String>,
}

impl ReviewParams {
    /// List kind requested through `selection`, if any.
    pub fn list_kind(&self) -> Option<SelectionKind> {
        match self.selection.as_deref().map(str::trim) {
            Some(SELECTION_WORD_LIST) => Some(SelectionKind::WordList),
            Some(SELECTION_TEXT_LIST) => Some(SelectionKind::TextList),
            _ => None,
        }
    }

    /// Clamped review type code; missing or malformed values give `1`.
    pub fn review_type_code(&self) -> i64 {
        parse_int(self.review_type.as_deref()).unwrap_or(1)
    }

    pub fn table_mode(&self) -> bool {
        parse_flag(self.table.as_deref())
    }

    pub fn word_mode_requested(&self) -> bool {
        parse_flag(self.word_mode.as_deref())
    }
}

/// Parse request parameters into a configuration.
///
/// Precedence: an id list (with `selection` naming its kind) wins over a
/// language, which wins over a text. Nothing usable yields a configuration
/// whose `is_valid()` is false.
pub fn parse_from_params(params: &ReviewParams) -> SelectionConfig {
    let review_type = params.review_type_code();

    let list = params
        .list_kind()
        .zip(params.ids.as_deref().and_then(parse_id_list));

    let selection = match list {
        Some((SelectionKind::TextList, ids)) => Some(Selection::text_list(ids)),
        Some((_, ids)) => Some(Selection::word_list(ids)),
        None => parse_int(params.lang.as_deref())
            .map(Selection::Language)
            .or_else(|| parse_int(params.text.as_deref()).map(Selection::Text)),
    };

    let config = match selection {
        Some(selection) => SelectionConfig::new(selection, review_type),
        None => SelectionConfig::invalid(review_type),
    };

    config
        .with_word_mode(params.word_mode_requested())
        .with_table_mode(params.table_mode())
}

/// Parse `(1,2,3)`, `(999)` or a bare `999`. Anything else is `None`.
pub fn parse_id_list(raw: &str) -> Option<Vec<i64>> {
    let captures = ID_LIST.captures(raw.trim())?;
    let list = captures.get(1).or_else(|| captures.get(2))?;
    list.as_str()
        .split(',')
        .map(|id| id.trim().parse::<i64>().ok())
        .collect()
}

fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i64>().ok())
}

fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|s| s.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}
