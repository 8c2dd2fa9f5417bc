//! Compiles a selection into a predicate over the `words` table.

use std::fmt;

use tracing::debug;

use super::{Selection, SelectionConfig};
use crate::review::ReviewError;

/// A boolean SQL expression over the `words` table.
///
/// Only integer ids are ever interpolated; raw fragments come from
/// [`Selection::RawQuery`], which is reserved for internal callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFragment(String);

impl QueryFragment {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for QueryFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Selection {
    /// Compile this selection. Every kind has a compilation.
    pub fn to_sql_projection(&self) -> QueryFragment {
        let sql = match self {
            Selection::Language(id) => format!("words.language_id = {}", id),
            Selection::Text(id) => format!(
                "words.id IN (SELECT text_items.word_id FROM text_items WHERE text_items.text_id = {})",
                id
            ),
            Selection::WordList(ids) => format!("words.id IN ({})", join_ids(ids)),
            Selection::TextList(ids) => format!(
                "words.id IN (SELECT text_items.word_id FROM text_items WHERE text_items.text_id IN ({}))",
                join_ids(ids)
            ),
            Selection::RawQuery(fragment) => fragment.clone(),
        };
        QueryFragment(sql)
    }
}

impl SelectionConfig {
    /// Compile the configured selection.
    ///
    /// Fails with [`ReviewError::InvalidSelection`] when the configuration
    /// carries no usable selection.
    pub fn to_sql_projection(&self) -> Result<QueryFragment, ReviewError> {
        match self.selection() {
            Some(selection) if !selection.is_empty() => {
                let fragment = selection.to_sql_projection();
                debug!(kind = %selection.kind(), fragment = %fragment, "Compiled selection");
                Ok(fragment)
            }
            Some(selection) => Err(ReviewError::InvalidSelection(format!(
                "empty {} selection",
                selection.kind()
            ))),
            None => Err(ReviewError::InvalidSelection(
                "no selection kind".to_string(),
            )),
        }
    }
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(selection: Selection) -> String {
        SelectionConfig::new(selection, 1)
            .to_sql_projection()
            .unwrap()
            .into_string()
    }

    #[test]
    fn test_language_filter() {
        assert_eq!(compile(Selection::Language(5)), "words.language_id = 5");
    }

    #[test]
    fn test_text_joins_occurrences() {
        let sql = compile(Selection::Text(42));
        assert!(sql.contains("text_items.text_id = 42"));
        assert!(sql.starts_with("words.id IN (SELECT"));
    }

    #[test]
    fn test_word_list_filter() {
        assert_eq!(
            compile(Selection::word_list([3, 1, 2])),
            "words.id IN (1,2,3)"
        );
    }

    #[test]
    fn test_text_list_filter() {
        let sql = compile(Selection::text_list([9, 8]));
        assert!(sql.contains("text_items.text_id IN (8,9)"));
    }

    #[test]
    fn test_raw_query_verbatim() {
        let fragment = "words.status = 3 AND words.language_id = 2";
        assert_eq!(compile(Selection::raw_query(fragment)), fragment);
    }

    #[test]
    fn test_invalid_config_fails() {
        let result = SelectionConfig::invalid(1).to_sql_projection();
        assert!(matches!(result, Err(ReviewError::InvalidSelection(_))));
    }

    #[test]
    fn test_empty_list_fails() {
        let result = SelectionConfig::new(Selection::word_list([]), 1).to_sql_projection();
        assert!(matches!(result, Err(ReviewError::InvalidSelection(_))));
    }
}
