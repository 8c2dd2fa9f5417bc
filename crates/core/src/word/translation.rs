//! Translation field handling.

/// Placeholder stored when a term has been saved without a translation.
pub const NO_TRANSLATION: &str = "*";

const SEPARATORS: [char; 2] = [';', '；'];

/// First candidate of a multi-valued translation field, used as the quiz
/// answer. Empty fields and the `*` placeholder yield `None`.
pub fn first_translation(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NO_TRANSLATION {
        return None;
    }

    trimmed
        .split(SEPARATORS)
        .map(str::trim)
        .find(|candidate| !candidate.is_empty() && *candidate != NO_TRANSLATION)
        .map(str::to_string)
}

/// Whether the translation field makes a word testable.
pub fn is_usable_translation(raw: Option<&str>) -> bool {
    raw.and_then(first_translation).is_some()
}
