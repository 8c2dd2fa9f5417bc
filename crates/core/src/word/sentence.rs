//! Example sentences with the tested term wrapped in curly braces.

pub const SENTENCE_MARKER_OPEN: char = '{';
pub const SENTENCE_MARKER_CLOSE: char = '}';

/// True when the sentence contains a `{...}` span with the open brace first.
pub fn has_sentence_marker(sentence: &str) -> bool {
    match sentence.find(SENTENCE_MARKER_OPEN) {
        Some(open) => sentence[open..].contains(SENTENCE_MARKER_CLOSE),
        None => false,
    }
}

/// Replace every `{...}` span with `[replacement]`.
///
/// Unbalanced braces are copied through unchanged.
pub fn mask_sentence(sentence: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(sentence.len() + replacement.len());
    let mut rest = sentence;

    while let Some(open) = rest.find(SENTENCE_MARKER_OPEN) {
        let Some(close) = rest[open..].find(SENTENCE_MARKER_CLOSE) else {
            break;
        };
        out.push_str(&rest[..open]);
        out.push('[');
        out.push_str(replacement);
        out.push(']');
        rest = &rest[open + close + SENTENCE_MARKER_CLOSE.len_utf8()..];
    }

    out.push_str(rest);
    out
}
