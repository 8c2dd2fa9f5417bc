//! Vocabulary items under review and their learning status.

mod score;
mod sentence;
mod status;
mod translation;
mod types;

pub use score::{days_until_due, due_threshold_days, raw_score, review_score, SCORE_NORMALIZER};
pub use sentence::{has_sentence_marker, mask_sentence, SENTENCE_MARKER_CLOSE, SENTENCE_MARKER_OPEN};
pub use status::{apply_delta, set_absolute, StatusChange, WordStatus};
pub use translation::{first_translation, is_usable_translation, NO_TRANSLATION};
pub use types::WordRecord;
