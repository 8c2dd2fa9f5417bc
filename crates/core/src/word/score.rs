//! Review score and due thresholds.
//!
//! `score = ((2.4^s + s - d - 1) / s - 2.4) / SCORE_NORMALIZER` for a
//! learning level `s` and whole-day age `d`. A negative score means the word
//! is due. The normalizer puts a level-5 word reviewed today at exactly 100.

use super::WordStatus;

pub const SCORE_NORMALIZER: f64 = 0.14325248;

const GROWTH: f64 = 2.4;

/// Raw score, unclamped. Ignored and well-known words always score 100.
pub fn raw_score(status: WordStatus, days_old: i64) -> f64 {
    if !status.is_learning() {
        return 100.0;
    }
    let s = status.code() as f64;
    let d = days_old as f64;
    ((GROWTH.powf(s) + s - d - 1.0) / s - GROWTH) / SCORE_NORMALIZER
}

/// Score clamped to `0..=100`, as shown to learners.
pub fn review_score(status: WordStatus, days_old: i64) -> u8 {
    raw_score(status, days_old).round().clamp(0.0, 100.0) as u8
}

/// Age in days beyond which a word at `level` becomes due.
///
/// Solving `score < 0` for `d` gives `d > 2.4^s - 1.4s - 1`. Rounded to
/// micro-days so the level-1 threshold is exactly zero.
pub fn due_threshold_days(level: u8) -> f64 {
    let s = level as f64;
    let threshold = GROWTH.powf(s) - (GROWTH - 1.0) * s - 1.0;
    (threshold * 1e6).round() / 1e6
}

/// Whole days until the word becomes due; `0` when it is already due.
pub fn days_until_due(status: WordStatus, days_old: i64) -> Option<i64> {
    if !status.is_learning() {
        return None;
    }
    let threshold = due_threshold_days(status.code() as u8);
    let first_due_day = threshold.floor() as i64 + 1;
    Some((first_due_day - days_old).max(0))
}
