//! Learning status state machine.
//!
//! Legal codes are the five learning levels `1..=5`, `98` (ignored) and `99`
//! (well known). Any legal code may follow any other; signed deltas only move
//! inside the learning levels.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::WordRecord;
use crate::review::ReviewError;

/// A word's learning stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct WordStatus(u8);

impl WordStatus {
    pub const MIN_LEVEL: u8 = 1;
    pub const MAX_LEVEL: u8 = 5;

    pub const NEW: WordStatus = WordStatus(1);
    pub const IGNORED: WordStatus = WordStatus(98);
    pub const WELL_KNOWN: WordStatus = WordStatus(99);

    /// All legal status codes, learning levels first.
    pub const ALL: [WordStatus; 7] = [
        WordStatus(1),
        WordStatus(2),
        WordStatus(3),
        WordStatus(4),
        WordStatus(5),
        WordStatus(98),
        WordStatus(99),
    ];

    /// Parse a stored or requested status code.
    pub fn from_code(code: i64) -> Result<Self, ReviewError> {
        match code {
            1..=5 | 98 | 99 => Ok(WordStatus(code as u8)),
            other => Err(ReviewError::InvalidStatus(other)),
        }
    }

    /// Learning level, clamped into `1..=5`.
    pub fn learning(level: i64) -> Self {
        WordStatus(level.clamp(Self::MIN_LEVEL as i64, Self::MAX_LEVEL as i64) as u8)
    }

    pub fn code(&self) -> i64 {
        self.0 as i64
    }

    pub fn is_learning(&self) -> bool {
        (Self::MIN_LEVEL..=Self::MAX_LEVEL).contains(&self.0)
    }

    pub fn is_ignored(&self) -> bool {
        *self == Self::IGNORED
    }

    pub fn is_well_known(&self) -> bool {
        *self == Self::WELL_KNOWN
    }

    /// Move by `delta` levels, clamped to `1..=5`.
    ///
    /// Ignored and well-known words have no position on the level scale and
    /// are refused.
    pub fn apply_delta(self, delta: i64) -> Result<Self, ReviewError> {
        if !self.is_learning() {
            return Err(ReviewError::StatusNotAdjustable(self.code()));
        }
        Ok(Self::learning(self.code().saturating_add(delta)))
    }

    /// Short label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self.0 {
            1 => "level_1",
            2 => "level_2",
            3 => "level_3",
            4 => "level_4",
            5 => "level_5",
            98 => "ignored",
            _ => "well_known",
        }
    }
}

impl TryFrom<i64> for WordStatus {
    type Error = ReviewError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<WordStatus> for i64 {
    fn from(status: WordStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for WordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A computed transition, ready to be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub word_id: i64,
    pub from: WordStatus,
    pub to: WordStatus,
}

impl StatusChange {
    /// Whether the transition was requested as a signed delta.
    pub fn kind(&self, by_delta: bool) -> &'static str {
        if by_delta {
            "delta"
        } else {
            "absolute"
        }
    }
}

/// Set a word to an arbitrary legal status.
pub fn set_absolute(word: &WordRecord, new_status: i64) -> Result<StatusChange, ReviewError> {
    let to = WordStatus::from_code(new_status)?;
    Ok(StatusChange {
        word_id: word.id,
        from: word.status,
        to,
    })
}

/// Shift a learning word by a signed number of levels.
pub fn apply_delta(word: &WordRecord, delta: i64) -> Result<StatusChange, ReviewError> {
    let to = word.status.apply_delta(delta)?;
    Ok(StatusChange {
        word_id: word.id,
        from: word.status,
        to,
    })
}
