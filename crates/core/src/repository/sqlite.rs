//! SQLite-backed review repository.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::functions::FunctionFlags;
use rusqlite::{named_params, params, Connection, OptionalExtension};
use tracing::{debug, error};

use super::{
    AnnotatedSentence, LanguageCheck, LanguageSettings, NewLanguage, NewWord, RepositoryError,
    ReviewCounts, ReviewRepository, SentenceToken,
};
use crate::config::ReviewOrder;
use crate::metrics::STORAGE_ERRORS;
use crate::review::ReviewError;
use crate::selection::{QueryFragment, Selection, SelectionConfig};
use crate::word::{
    due_threshold_days, is_usable_translation, review_score, WordRecord, WordStatus,
};

/// Columns of a scored candidate row, in `row_to_word` order.
const WORD_COLUMNS: &str =
    "id, text, text_lc, translation, romanization, sentence, language_id, status, days_old";

/// SQLite-backed review repository.
pub struct SqliteReviewRepository {
    conn: Mutex<Connection>,
    order: ReviewOrder,
    fixed_now: Option<DateTime<Utc>>,
}

impl SqliteReviewRepository {
    /// Open (or create) the database file and its tables.
    pub fn new(path: &Path) -> Result<Self, RepositoryError> {
        let conn = Connection::open(path)?;
        Self::register_functions(&conn)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            order: ReviewOrder::default(),
            fixed_now: None,
        })
    }

    /// Create an in-memory repository (useful for testing).
    pub fn in_memory() -> Result<Self, RepositoryError> {
        let conn = Connection::open_in_memory()?;
        Self::register_functions(&conn)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            order: ReviewOrder::default(),
            fixed_now: None,
        })
    }

    /// Use `order` when picking the next due word.
    pub fn with_order(mut self, order: ReviewOrder) -> Self {
        self.order = order;
        self
    }

    /// Evaluate due dates against a fixed instant instead of the wall clock.
    pub fn with_fixed_now(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    /// SQL functions that apply the same text rules as the Rust side.
    ///
    /// `review_lower(x)` is Unicode lowercasing (SQLite's `LOWER` folds ASCII
    /// only). `review_usable_translation(x)` is 1 when the field has a usable
    /// first translation.
    fn register_functions(conn: &Connection) -> Result<(), RepositoryError> {
        let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

        conn.create_scalar_function("review_lower", 1, flags, |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        })?;

        conn.create_scalar_function("review_usable_translation", 1, flags, |ctx| {
            let translation: Option<String> = ctx.get(0)?;
            Ok(is_usable_translation(translation.as_deref()))
        })?;

        Ok(())
    }

    fn initialize_schema(conn: &Connection) -> Result<(), RepositoryError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS languages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                show_romanization INTEGER NOT NULL DEFAULT 0,
                text_size INTEGER NOT NULL DEFAULT 100,
                right_to_left INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS words (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                language_id INTEGER NOT NULL,
                text TEXT NOT NULL,
                text_lc TEXT NOT NULL,
                status INTEGER NOT NULL DEFAULT 1,
                translation TEXT,
                romanization TEXT,
                sentence TEXT,
                created_at TEXT NOT NULL,
                status_changed TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_words_language ON words(language_id);
            CREATE INDEX IF NOT EXISTS idx_words_status ON words(status);

            CREATE TABLE IF NOT EXISTS sentences (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                text_id INTEGER NOT NULL,
                language_id INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS text_items (
                text_id INTEGER NOT NULL,
                sentence_id INTEGER NOT NULL,
                position INTEGER NOT NULL,
                text TEXT NOT NULL,
                word_id INTEGER,
                PRIMARY KEY (text_id, position)
            );

            CREATE INDEX IF NOT EXISTS idx_text_items_word ON text_items(word_id);
            CREATE INDEX IF NOT EXISTS idx_text_items_sentence ON text_items(sentence_id);
            "#,
        )?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.conn
            .lock()
            .map_err(|_| RepositoryError::Database("connection lock poisoned".to_string()))
    }

    fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }

    fn today(&self) -> String {
        self.now().date_naive().format("%Y-%m-%d").to_string()
    }

    /// Scored testable candidates of a selection.
    ///
    /// `day_offset` shifts the evaluation date (1 = tomorrow). `overdue` is the
    /// number of days past the due threshold; a word is due when it is
    /// positive.
    fn candidates_cte(fragment: &QueryFragment, day_offset: i64) -> String {
        let thresholds = (WordStatus::MIN_LEVEL..=WordStatus::MAX_LEVEL)
            .map(|level| format!("WHEN {} THEN {}", level, due_threshold_days(level)))
            .collect::<Vec<_>>()
            .join(" ");

        format!(
            r#"WITH candidates AS (
                SELECT words.id AS id, words.text AS text, words.text_lc AS text_lc,
                       words.translation AS translation, words.romanization AS romanization,
                       words.sentence AS sentence, words.language_id AS language_id,
                       words.status AS status,
                       CAST(julianday(:today) - julianday(date(words.status_changed)) AS INTEGER) AS days_old
                FROM words
                WHERE ({fragment})
                  AND words.status BETWEEN {min} AND {max}
                  AND review_usable_translation(words.translation)
            ),
            scored AS (
                SELECT candidates.*,
                       (candidates.days_old + {offset}) - (CASE candidates.status {thresholds} END) AS overdue
                FROM candidates
            )"#,
            fragment = fragment.as_str(),
            min = WordStatus::MIN_LEVEL,
            max = WordStatus::MAX_LEVEL,
            offset = day_offset,
            thresholds = thresholds,
        )
    }

    fn row_to_word(row: &rusqlite::Row) -> rusqlite::Result<WordRecord> {
        let id: i64 = row.get(0)?;
        let status_code: i64 = row.get(7)?;
        let days_old: i64 = row.get::<_, Option<i64>>(8)?.unwrap_or(0);

        let status = WordStatus::from_code(status_code).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Integer, Box::new(e))
        })?;

        Ok(WordRecord {
            id,
            text: row.get(1)?,
            text_lowercase: row.get(2)?,
            translation: row.get(3)?,
            romanization: row.get(4)?,
            sentence: row.get(5)?,
            language_id: row.get(6)?,
            status,
            score: review_score(status, days_old),
            days_old,
        })
    }

    fn storage_error(operation: &str, e: rusqlite::Error) -> RepositoryError {
        STORAGE_ERRORS.with_label_values(&[operation]).inc();
        error!(operation, error = %e, "Review storage failure");
        RepositoryError::from(e)
    }

    /// Insert a language (used by import tooling and tests).
    pub fn insert_language(&self, language: &NewLanguage) -> Result<i64, RepositoryError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO languages (name, show_romanization, text_size, right_to_left) VALUES (?, ?, ?, ?)",
            params![
                language.name,
                language.show_romanization,
                language.text_size,
                language.right_to_left
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert a vocabulary item (used by import tooling and tests).
    pub fn insert_word(&self, word: &NewWord) -> Result<i64, RepositoryError> {
        let conn = self.conn()?;
        let now = self.now();
        let changed = word.status_changed.unwrap_or(now);
        conn.execute(
            "INSERT INTO words (language_id, text, text_lc, status, translation, romanization, sentence, created_at, status_changed) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                word.language_id,
                word.text,
                word.text.to_lowercase(),
                word.status.code(),
                word.translation,
                word.romanization,
                word.sentence,
                now.to_rfc3339_opts(SecondsFormat::Secs, true),
                changed.to_rfc3339_opts(SecondsFormat::Secs, true),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert a tokenized sentence of a text. Each token may link to a term.
    pub fn insert_sentence(
        &self,
        text_id: i64,
        language_id: i64,
        tokens: &[(&str, Option<i64>)],
    ) -> Result<i64, RepositoryError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO sentences (text_id, language_id) VALUES (?, ?)",
            params![text_id, language_id],
        )?;
        let sentence_id = tx.last_insert_rowid();

        let start: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM text_items WHERE text_id = ?",
            params![text_id],
            |row| row.get(0),
        )?;

        for (offset, (text, word_id)) in tokens.iter().enumerate() {
            tx.execute(
                "INSERT INTO text_items (text_id, sentence_id, position, text, word_id) VALUES (?, ?, ?, ?, ?)",
                params![text_id, sentence_id, start + offset as i64, text, word_id],
            )?;
        }

        tx.commit()?;
        Ok(sentence_id)
    }
}

impl ReviewRepository for SqliteReviewRepository {
    fn find_next_word_for_review(
        &self,
        fragment: &QueryFragment,
        exclude_previous_id: Option<i64>,
    ) -> Result<Option<WordRecord>, RepositoryError> {
        let conn = self.conn()?;
        let sql = format!(
            "{} SELECT {} FROM scored WHERE overdue > 0 AND (:exclude IS NULL OR id <> :exclude) ORDER BY {} LIMIT 1",
            Self::candidates_cte(fragment, 0),
            WORD_COLUMNS,
            self.order.order_by()
        );

        let word = conn
            .query_row(
                &sql,
                named_params! { ":today": self.today(), ":exclude": exclude_previous_id },
                Self::row_to_word,
            )
            .optional()
            .map_err(|e| Self::storage_error("find_next_word", e))?;

        debug!(
            found = word.as_ref().map(|w| w.id),
            excluded = exclude_previous_id,
            "Next word lookup"
        );
        Ok(word)
    }

    fn get_review_counts(&self, fragment: &QueryFragment) -> Result<ReviewCounts, RepositoryError> {
        let conn = self.conn()?;
        let sql = format!(
            "{} SELECT COALESCE(SUM(CASE WHEN overdue > 0 THEN 1 ELSE 0 END), 0), COUNT(*) FROM scored",
            Self::candidates_cte(fragment, 0)
        );

        conn.query_row(&sql, named_params! { ":today": self.today() }, |row| {
            Ok(ReviewCounts {
                due_now: row.get(0)?,
                total: row.get(1)?,
            })
        })
        .map_err(|e| Self::storage_error("review_counts", e))
    }

    fn get_tomorrow_count(&self, config: &SelectionConfig) -> Result<i64, RepositoryError> {
        let Ok(fragment) = config.to_sql_projection() else {
            return Ok(0);
        };

        let conn = self.conn()?;
        let sql = format!(
            "{} SELECT COUNT(*) FROM scored WHERE overdue > 0",
            Self::candidates_cte(&fragment, 1)
        );

        conn.query_row(&sql, named_params! { ":today": self.today() }, |row| row.get(0))
            .map_err(|e| Self::storage_error("tomorrow_count", e))
    }

    fn get_table_words(
        &self,
        fragment: &QueryFragment,
        limit: u32,
    ) -> Result<Vec<WordRecord>, RepositoryError> {
        let conn = self.conn()?;
        let sql = format!(
            "{} SELECT {} FROM scored ORDER BY overdue DESC, text_lc ASC, id ASC LIMIT :limit",
            Self::candidates_cte(fragment, 0),
            WORD_COLUMNS
        );

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| Self::storage_error("table_words", e))?;

        let rows = stmt
            .query_map(
                named_params! { ":today": self.today(), ":limit": limit },
                Self::row_to_word,
            )
            .map_err(|e| Self::storage_error("table_words", e))?;

        let mut words = Vec::new();
        for row_result in rows {
            words.push(row_result.map_err(|e| Self::storage_error("table_words", e))?);
        }

        Ok(words)
    }

    fn update_word_status(&self, id: i64, new_status: WordStatus) -> Result<bool, RepositoryError> {
        let conn = self.conn()?;
        let changed = self.now().to_rfc3339_opts(SecondsFormat::Secs, true);

        let updated = conn
            .execute(
                "UPDATE words SET status = ?, status_changed = ? WHERE id = ?",
                params![new_status.code(), changed, id],
            )
            .map_err(|e| Self::storage_error("update_status", e))?;

        Ok(updated == 1)
    }

    fn validate_single_language(
        &self,
        config: &SelectionConfig,
    ) -> Result<LanguageCheck, RepositoryError> {
        let fragment = match config.selection() {
            Some(Selection::Language(_)) => return Ok(LanguageCheck::ok()),
            Some(selection) if !selection.is_empty() => selection.to_sql_projection(),
            _ => return Ok(LanguageCheck::rejected(ReviewError::InvalidConfiguration)),
        };

        let conn = self.conn()?;
        let sql = format!(
            "SELECT COUNT(DISTINCT words.language_id) FROM words WHERE ({})",
            fragment.as_str()
        );
        let languages: i64 = conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|e| Self::storage_error("validate_language", e))?;

        if languages > 1 {
            Ok(LanguageCheck::rejected(ReviewError::MultiLanguageSelection(
                languages as usize,
            )))
        } else {
            Ok(LanguageCheck::ok())
        }
    }

    fn get_language_id_from_config(
        &self,
        config: &SelectionConfig,
    ) -> Result<Option<i64>, RepositoryError> {
        let fragment = match config.selection() {
            Some(Selection::Language(id)) => return Ok(Some(*id)),
            Some(selection) if !selection.is_empty() => selection.to_sql_projection(),
            _ => return Ok(None),
        };

        let conn = self.conn()?;
        let sql = format!(
            "SELECT words.language_id FROM words WHERE ({}) ORDER BY words.id LIMIT 1",
            fragment.as_str()
        );
        conn.query_row(&sql, [], |row| row.get(0))
            .optional()
            .map_err(|e| Self::storage_error("language_lookup", e))
    }

    fn get_word(&self, id: i64) -> Result<Option<WordRecord>, RepositoryError> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM (SELECT words.id AS id, words.text AS text, words.text_lc AS text_lc, \
             words.translation AS translation, words.romanization AS romanization, \
             words.sentence AS sentence, words.language_id AS language_id, words.status AS status, \
             CAST(julianday(:today) - julianday(date(words.status_changed)) AS INTEGER) AS days_old \
             FROM words WHERE words.id = :id)",
            WORD_COLUMNS
        );

        conn.query_row(
            &sql,
            named_params! { ":today": self.today(), ":id": id },
            Self::row_to_word,
        )
        .optional()
        .map_err(|e| Self::storage_error("get_word", e))
    }

    fn get_language_settings(
        &self,
        language_id: i64,
    ) -> Result<Option<LanguageSettings>, RepositoryError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, name, show_romanization, text_size, right_to_left FROM languages WHERE id = ?",
            params![language_id],
            |row| {
                Ok(LanguageSettings {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    show_romanization: row.get(2)?,
                    text_size: row.get(3)?,
                    right_to_left: row.get(4)?,
                })
            },
        )
        .optional()
        .map_err(|e| Self::storage_error("language_settings", e))
    }

    fn get_sentence_with_annotations(
        &self,
        word: &WordRecord,
    ) -> Result<Option<AnnotatedSentence>, RepositoryError> {
        let conn = self.conn()?;

        // Prefer linked occurrences, then plain text matches; newest text first.
        let sentence_id: Option<i64> = conn
            .query_row(
                "SELECT text_items.sentence_id FROM text_items
                 JOIN sentences ON sentences.id = text_items.sentence_id
                 WHERE sentences.language_id = :language
                   AND (text_items.word_id = :word OR review_lower(text_items.text) = :text_lc)
                 ORDER BY (text_items.word_id = :word) DESC, text_items.text_id DESC, text_items.position ASC
                 LIMIT 1",
                named_params! {
                    ":language": word.language_id,
                    ":word": word.id,
                    ":text_lc": word.text_lowercase,
                },
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| Self::storage_error("sentence_lookup", e))?;

        let Some(sentence_id) = sentence_id else {
            return Ok(None);
        };

        let mut stmt = conn
            .prepare(
                "SELECT text_items.text, text_items.word_id, words.status, words.translation
                 FROM text_items
                 LEFT JOIN words ON words.id = text_items.word_id
                 WHERE text_items.sentence_id = ?
                 ORDER BY text_items.position ASC",
            )
            .map_err(|e| Self::storage_error("sentence_tokens", e))?;

        let rows = stmt
            .query_map(params![sentence_id], |row| {
                let text: String = row.get(0)?;
                let term_id: Option<i64> = row.get(1)?;
                Ok(SentenceToken {
                    is_target: term_id == Some(word.id)
                        || text.to_lowercase() == word.text_lowercase,
                    text,
                    term_id,
                    status: row.get(2)?,
                    translation: row.get(3)?,
                })
            })
            .map_err(|e| Self::storage_error("sentence_tokens", e))?;

        let mut tokens = Vec::new();
        for row_result in rows {
            tokens.push(row_result.map_err(|e| Self::storage_error("sentence_tokens", e))?);
        }

        Ok(Some(AnnotatedSentence::from_tokens(sentence_id, tokens)))
    }
}
