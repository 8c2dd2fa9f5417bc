//! Common test utilities for in-process API testing.
//!
//! The fixture builds the real router over a SQLite database in a temporary
//! directory with a pinned clock, so due dates are deterministic.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use lexireview_core::{
    Config, DatabaseConfig, InMemorySessionStore, NewLanguage, NewWord, ReviewRepository,
    SessionStore, SqliteReviewRepository, WordStatus,
};
use lexireview_server::api::middleware::SESSION_HEADER;
use lexireview_server::state::AppState;

/// Re-export fixtures for test convenience
pub use lexireview_core::testing::fixtures;

/// Test fixture for API testing.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_counts() {
///     let fixture = TestFixture::new();
///     let lang = fixture.language("German");
///     fixture.word(lang, "Haus", "house", 1, 3);
///
///     let response = fixture.get(&format!("/api/v1/review/counts?lang={}", lang)).await;
///     assert_eq!(response.body["dueNow"], 1);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Repository behind the router, for seeding and inspection
    pub repository: Arc<SqliteReviewRepository>,
    /// Session store behind the router
    pub sessions: Arc<InMemorySessionStore>,
    /// Temporary directory for the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    /// Session id echoed by the server
    pub session_id: Option<String>,
}

/// Clock used by every fixture.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
}

impl TestFixture {
    /// Create a new fixture over an empty database.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a fixture with custom configuration. The database path is
    /// always replaced with one in the fixture's temporary directory.
    pub fn with_config(mut config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        config.database = DatabaseConfig {
            path: db_path.clone(),
        };

        let repository = Arc::new(
            SqliteReviewRepository::new(&db_path)
                .expect("Failed to create repository")
                .with_order(config.review.order)
                .with_fixed_now(fixed_now()),
        );

        let sessions = Arc::new(InMemorySessionStore::from_config(&config.session));
        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&repository) as Arc<dyn ReviewRepository>,
            Arc::clone(&sessions) as Arc<dyn SessionStore>,
        ));
        let router = lexireview_server::api::create_router(state);

        Self {
            router,
            repository,
            sessions,
            temp_dir,
        }
    }

    /// Seed a language and return its id.
    pub fn language(&self, name: &str) -> i64 {
        self.repository
            .insert_language(&NewLanguage::new(name))
            .expect("Failed to insert language")
    }

    /// Seed a word at `level` whose status changed `age_days` ago.
    pub fn word(&self, language_id: i64, text: &str, translation: &str, level: i64, age_days: i64) -> i64 {
        self.repository
            .insert_word(
                &NewWord::new(language_id, text)
                    .with_translation(translation)
                    .with_status(WordStatus::learning(level))
                    .changed_at(fixed_now() - Duration::days(age_days)),
            )
            .expect("Failed to insert word")
    }

    /// Send a GET request without a session.
    pub async fn get(&self, path: &str) -> TestResponse {
        send(&self.router, "GET", path, None, None).await
    }

    /// Send a GET request in a session.
    pub async fn get_in(&self, session: &str, path: &str) -> TestResponse {
        send(&self.router, "GET", path, None, Some(session)).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        send(&self.router, "POST", path, Some(body), None).await
    }

    /// Fetch a raw text body (for the metrics endpoint).
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Build the application router over any repository.
pub fn router_for(config: Config, repository: Arc<dyn ReviewRepository>) -> Router {
    let sessions = Arc::new(InMemorySessionStore::from_config(&config.session));
    let state = Arc::new(AppState::new(config, repository, sessions));
    lexireview_server::api::create_router(state)
}

/// Send a request to a router.
pub async fn send(
    router: &Router,
    method: &str,
    path: &str,
    body: Option<Value>,
    session: Option<&str>,
) -> TestResponse {
    let mut request_builder = Request::builder().method(method).uri(path);

    if let Some(session) = session {
        request_builder = request_builder.header(SESSION_HEADER, session);
    }

    let body = if let Some(json_body) = body {
        request_builder = request_builder.header("Content-Type", "application/json");
        Body::from(serde_json::to_vec(&json_body).unwrap())
    } else {
        Body::empty()
    };

    let request = request_builder.body(body).unwrap();

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let session_id = response
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body_bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect body")
        .to_bytes();

    let body: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    TestResponse {
        status,
        body,
        session_id,
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
