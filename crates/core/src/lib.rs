pub mod config;
pub mod metrics;
pub mod repository;
pub mod review;
pub mod selection;
pub mod session;
pub mod testing;
pub mod word;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    ReviewConfig, ReviewOrder, ServerConfig, SessionConfig,
};
pub use repository::{
    AnnotatedSentence, LanguageCheck, LanguageSettings, NewLanguage, NewWord, RepositoryError,
    ReviewCounts, ReviewRepository, SentenceToken, SqliteReviewRepository,
};
pub use review::{
    resolve, GetNextWord, GetReviewCounts, GetSentence, GetTableWords, GetTomorrowCount,
    NextQuizItem, Outcome, ReviewError, SentenceView, StatusUpdateRequest, StatusUpdated,
    TableWords, TomorrowCount, UpdateWordStatus,
};
pub use selection::{
    parse_from_params, QueryFragment, QuizDirection, ReviewParams, ReviewType, Selection,
    SelectionConfig, SelectionKind,
};
pub use session::{InMemorySessionStore, ReviewSession, SessionStore};
pub use word::{WordRecord, WordStatus};
