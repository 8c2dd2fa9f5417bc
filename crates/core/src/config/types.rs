use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub review: ReviewConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("lexireview.db")
}

/// How due candidates are ranked when picking the next quiz item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOrder {
    /// Most overdue first, ties broken randomly.
    #[default]
    Overdue,
    /// Uniformly random among due words.
    Random,
    /// Longest time since the last status change first.
    Oldest,
}

impl ReviewOrder {
    /// SQL `ORDER BY` body for this policy, over the scored candidate columns
    /// `id`, `days_old` and `overdue` (days past the due threshold).
    pub fn order_by(&self) -> &'static str {
        match self {
            ReviewOrder::Overdue => "overdue DESC, RANDOM()",
            ReviewOrder::Random => "RANDOM()",
            ReviewOrder::Oldest => "days_old DESC, id ASC",
        }
    }
}

/// Review engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReviewConfig {
    /// Ordering policy for next-word selection.
    #[serde(default)]
    pub order: ReviewOrder,
    /// Number of rows returned in table mode when the request gives no limit.
    #[serde(default = "default_table_limit")]
    pub table_limit: u32,
    /// Upper bound for a requested table-mode limit.
    #[serde(default = "default_max_table_limit")]
    pub max_table_limit: u32,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            order: ReviewOrder::default(),
            table_limit: default_table_limit(),
            max_table_limit: default_max_table_limit(),
        }
    }
}

fn default_table_limit() -> u32 {
    100
}

fn default_max_table_limit() -> u32 {
    1000
}

/// Learner session retention
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Most sessions kept at once; the least recently written is evicted.
    #[serde(default = "default_session_capacity")]
    pub capacity: usize,
    /// Sessions not written for this many seconds are dropped.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: default_session_capacity(),
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

fn default_session_capacity() -> usize {
    10_000
}

fn default_idle_timeout_secs() -> u64 {
    24 * 60 * 60
}
