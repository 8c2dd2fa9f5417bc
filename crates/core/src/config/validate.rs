use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Table limits are positive and ordered
/// - Session capacity and idle timeout are positive
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.review.table_limit == 0 || config.review.max_table_limit == 0 {
        return Err(ConfigError::ValidationError(
            "review table limits must be greater than 0".to_string(),
        ));
    }

    if config.review.table_limit > config.review.max_table_limit {
        return Err(ConfigError::ValidationError(format!(
            "review.table_limit ({}) exceeds review.max_table_limit ({})",
            config.review.table_limit, config.review.max_table_limit
        )));
    }

    if config.session.capacity == 0 || config.session.idle_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "session.capacity and session.idle_timeout_secs must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReviewConfig, ServerConfig, SessionConfig};
    use std::net::IpAddr;

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".parse::<IpAddr>().unwrap(),
                port: 0,
            },
            ..Config::default()
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_table_limit_above_max_fails() {
        let config = Config {
            review: ReviewConfig {
                table_limit: 500,
                max_table_limit: 200,
                ..ReviewConfig::default()
            },
            ..Config::default()
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_zero_table_limit_fails() {
        let config = Config {
            review: ReviewConfig {
                table_limit: 0,
                ..ReviewConfig::default()
            },
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_session_capacity_fails() {
        let config = Config {
            session: SessionConfig {
                capacity: 0,
                ..SessionConfig::default()
            },
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
