use std::collections::HashMap;
use thiserror::Error;

use crate::db::migrations::DEFAULT_MAX_CONNECTIONS;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub database_max_connections: u32,
    pub admin_username: String,
    pub admin_email: String,
    pub admin_password: String,
    pub seed_sample_elections: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

const DEFAULT_DATABASE_PATH: &str = "data/voting_system.db";

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = non_empty(&env_map, "DATABASE_PATH")
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());

        let database_max_connections = match non_empty(&env_map, "DATABASE_MAX_CONNECTIONS") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "DATABASE_MAX_CONNECTIONS".to_string(),
                        "must be a positive integer".to_string(),
                    ))
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let admin_username =
            non_empty(&env_map, "ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string());
        let admin_email =
            non_empty(&env_map, "ADMIN_EMAIL").unwrap_or_else(|| "admin@cbu.ac.zm".to_string());
        let admin_password =
            non_empty(&env_map, "ADMIN_PASSWORD").unwrap_or_else(|| "admin123".to_string());

        let seed_sample_elections = match env_map
            .get("SEED_SAMPLE_ELECTIONS")
            .map(|s| s.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("") | Some("true") | Some("1") | Some("yes") => true,
            Some("false") | Some("0") | Some("no") => false,
            Some(other) => {
                return Err(ConfigError::InvalidValue(
                    "SEED_SAMPLE_ELECTIONS".to_string(),
                    format!("must be true or false, got {}", other),
                ))
            }
        };

        Ok(Config {
            port,
            database_path,
            database_max_connections,
            admin_username,
            admin_email,
            admin_password,
            seed_sample_elections,
        })
    }
}

fn non_empty(env_map: &HashMap<String, String>, key: &str) -> Option<String> {
    env_map
        .get(key)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_env_empty() {
        let config = Config::from_env_map(HashMap::new()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, "data/voting_system.db");
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.admin_username, "admin");
        assert!(config.seed_sample_elections);
    }

    #[test]
    fn test_overrides() {
        let mut env_map = HashMap::new();
        env_map.insert("PORT".to_string(), "9000".to_string());
        env_map.insert("DATABASE_PATH".to_string(), "/tmp/votes.db".to_string());
        env_map.insert("ADMIN_PASSWORD".to_string(), "s3cret".to_string());
        env_map.insert("SEED_SAMPLE_ELECTIONS".to_string(), "FALSE".to_string());

        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_path, "/tmp/votes.db");
        assert_eq!(config.admin_password, "s3cret");
        assert!(!config.seed_sample_elections);
    }

    #[test]
    fn test_blank_database_path_falls_back() {
        let mut env_map = HashMap::new();
        env_map.insert("DATABASE_PATH".to_string(), "   ".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.database_path, "data/voting_system.db");
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = HashMap::new();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_zero_max_connections_rejected() {
        let mut env_map = HashMap::new();
        env_map.insert("DATABASE_MAX_CONNECTIONS".to_string(), "0".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "DATABASE_MAX_CONNECTIONS"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_seed_flag() {
        let mut env_map = HashMap::new();
        env_map.insert("SEED_SAMPLE_ELECTIONS".to_string(), "maybe".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "SEED_SAMPLE_ELECTIONS"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}
