use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use sqlx::postgres::PgConnectOptions;

use crate::error::{Error, Result};

/// Runtime settings, read once at start-up and handed to whoever needs them.
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub bind_addr: SocketAddr,
    /// Every listing is scoped to this state.
    pub state_id: i32,
    pub init_schema: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub name: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, falling back to
    /// local development defaults for anything unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let database = DatabaseConfig {
            url: lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()),
            name: get("DB_NAME", "bincom_election_db"),
            user: get("DB_USER", "postgres"),
            password: get("DB_PASSWORD", "admin"),
            host: get("DB_HOST", "localhost"),
            port: parse_var("DB_PORT", &get("DB_PORT", "5432"))?,
            max_connections: parse_var("DB_MAX_CONNECTIONS", &get("DB_MAX_CONNECTIONS", "5"))?,
        };

        Ok(Self {
            database,
            bind_addr: parse_var("BIND_ADDR", &get("BIND_ADDR", "127.0.0.1:5000"))?,
            state_id: parse_var("ELECTION_STATE_ID", &get("ELECTION_STATE_ID", "25"))?,
            init_schema: parse_flag("INIT_SCHEMA", &get("INIT_SCHEMA", "true"))?,
        })
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url)
                .map_err(|e| Error::Config(format!("DATABASE_URL: {}", e)));
        }
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name))
    }

    /// Human-readable target for log lines; never includes the password.
    pub fn describe(&self) -> String {
        match &self.url {
            Some(_) => "DATABASE_URL".to_string(),
            None => format!("{}@{}:{}/{}", self.user, self.host, self.port, self.name),
        }
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("{}={:?}: {}", key, raw, e)))
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!("{}={:?}: expected a boolean", key, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn falls_back_to_local_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database.url, None);
        assert_eq!(config.database.name, "bincom_election_db");
        assert_eq!(config.database.user, "postgres");
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.bind_addr, "127.0.0.1:5000".parse().unwrap());
        assert_eq!(config.state_id, 25);
        assert!(config.init_schema);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://u:p@db/elections"),
            ("DB_PORT", "6543"),
            ("ELECTION_STATE_ID", "7"),
            ("INIT_SCHEMA", "off"),
        ])
        .unwrap();
        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://u:p@db/elections")
        );
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.state_id, 7);
        assert!(!config.init_schema);
        assert_eq!(config.database.describe(), "DATABASE_URL");
    }

    #[test]
    fn blank_values_use_defaults() {
        let config = config_from(&[("DATABASE_URL", "  "), ("DB_NAME", "")]).unwrap();
        assert_eq!(config.database.url, None);
        assert_eq!(config.database.name, "bincom_election_db");
    }

    #[test]
    fn rejects_bad_port() {
        let err = config_from(&[("DB_PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.starts_with("DB_PORT")));
    }

    #[test]
    fn describe_hides_password() {
        let config = config_from(&[("DB_PASSWORD", "s3cret")]).unwrap();
        let described = config.database.describe();
        assert!(!described.contains("s3cret"));
        assert_eq!(described, "postgres@localhost:5432/bincom_election_db");
    }
}
