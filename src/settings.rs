//! Runtime settings read from environment variables (`.env` is loaded by the binary).

use crate::error::ConfigError;
use crate::password::DEFAULT_COST;
use regex::Regex;
use std::net::SocketAddr;
use std::sync::OnceLock;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/party";
pub const DEFAULT_SCHEMA: &str = "party";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpSettings {
    pub bind_addr: SocketAddr,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
    pub body_limit: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        HttpSettings {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            cors_origins: Vec::new(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub database_url: String,
    /// PostgreSQL schema holding the party tables.
    pub schema: String,
    pub backend: StoreBackend,
    pub max_connections: u32,
    pub bcrypt_cost: u32,
    pub http: HttpSettings,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let schema = get("PARTY_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.into());
        if !identifier_regex().is_match(&schema) {
            return Err(ConfigError::InvalidValue {
                key: "PARTY_SCHEMA",
                reason: format!("'{}' is not a valid PostgreSQL identifier", schema),
            });
        }

        let backend = match get("STORE_BACKEND").as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "STORE_BACKEND",
                    reason: format!("expected 'postgres' or 'memory', got '{}'", other),
                })
            }
        };

        let bind = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind.parse::<SocketAddr>().map_err(|e| ConfigError::InvalidValue {
            key: "BIND_ADDR",
            reason: e.to_string(),
        })?;

        let max_connections = parse_number(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "DB_MAX_CONNECTIONS",
                reason: "must be at least 1".into(),
            });
        }

        let bcrypt_cost = parse_number(get("BCRYPT_COST"), "BCRYPT_COST", DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "BCRYPT_COST",
                reason: format!("{} is outside 4..=31", bcrypt_cost),
            });
        }

        let body_limit = parse_number(get("BODY_LIMIT_BYTES"), "BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT)?;

        let cors_origins = get("CORS_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty() && *o != "*")
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Settings {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            schema,
            backend,
            max_connections,
            bcrypt_cost,
            http: HttpSettings {
                bind_addr,
                cors_origins,
                body_limit,
            },
        })
    }
}

fn parse_number<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(v) => v.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            reason: format!("'{}': {}", v, e),
        }),
    }
}

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("identifier pattern is a valid regex"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(s.schema, "party");
        assert_eq!(s.backend, StoreBackend::Postgres);
        assert_eq!(s.max_connections, 5);
        assert_eq!(s.bcrypt_cost, 10);
        assert_eq!(s.http, HttpSettings::default());
    }

    #[test]
    fn overrides() {
        let s = settings(&[
            ("STORE_BACKEND", "Memory"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
            ("BCRYPT_COST", "4"),
            ("PARTY_SCHEMA", "party_test"),
        ])
        .unwrap();
        assert_eq!(s.backend, StoreBackend::Memory);
        assert_eq!(s.http.bind_addr.port(), 8080);
        assert_eq!(s.http.cors_origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(s.bcrypt_cost, 4);
        assert_eq!(s.schema, "party_test");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let s = settings(&[("BCRYPT_COST", "  "), ("CORS_ALLOWED_ORIGINS", "*")]).unwrap();
        assert_eq!(s.bcrypt_cost, 10);
        assert!(s.http.cors_origins.is_empty());
    }

    #[test]
    fn invalid_values_name_the_key() {
        let cases = [
            ("PARTY_SCHEMA", "drop table;"),
            ("STORE_BACKEND", "redis"),
            ("BIND_ADDR", "nowhere"),
            ("DB_MAX_CONNECTIONS", "0"),
            ("BCRYPT_COST", "32"),
            ("BODY_LIMIT_BYTES", "-1"),
        ];
        for (key, value) in cases {
            match settings(&[(key, value)]) {
                Err(ConfigError::InvalidValue { key: k, .. }) => assert_eq!(k, key),
                other => panic!("{}={} gave {:?}", key, value, other),
            }
        }
    }
}
