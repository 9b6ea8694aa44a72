use dotenv::{dotenv, from_path};
use std::env;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("failed to load env file {path}: {reason}")]
    EnvFile { path: String, reason: String },

    #[error("{name} must be set")]
    Missing { name: &'static str },

    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Costs bcrypt accepts.
pub const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StorageBackend::Mongo),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnsConfig {
    pub topic: String,
    pub region: String,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_host: String,
    pub api_port: u16,
    pub storage: StorageBackend,
    /// Present whenever `storage` is `Mongo`.
    pub mongo: Option<MongoConfig>,
    /// Absent means updates are only logged.
    pub sns: Option<SnsConfig>,
    pub bcrypt_cost: u32,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from a specified `.env` file path or default to the root `.env` file.
    pub fn from_env(env_path: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(path) = env_path {
            from_path(path).map_err(|e| ConfigError::EnvFile {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        } else {
            // A missing default `.env` is fine
            dotenv().ok();
        }

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let storage = parse_or(&var, "STORAGE_BACKEND", StorageBackend::Mongo)?;

        let mongo = match storage {
            StorageBackend::Mongo => Some(MongoConfig {
                uri: var("MONGO_URI").ok_or(ConfigError::Missing { name: "MONGO_URI" })?,
                database: var("DATABASE").ok_or(ConfigError::Missing { name: "DATABASE" })?,
            }),
            StorageBackend::Memory => None,
        };

        let sns = var("SNS_TOPIC").map(|topic| SnsConfig {
            topic,
            region: var("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            endpoint: var("ENDPOINT"),
        });

        let bcrypt_cost: u32 = parse_or(&var, "BCRYPT_COST", 4)?;
        if !BCRYPT_COST_RANGE.contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        Ok(Self {
            api_host: var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            api_port: parse_or(&var, "API_PORT", 8080)?,
            storage,
            mongo,
            sns,
            bcrypt_cost,
            log_format: parse_or(&var, "LOG_FORMAT", LogFormat::Pretty)?,
        })
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

fn parse_or<T, V>(var: &V, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    V: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn memory_backend_needs_nothing_else() {
        let config = load(&[("STORAGE_BACKEND", "memory")]).unwrap();

        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.api_address(), "0.0.0.0:8080");
        assert_eq!(config.bcrypt_cost, 4);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.mongo.is_none());
        assert!(config.sns.is_none());
    }

    #[test]
    fn mongo_backend_is_the_default_and_requires_uri() {
        assert_eq!(
            load(&[]).unwrap_err(),
            ConfigError::Missing { name: "MONGO_URI" }
        );
        assert_eq!(
            load(&[("MONGO_URI", "mongodb://localhost:27017")]).unwrap_err(),
            ConfigError::Missing { name: "DATABASE" }
        );
    }

    #[test]
    fn full_configuration() {
        let config = load(&[
            ("MONGO_URI", "mongodb://localhost:27017"),
            ("DATABASE", "users"),
            ("SNS_TOPIC", "arn:aws:sns:us-east-1:000000000000:users"),
            ("AWS_REGION", "eu-west-1"),
            ("ENDPOINT", "http://localhost:4566"),
            ("API_PORT", "9000"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(
            config.mongo,
            Some(MongoConfig {
                uri: "mongodb://localhost:27017".to_string(),
                database: "users".to_string(),
            })
        );
        let sns = config.sns.unwrap();
        assert_eq!(sns.region, "eu-west-1");
        assert_eq!(sns.endpoint.as_deref(), Some("http://localhost:4566"));
        assert_eq!(config.api_port, 9000);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert_eq!(
            load(&[("STORAGE_BACKEND", "memory"), ("API_PORT", "eighty")]).unwrap_err(),
            ConfigError::Invalid {
                name: "API_PORT",
                value: "eighty".to_string()
            }
        );
        assert!(matches!(
            load(&[("STORAGE_BACKEND", "postgres")]).unwrap_err(),
            ConfigError::Invalid {
                name: "STORAGE_BACKEND",
                ..
            }
        ));
    }

    #[test]
    fn bcrypt_cost_outside_supported_range_is_rejected() {
        for cost in ["2", "3", "32", "40"] {
            assert_eq!(
                load(&[("STORAGE_BACKEND", "memory"), ("BCRYPT_COST", cost)]).unwrap_err(),
                ConfigError::Invalid {
                    name: "BCRYPT_COST",
                    value: cost.to_string()
                }
            );
        }

        let config = load(&[("STORAGE_BACKEND", "memory"), ("BCRYPT_COST", "31")]).unwrap();
        assert_eq!(config.bcrypt_cost, 31);
    }

    #[test]
    fn sns_region_defaults_when_topic_is_set() {
        let config = load(&[("STORAGE_BACKEND", "memory"), ("SNS_TOPIC", "topic")]).unwrap();
        assert_eq!(config.sns.unwrap().region, "us-east-1");
    }
}
