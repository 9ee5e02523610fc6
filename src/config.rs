// ⚙️ Configuration - Environment driven, `.env` aware
//
// KFO_BIND_ADDR       address the API server listens on   (0.0.0.0:3000)
// KFO_STORE           booking backend: sqlite | memory    (sqlite)
// KFO_DB_PATH         SQLite file                         (bookings.db)
// KFO_CHAT_URL        chat-completions endpoint           (OpenAI)
// KFO_CHAT_MODEL      model name                          (gpt-4o-mini)
// OPENAI_API_KEY      bearer key; chat falls back when unset
// KFO_REDUCED_MOTION  true/1/yes collapses the gate transition

use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_DB_PATH: &str = "bookings.db";
pub const DEFAULT_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Sqlite,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Ok(StoreBackend::Memory),
            "sqlite" | "sql" | "db" => Ok(StoreBackend::Sqlite),
            other => Err(anyhow!("Unknown store backend '{}' (expected sqlite or memory)", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub store: StoreBackend,
    pub db_path: PathBuf,
    pub chat_url: String,
    pub chat_model: String,
    pub chat_api_key: Option<String>,
    pub reduced_motion: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            store: StoreBackend::Sqlite,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            chat_url: DEFAULT_CHAT_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            chat_api_key: None,
            reduced_motion: false,
        }
    }
}

impl Config {
    /// Load `.env` (if present) and read the process environment
    pub fn from_env() -> Result<Self> {
        // A missing .env is normal; real env vars still apply
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let store = match get("KFO_STORE") {
            Some(value) => value.parse()?,
            None => defaults.store,
        };

        let reduced_motion = match get("KFO_REDUCED_MOTION") {
            Some(value) => parse_flag(&value)
                .ok_or_else(|| anyhow!("KFO_REDUCED_MOTION must be true or false, got '{}'", value))?,
            None => defaults.reduced_motion,
        };

        Ok(Config {
            bind_addr: get("KFO_BIND_ADDR").unwrap_or(defaults.bind_addr),
            store,
            db_path: get("KFO_DB_PATH").map(PathBuf::from).unwrap_or(defaults.db_path),
            chat_url: get("KFO_CHAT_URL").unwrap_or(defaults.chat_url),
            chat_model: get("KFO_CHAT_MODEL").unwrap_or(defaults.chat_model),
            chat_api_key: get("OPENAI_API_KEY"),
            reduced_motion,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.store, StoreBackend::Sqlite);
        assert_eq!(config.db_path, PathBuf::from("bookings.db"));
        assert_eq!(config.chat_api_key, None);
        assert!(!config.reduced_motion);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("KFO_STORE", "Memory"),
            ("KFO_BIND_ADDR", "127.0.0.1:8080"),
            ("OPENAI_API_KEY", "sk-test"),
            ("KFO_REDUCED_MOTION", "yes"),
        ])
        .unwrap();

        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.chat_api_key.as_deref(), Some("sk-test"));
        assert!(config.reduced_motion);
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config_from(&[("OPENAI_API_KEY", "   "), ("KFO_CHAT_MODEL", "")]).unwrap();

        assert_eq!(config.chat_api_key, None);
        assert_eq!(config.chat_model, DEFAULT_CHAT_MODEL);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config_from(&[("KFO_STORE", "postgres")]).is_err());
        assert!(config_from(&[("KFO_REDUCED_MOTION", "maybe")]).is_err());
    }
}
