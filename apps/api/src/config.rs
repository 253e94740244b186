use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// JSON record the resume is persisted to.
    pub data_path: PathBuf,
    /// When false the resume lives in memory only and resets on restart.
    pub persist: bool,
    /// Embed a generation timestamp in the exported PDF's info dictionary.
    pub export_timestamp: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            data_path: std::env::var("RESUME_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./resume_data.json")),
            persist: env_flag("RESUME_PERSIST", true)?,
            export_timestamp: env_flag("EXPORT_TIMESTAMP", false)?,
        })
    }
}

fn env_flag(key: &str, default: bool) -> Result<bool> {
    match std::env::var(key) {
        Ok(raw) => parse_flag(&raw)
            .with_context(|| format!("Environment variable '{key}' must be true or false")),
        Err(_) => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognized flag value '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_accepts_common_spellings() {
        assert!(parse_flag("true").unwrap());
        assert!(parse_flag(" ON ").unwrap());
        assert!(parse_flag("1").unwrap());
        assert!(!parse_flag("false").unwrap());
        assert!(!parse_flag("no").unwrap());
    }

    #[test]
    fn test_parse_flag_rejects_garbage() {
        assert!(parse_flag("maybe").is_err());
        assert!(parse_flag("").is_err());
    }
}
