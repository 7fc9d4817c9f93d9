use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Runtime settings, read from the environment (a `.env` file is loaded by
/// the binary first) and optionally overridden by CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub data_dir: PathBuf,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let api_url = lookup("CHATGRID_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let data_dir = match lookup("CHATGRID_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let http_timeout = match lookup("CHATGRID_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    AppError::Config(format!("CHATGRID_HTTP_TIMEOUT_SECS must be a number, got '{raw}'"))
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self { api_url, data_dir, http_timeout })
    }

    pub fn with_overrides(mut self, api_url: Option<String>, data_dir: Option<PathBuf>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }
}

fn default_data_dir() -> Result<PathBuf, AppError> {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .map(|base| base.join("chatgrid"))
        .ok_or_else(|| AppError::Config("Cannot determine a data directory; set CHATGRID_DATA_DIR".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_explicit_values() {
        let config = Config::from_lookup(lookup(&[
            ("CHATGRID_API_URL", "https://api.example.com/api"),
            ("CHATGRID_DATA_DIR", "/tmp/chatgrid-test"),
            ("CHATGRID_HTTP_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://api.example.com/api");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/chatgrid-test"));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn falls_back_to_defaults() {
        let config = Config::from_lookup(lookup(&[("CHATGRID_DATA_DIR", "/tmp/x")])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.http_timeout, Duration::from_secs(60));
    }

    #[test]
    fn rejects_bad_timeout() {
        let err = Config::from_lookup(lookup(&[
            ("CHATGRID_DATA_DIR", "/tmp/x"),
            ("CHATGRID_HTTP_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn cli_overrides_win() {
        let config = Config::from_lookup(lookup(&[("CHATGRID_DATA_DIR", "/tmp/x")]))
            .unwrap()
            .with_overrides(Some("http://other/api".into()), None);
        assert_eq!(config.api_url, "http://other/api");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/x"));
    }
}
