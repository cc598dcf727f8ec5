use serde::Deserialize;
use std::{error::Error, fs::OpenOptions, io::Read};

/// Dashboard configuration, loaded from a JSON file. Every field has a
/// development default so the dashboard runs with no config at all.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_mock_listen")]
    pub mock_listen: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_mock_listen() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend_url: default_backend_url(),
            mock_listen: default_mock_listen(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load(config_path: &str) -> std::result::Result<Self, Box<dyn Error>> {
        let mut file = OpenOptions::new().read(true).open(config_path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Ok(serde_json::from_str::<Config>(&contents)?)
    }

    /// Load from `LEDGERWATCH_CONFIG` if set, else `ledgerwatch.json` in the
    /// working directory, falling back to defaults when neither exists.
    pub fn load_or_default() -> Self {
        let path = std::env::var("LEDGERWATCH_CONFIG")
            .unwrap_or_else(|_| "ledgerwatch.json".to_string());
        Config::load(&path).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.backend_url, "http://localhost:8000");
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn explicit_fields_win() {
        let config: Config =
            serde_json::from_str(r#"{"backend_url":"http://api:9000","request_timeout_secs":3}"#)
                .unwrap();
        assert_eq!(config.backend_url, "http://api:9000");
        assert_eq!(config.request_timeout_secs, 3);
    }
}
