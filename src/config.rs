use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Zero-shot image classification endpoint
    #[serde(default = "default_classifier_api_url")]
    pub classifier_api_url: String,

    /// Bearer token for the classification endpoint
    #[serde(default)]
    pub classifier_api_token: Option<String>,

    /// Per-request timeout for classifier calls, in seconds
    #[serde(default = "default_classifier_timeout_secs")]
    pub classifier_timeout_secs: u64,

    /// Directory uploaded images are written to
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Garment-type association rules (JSON)
    #[serde(default = "default_clothing_rules_path")]
    pub clothing_rules_path: PathBuf,

    /// Color association rules (JSON)
    #[serde(default = "default_color_rules_path")]
    pub color_rules_path: PathBuf,

    /// Maximum accepted request body size for uploads
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Externally visible base URL used to build absolute redirect links
    #[serde(default)]
    pub public_url: Option<String>,

    /// Fallback log filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_classifier_api_url() -> String {
    "https://api-inference.huggingface.co/models/patrickjohncyh/fashion-clip".to_string()
}

fn default_classifier_timeout_secs() -> u64 {
    30
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("static/uploads")
}

fn default_clothing_rules_path() -> PathBuf {
    PathBuf::from("data/clothing_rules.json")
}

fn default_color_rules_path() -> PathBuf {
    PathBuf::from("data/color_rules.json")
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn classifier_timeout(&self) -> Duration {
        Duration::from_secs(self.classifier_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = Config::from_vars(Vec::<(String, String)>::new()).unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert!(config.classifier_api_url.contains("fashion-clip"));
        assert_eq!(config.classifier_api_token, None);
        assert_eq!(config.classifier_timeout(), Duration::from_secs(30));
        assert_eq!(config.upload_dir, PathBuf::from("static/uploads"));
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.public_url, None);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_overrides_from_vars() {
        let config = Config::from_vars(vars(&[
            ("PORT", "8080"),
            ("CLASSIFIER_API_TOKEN", "hf_test"),
            ("UPLOAD_DIR", "/tmp/uploads"),
            ("PUBLIC_URL", "https://wardrobe.example"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.classifier_api_token.as_deref(), Some("hf_test"));
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/uploads"));
        assert_eq!(config.public_url.as_deref(), Some("https://wardrobe.example"));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = Config::from_vars(vars(&[("PORT", "not-a-port")]));
        assert!(result.is_err());
    }
}
