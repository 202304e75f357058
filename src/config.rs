use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub fetch: FetchConfig,
    /// Path to a JSON model file (weights + bias). When unset, a uniform
    /// baseline model is used.
    pub model_path: Option<String>,
    /// When set, every classification is appended to this JSONL file.
    pub history_path: Option<String>,
    /// Benign-class probability at or above which a URL is labeled safe.
    pub safe_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub page_timeout_seconds: u64,
    pub whois_timeout_seconds: u64,
    pub dns_timeout_seconds: u64,
    pub indexing_timeout_seconds: u64,
    /// Search endpoint used for the indexing check.
    pub indexing_endpoint: String,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            page_timeout_seconds: 5,
            whois_timeout_seconds: 5,
            dns_timeout_seconds: 5,
            indexing_timeout_seconds: 5,
            indexing_endpoint: "https://html.duckduckgo.com/html/".to_string(),
            user_agent: format!("phishscan/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            fetch: FetchConfig::default(),
            model_path: None,
            history_path: None,
            safe_threshold: 0.5,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
