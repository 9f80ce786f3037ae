use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/client.json";

fn default_node_http() -> String {
    "http://127.0.0.1:8081".to_string()
}

fn default_ollama_url() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_llm_model() -> String {
    "llama3.1".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_suggestion_timeout_secs() -> u64 {
    60
}

fn default_recipient() -> String {
    "userB".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Local HTTP API of the chat node.
    #[serde(default = "default_node_http")]
    pub node_http: String,
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,
    #[serde(default = "default_llm_model")]
    pub llm_model: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_suggestion_timeout_secs")]
    pub suggestion_timeout_secs: u64,
    /// Prefilled recipient in the compose bar.
    #[serde(default = "default_recipient")]
    pub default_recipient: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_http: default_node_http(),
            ollama_url: default_ollama_url(),
            llm_model: default_llm_model(),
            poll_interval_ms: default_poll_interval_ms(),
            suggestion_timeout_secs: default_suggestion_timeout_secs(),
            default_recipient: default_recipient(),
        }
    }
}

impl AppConfig {
    pub fn poll_interval(&self) -> Duration {
        // A zero period would make tokio's interval panic.
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn suggestion_timeout(&self) -> Duration {
        Duration::from_secs(self.suggestion_timeout_secs)
    }

    /// Apply `NODE_HTTP`, `OLLAMA_URL`, `LLM_MODEL` and `POLL_INTERVAL_MS`.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = lookup("NODE_HTTP") {
            self.node_http = value;
        }
        if let Some(value) = lookup("OLLAMA_URL") {
            self.ollama_url = value;
        }
        if let Some(value) = lookup("LLM_MODEL") {
            self.llm_model = value;
        }
        if let Some(value) = lookup("POLL_INTERVAL_MS") {
            match value.trim().parse() {
                Ok(ms) => self.poll_interval_ms = ms,
                Err(err) => log::warn!("Ignoring POLL_INTERVAL_MS={value}: {err}"),
            }
        }
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

pub fn save_config(path: &str, config: &AppConfig) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
}
