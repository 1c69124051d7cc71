/// Configuration schema and defaults for alertdash.
///
/// Defines the TOML-serializable configuration structure with the sections
/// `[server]`, `[llm]`, `[document]`, `[dashboard]`, and `[logging]`.
///
/// Every field except `llm.api_key` has a usable built-in default. Without an
/// API key the chatbot stays disabled but every other view works.
use serde::{Deserialize, Serialize};

use crate::alerts::{DEFAULT_POOL_SIZE, DEFAULT_SAMPLE_SIZE};

/// Shared link of the reference document fed to the chatbot.
pub const DEFAULT_DOCUMENT_URL: &str =
    "https://drive.google.com/file/d/1Xj2RXKEI120nuY6j-irt_LR1rZTPccoO/view?usp=sharing";

/// Direct-download prefix; the file id is appended.
pub const DEFAULT_DOWNLOAD_BASE: &str = "https://drive.google.com/uc?export=download&id=";

pub const DEFAULT_LLM_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_LLM_MODEL: &str = "deepseek-chat";
pub const DEFAULT_ADDR: &str = "127.0.0.1:8501";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level alertdash configuration.
///
/// Maps directly to `~/.alertdash/config.toml` and `.alertdash.toml`. All
/// sections and fields are optional in the files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub document: DocumentConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (`host:port`).
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
    /// Sessions idle for longer than this are dropped.
    pub session_idle_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            open_browser: false,
            session_idle_secs: 3600,
        }
    }
}

// ---------------------------------------------------------------------------
// [llm]
// ---------------------------------------------------------------------------

/// Chat-completion endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Bearer credential. Required for the chatbot.
    pub api_key: String,
    /// OpenAI-compatible base URL (without `/chat/completions`).
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Upper bound on completion length.
    pub max_tokens: u32,
    /// Request timeout. Unset means the transport default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_LLM_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 350,
            timeout_ms: None,
        }
    }
}

// ---------------------------------------------------------------------------
// [document]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Shared link of the reference document.
    pub url: String,
    pub download_base: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DOCUMENT_URL.to_string(),
            download_base: DEFAULT_DOWNLOAD_BASE.to_string(),
            timeout_ms: None,
        }
    }
}

// ---------------------------------------------------------------------------
// [dashboard]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Alerts generated once per session.
    pub pool_size: usize,
    /// Alerts drawn per "Generate Random Messages" click.
    pub sample_size: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

impl DashConfig {
    /// Copy of the config safe for display: the API key is masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.llm.api_key.is_empty() {
            copy.llm.api_key = "********".to_string();
        }
        copy
    }

    /// Annotated default config file written by `alertdash config init`.
    pub fn default_toml() -> String {
        format!(
            r#"# alertdash configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (ALERTDASH_*)
#   2. Project config (.alertdash.toml in current directory)
#   3. User global config (~/.alertdash/config.toml)
#   4. Built-in defaults

[server]
addr = "{DEFAULT_ADDR}"
open_browser = false
session_idle_secs = 3600

[llm]
api_key = ""                          # Required for the chatbot (or ALERTDASH_API_KEY)
base_url = "{DEFAULT_LLM_URL}"
model = "{DEFAULT_LLM_MODEL}"
temperature = 0.7
max_tokens = 350
# timeout_ms = 30000                  # Unset: transport default

[document]
url = "{DEFAULT_DOCUMENT_URL}"
download_base = "{DEFAULT_DOWNLOAD_BASE}"
# timeout_ms = 30000

[dashboard]
pool_size = {DEFAULT_POOL_SIZE}
sample_size = {DEFAULT_SAMPLE_SIZE}

[logging]
level = "info"                        # RUST_LOG overrides
"#
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = DashConfig::default();
        assert_eq!(config.server.addr, "127.0.0.1:8501");
        assert!(config.llm.api_key.is_empty());
        assert_eq!(config.llm.model, "deepseek-chat");
        assert!((config.llm.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.llm.max_tokens, 350);
        assert_eq!(config.dashboard.pool_size, 300);
        assert_eq!(config.dashboard.sample_size, 5);
        assert!(config.document.timeout_ms.is_none());
    }

    #[test]
    fn deserialize_minimal_toml() {
        let config: DashConfig = toml::from_str(
            r#"
[llm]
api_key = "sk-test"
"#,
        )
        .unwrap();
        assert_eq!(config.llm.api_key, "sk-test");
        assert_eq!(config.llm.base_url, DEFAULT_LLM_URL);
        assert_eq!(config.dashboard.pool_size, 300);
    }

    #[test]
    fn deserialize_overrides_and_timeouts() {
        let config: DashConfig = toml::from_str(
            r#"
[dashboard]
pool_size = 50
sample_size = 10

[document]
timeout_ms = 1500
"#,
        )
        .unwrap();
        assert_eq!(config.dashboard.pool_size, 50);
        assert_eq!(config.dashboard.sample_size, 10);
        assert_eq!(config.document.timeout_ms, Some(1500));
    }

    #[test]
    fn empty_toml_produces_defaults() {
        let config: DashConfig = toml::from_str("").unwrap();
        assert_eq!(config, DashConfig::default());
    }

    #[test]
    fn default_toml_parses_back() {
        let config: DashConfig = toml::from_str(&DashConfig::default_toml()).unwrap();
        assert_eq!(config, DashConfig::default());
    }

    #[test]
    fn redacted_masks_api_key() {
        let mut config = DashConfig::default();
        assert!(config.redacted().llm.api_key.is_empty());
        config.llm.api_key = "sk-secret".to_string();
        assert_eq!(config.redacted().llm.api_key, "********");
    }
}
