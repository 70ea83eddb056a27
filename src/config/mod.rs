use crate::core::error::AitripError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Backends the dispatch core knows how to talk to. `Mock` is the
/// zero-configuration local simulator; everything else is an HTTP vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Mock,
    OpenAI,
    Gemini,
    Doubao,
    QwenMax,
    Qwen3,
    Ernie,
    Spark,
}

impl Provider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mock" => Some(Provider::Mock),
            "openai" => Some(Provider::OpenAI),
            "gemini" => Some(Provider::Gemini),
            "doubao" => Some(Provider::Doubao),
            "qwen-max" => Some(Provider::QwenMax),
            "qwen3" => Some(Provider::Qwen3),
            "ernie" => Some(Provider::Ernie),
            "spark" => Some(Provider::Spark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Mock => "mock",
            Provider::OpenAI => "openai",
            Provider::Gemini => "gemini",
            Provider::Doubao => "doubao",
            Provider::QwenMax => "qwen-max",
            Provider::Qwen3 => "qwen3",
            Provider::Ernie => "ernie",
            Provider::Spark => "spark",
        }
    }

    pub fn all() -> &'static [Provider] {
        &[
            Provider::Mock,
            Provider::OpenAI,
            Provider::Gemini,
            Provider::Doubao,
            Provider::QwenMax,
            Provider::Qwen3,
            Provider::Ernie,
            Provider::Spark,
        ]
    }

    /// The simulator is the only provider that works without a token.
    pub fn requires_token(&self) -> bool {
        !matches!(self, Provider::Mock)
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Mock => "",
            Provider::OpenAI => "https://api.openai.com/v1",
            Provider::Gemini => "https://generativelanguage.googleapis.com",
            Provider::Doubao => "https://ark.cn-beijing.volces.com/api/v3",
            Provider::QwenMax | Provider::Qwen3 => "https://dashscope.aliyuncs.com",
            Provider::Ernie => "https://aip.baidubce.com",
            Provider::Spark => "https://spark-api.xf-yun.com",
        }
    }
}

impl Default for Provider {
    fn default() -> Self {
        Provider::Mock
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider id used when the command line does not name one.
    #[serde(default)]
    pub active_provider: Option<String>,
    /// Scenario the shell starts in (itinerary, hotel, log).
    #[serde(default)]
    pub default_scenario: Option<String>,
    /// Apply plan updates without asking for confirmation.
    #[serde(default)]
    pub auto_apply: bool,
    /// API tokens keyed by provider id.
    #[serde(default)]
    pub tokens: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            active_provider: Some("mock".to_string()),
            default_scenario: None,
            auto_apply: false,
            tokens: HashMap::new(),
        }
    }
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".aitrip")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// The active plan, persisted between runs.
    pub fn plan_path() -> PathBuf {
        Self::config_dir().join("plan.json")
    }

    /// Named plan snapshots managed by /save, /load, /list, /delete.
    pub fn plans_dir() -> PathBuf {
        Self::config_dir().join("plans")
    }

    pub fn input_history_path() -> PathBuf {
        Self::config_dir().join("input_history.txt")
    }

    pub fn load() -> Result<Config, AitripError> {
        let path = Self::config_path();

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config = serde_yml::from_str::<Config>(&contents)
                .map_err(|e| AitripError::Config(format!("Parse {}: {}", path.display(), e)))?;
            return Ok(config);
        }

        let config_dir = Self::config_dir();
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config = Config::default();
        let _ = config.save();
        Ok(config)
    }

    pub fn save(&self) -> Result<(), AitripError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(&path, yaml_content)?;
        Ok(())
    }

    /// Token configured for a provider id, empty string when absent.
    pub fn token_for(&self, provider: &str) -> &str {
        self.tokens.get(provider).map(String::as_str).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_ids_round_trip() {
        for provider in Provider::all() {
            assert_eq!(Provider::from_str(provider.as_str()), Some(*provider));
        }
        assert_eq!(Provider::from_str("QWEN-MAX"), Some(Provider::QwenMax));
        assert_eq!(Provider::from_str("sparkle"), None);
    }

    #[test]
    fn only_mock_skips_token() {
        for provider in Provider::all() {
            assert_eq!(provider.requires_token(), *provider != Provider::Mock);
        }
    }

    #[test]
    fn config_yaml_shape() {
        let yaml = "active_provider: openai\nauto_apply: true\ntokens:\n  openai: sk-test\n";
        let config: Config = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.active_provider.as_deref(), Some("openai"));
        assert!(config.auto_apply);
        assert_eq!(config.token_for("openai"), "sk-test");
        assert_eq!(config.token_for("gemini"), "");
    }
}
