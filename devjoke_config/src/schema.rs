use anyhow::Context;
use devjoke_core::DEFAULT_MODEL;
use devjoke_providers::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable holding the completion service credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    #[serde(default = "AgentConfig::default_model")]
    pub model: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: Self::default_model(),
        }
    }
}

impl AgentConfig {
    fn default_model() -> String {
        DEFAULT_MODEL.to_string()
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: OpenAIConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct OpenAIConfig {
    /// Empty means "read from the environment".
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "OpenAIConfig::default_api_base")]
    pub api_base: String,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: Self::default_api_base(),
        }
    }
}

impl OpenAIConfig {
    fn default_api_base() -> String {
        DEFAULT_BASE_URL.to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
    /// Seconds a browser session may sit idle before it is discarded.
    #[serde(default = "ServerConfig::default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            session_ttl_secs: Self::default_session_ttl_secs(),
        }
    }
}

impl ServerConfig {
    fn default_host() -> String {
        "127.0.0.1".to_string()
    }

    const fn default_port() -> u16 {
        8501
    }

    const fn default_session_ttl_secs() -> u64 {
        30 * 60
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

const CONFIG_TEMPLATE: &str = r#"{
  "agent": {
    "model": "gpt-4"
  },
  "providers": {
    "openai": {
      "api_key": "",
      "api_base": "https://api.openai.com/v1"
    }
  },
  "server": {
    "host": "127.0.0.1",
    "port": 8501,
    "session_ttl_secs": 1800
  }
}
"#;

impl Config {
    /// Directory holding `config.json`.
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("devjoke"))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load `~/devjoke/config.json`, or defaults when it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            info!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// The configured API key, falling back to `OPENAI_API_KEY`.
    pub fn resolve_api_key(&self) -> anyhow::Result<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    fn resolve_api_key_with<F>(&self, lookup: F) -> anyhow::Result<String>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let configured = self.providers.openai.api_key.trim();
        if !configured.is_empty() {
            return Ok(configured.to_string());
        }

        lookup(API_KEY_ENV)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No API key found. Set {API_KEY_ENV} or providers.openai.api_key in the config file"
                )
            })
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_path = Self::ensure_config_dir()?.join("config.json");
        Self::write_template(&config_path)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Export {API_KEY_ENV} or put your key in providers.openai.api_key");
        println!("   2. Run 'devjoke serve' and open the printed address");
        println!();
        println!("🔧 Configuration options:");
        println!("   - agent.model: completion model (default gpt-4)");
        println!("   - providers.openai.api_base: any OpenAI-compatible endpoint");
        println!("   - server.host / server.port: where the web UI listens");
        println!("   - server.session_ttl_secs: idle time before a browser session is dropped");
        println!();
        Ok(())
    }

    fn write_template(config_path: &Path) -> anyhow::Result<()> {
        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(config_path, CONFIG_TEMPLATE)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_matches_defaults() {
        let config: Config = serde_json::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.agent.model, "gpt-4");
        assert_eq!(config.server.bind_address(), "127.0.0.1:8501");
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config: Config = serde_json::from_str(r#"{"server": {"port": 9000}}"#).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.session_ttl_secs, 1800);
        assert_eq!(config.providers.openai.api_base, DEFAULT_BASE_URL);
        assert!(config.providers.openai.api_key.is_empty());
    }

    #[test]
    fn configured_key_wins_over_environment() {
        let mut config = Config::default();
        config.providers.openai.api_key = " sk-file ".to_string();
        let key = config
            .resolve_api_key_with(|_| Some("sk-env".to_string()))
            .unwrap();
        assert_eq!(key, "sk-file");
    }

    #[test]
    fn environment_key_used_when_unconfigured() {
        let config = Config::default();
        let key = config
            .resolve_api_key_with(|name| {
                assert_eq!(name, API_KEY_ENV);
                Some("sk-env".to_string())
            })
            .unwrap();
        assert_eq!(key, "sk-env");

        assert!(config.resolve_api_key_with(|_| None).is_err());
        assert!(
            config
                .resolve_api_key_with(|_| Some("   ".to_string()))
                .is_err()
        );
    }

    #[test]
    fn load_from_file_and_refuse_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        Config::write_template(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, Config::default());

        assert!(Config::write_template(&path).is_err());
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err}").contains("Invalid config file"));
    }
}
