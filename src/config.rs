//! Server configuration read from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `8000` |
//! | `GREETING_BACKEND` | `llm` when `OPENAI_API_KEY` is set, otherwise `offline` |
//! | `GREETING_MODEL` | `gpt-4o-mini` |
//! | `OPENAI_API_KEY` | unset |
//! | `OPENAI_BASE_URL` | `https://api.openai.com/v1` |
//! | `GREETING_LLM_TIMEOUT_SECS` | `120` |
//! | `GREETING_CONVERSATION_TTL_SECS` | unset (conversations are kept forever) |

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got '{value}'")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Which text generator answers requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorBackend {
    Llm,
    Offline,
}

impl FromStr for GeneratorBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "llm" | "openai" => Ok(Self::Llm),
            "offline" => Ok(Self::Offline),
            _ => Err(ConfigError::Invalid {
                key: "GREETING_BACKEND",
                value: s.to_string(),
                expected: "'llm' or 'offline'",
            }),
        }
    }
}

/// Settings for the chat completions client.
#[derive(Clone, PartialEq)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Full server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub backend: GeneratorBackend,
    pub llm: LlmConfig,
    /// Idle time after which a conversation may be dropped. `None` keeps
    /// every conversation for the process lifetime.
    pub conversation_ttl: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            backend: GeneratorBackend::Offline,
            llm: LlmConfig::default(),
            conversation_ttl: None,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(v) => parse_number("PORT", &v)?,
            None => defaults.port,
        };

        let api_key = get("OPENAI_API_KEY");
        let backend = match get("GREETING_BACKEND") {
            Some(v) => v.parse()?,
            None if api_key.is_some() => GeneratorBackend::Llm,
            None => GeneratorBackend::Offline,
        };

        let timeout = match get("GREETING_LLM_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_number("GREETING_LLM_TIMEOUT_SECS", &v)?),
            None => defaults.llm.timeout,
        };

        let conversation_ttl = get("GREETING_CONVERSATION_TTL_SECS")
            .map(|v| parse_number("GREETING_CONVERSATION_TTL_SECS", &v).map(Duration::from_secs))
            .transpose()?;

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            backend,
            llm: LlmConfig {
                model: get("GREETING_MODEL").unwrap_or(defaults.llm.model),
                api_key,
                base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.llm.base_url),
                timeout,
            },
            conversation_ttl,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_number<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
        expected: "a non-negative integer",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg, ServerConfig::default());
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8000");
        assert_eq!(cfg.backend, GeneratorBackend::Offline);
        assert!(cfg.conversation_ttl.is_none());
    }

    #[test]
    fn test_api_key_selects_llm_backend() {
        let cfg = config(&[("OPENAI_API_KEY", "sk-test")]).unwrap();
        assert_eq!(cfg.backend, GeneratorBackend::Llm);
        assert_eq!(cfg.llm.api_key.as_deref(), Some("sk-test"));

        let cfg = config(&[("OPENAI_API_KEY", "sk-test"), ("GREETING_BACKEND", "offline")]).unwrap();
        assert_eq!(cfg.backend, GeneratorBackend::Offline);
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("GREETING_MODEL", "llama3"),
            ("OPENAI_BASE_URL", "http://localhost:11434/v1"),
            ("GREETING_LLM_TIMEOUT_SECS", "30"),
            ("GREETING_CONVERSATION_TTL_SECS", "3600"),
        ])
        .unwrap();

        assert_eq!(cfg.bind_addr(), "127.0.0.1:9000");
        assert_eq!(cfg.llm.model, "llama3");
        assert_eq!(cfg.llm.base_url, "http://localhost:11434/v1");
        assert_eq!(cfg.llm.timeout, Duration::from_secs(30));
        assert_eq!(cfg.conversation_ttl, Some(Duration::from_secs(3600)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = config(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
        assert!(config(&[("GREETING_BACKEND", "magic")]).is_err());
        assert!(config(&[("GREETING_CONVERSATION_TTL_SECS", "-1")]).is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let cfg = config(&[("OPENAI_API_KEY", "sk-secret")]).unwrap();
        let debug = format!("{:?}", cfg.llm);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
