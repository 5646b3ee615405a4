// Configuration structs

use anyhow::{bail, Result};

use super::constants;

/// Process-wide configuration for the relay server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Completion provider API key. Optional so the server starts without it
    /// and reports a configuration error per request instead of crashing.
    pub api_key: Option<String>,

    /// Completion model name
    pub model: String,

    /// Maximum tokens per completion
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Bind address (e.g., "0.0.0.0:3001")
    pub bind_address: String,

    /// Allowed CORS origin for browser-embedded widgets.
    /// None = allow any origin (widgets embed on arbitrary customer sites).
    pub allowed_origin: Option<String>,

    /// Persona for the single-turn /ask endpoint
    pub ask_persona: String,

    /// Persona for the multi-turn /api/chat endpoint
    pub chat_persona: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: constants::DEFAULT_MODEL.to_string(),
            max_tokens: constants::DEFAULT_MAX_TOKENS,
            temperature: constants::DEFAULT_TEMPERATURE,
            bind_address: constants::DEFAULT_BIND_ADDR.to_string(),
            allowed_origin: None,
            ask_persona: "concise".to_string(),
            chat_persona: "canopy".to_string(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 {
            bail!("max_tokens must be greater than zero");
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            bail!(
                "temperature must be between 0.0 and 2.0 (got {})",
                self.temperature
            );
        }
        if self.model.trim().is_empty() {
            bail!("model must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_rejects_zero_max_tokens() {
        let config = Config {
            max_tokens: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_temperature() {
        let config = Config {
            temperature: 3.5,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
