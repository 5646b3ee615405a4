// Configuration loader
// Reads ~/.canopy-assist/config.toml when present, then applies environment
// overrides (OPENAI_API_KEY, PORT, ALLOWED_ORIGIN, ...).

use anyhow::{Context, Result};
use std::fs;

use super::settings::Config;

/// Load configuration from the config file and environment.
///
/// A missing API key is not an error here: the relay detects and reports it
/// per request, so a half-configured deployment still serves structured
/// errors instead of failing to boot.
pub fn load_config() -> Result<Config> {
    let mut config = try_load_from_file()?.unwrap_or_default();
    apply_env_overrides(&mut config);

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

fn try_load_from_file() -> Result<Option<Config>> {
    let Some(home) = dirs::home_dir() else {
        return Ok(None);
    };
    let config_path = home.join(".canopy-assist/config.toml");

    if !config_path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

    #[derive(serde::Deserialize)]
    struct TomlConfig {
        api_key: Option<String>,
        model: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
        bind_address: Option<String>,
        allowed_origin: Option<String>,
        ask_persona: Option<String>,
        chat_persona: Option<String>,
    }

    let toml_config: TomlConfig =
        toml::from_str(&contents).context("Failed to parse config TOML")?;

    let mut config = Config::default();
    config.api_key = toml_config.api_key;
    if let Some(model) = toml_config.model {
        config.model = model;
    }
    if let Some(max_tokens) = toml_config.max_tokens {
        config.max_tokens = max_tokens;
    }
    if let Some(temperature) = toml_config.temperature {
        config.temperature = temperature;
    }
    if let Some(bind_address) = toml_config.bind_address {
        config.bind_address = bind_address;
    }
    config.allowed_origin = toml_config.allowed_origin;
    if let Some(persona) = toml_config.ask_persona {
        config.ask_persona = persona;
    }
    if let Some(persona) = toml_config.chat_persona {
        config.chat_persona = persona;
    }

    Ok(Some(config))
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
        if !api_key.is_empty() {
            config.api_key = Some(api_key);
        }
    }
    if let Ok(model) = std::env::var("CANOPY_MODEL") {
        if !model.is_empty() {
            config.model = model;
        }
    }
    if let Ok(port) = std::env::var("PORT") {
        if let Ok(port) = port.parse::<u16>() {
            config.bind_address = format!("0.0.0.0:{}", port);
        } else {
            tracing::warn!(port = %port, "Ignoring unparseable PORT value");
        }
    }
    if let Ok(origin) = std::env::var("ALLOWED_ORIGIN") {
        if !origin.is_empty() {
            config.allowed_origin = Some(origin);
        }
    }
    if let Ok(persona) = std::env::var("CANOPY_PERSONA") {
        if !persona.is_empty() {
            config.ask_persona = persona.clone();
            config.chat_persona = persona;
        }
    }
}
