// Persona definitions
//
// The branded system prompt is server-controlled: the relay prepends it to
// every assembled prompt and client-supplied system turns never override it.
// Which persona each endpoint uses is a configuration concern.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::prompt::Turn;

/// A persona defines the assistant's identity and behavioral constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    /// Persona name (e.g., "Canopy")
    pub name: String,

    /// Short description of where this persona is used
    #[serde(default)]
    pub description: String,

    /// System prompt injected ahead of every transcript
    pub system_prompt: String,
}

impl Persona {
    /// Load persona from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read persona from {}", path.display()))?;

        toml::from_str(&contents).context("Failed to parse persona TOML")
    }

    /// Load a built-in persona by name
    pub fn load_builtin(name: &str) -> Result<Self> {
        let template = match name {
            "canopy" => include_str!("../../data/personas/canopy.toml"),
            "concise" => include_str!("../../data/personas/concise.toml"),
            _ => anyhow::bail!("Unknown builtin persona: {}", name),
        };

        toml::from_str(template)
            .with_context(|| format!("Failed to parse builtin persona: {}", name))
    }

    /// Resolve a configured persona value: a path to a TOML file, or a
    /// builtin name.
    pub fn resolve(value: &str) -> Result<Self> {
        if value.ends_with(".toml") {
            Self::load(Path::new(value))
        } else {
            Self::load_builtin(value)
        }
    }

    /// The persona as the leading system turn of an assembled prompt
    pub fn to_system_turn(&self) -> Turn {
        Turn::system(self.system_prompt.clone())
    }

    /// List available builtin personas
    pub fn list_builtins() -> Vec<&'static str> {
        vec!["canopy", "concise"]
    }
}
