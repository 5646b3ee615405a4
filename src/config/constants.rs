// Project-wide constants
//
// Centralised here so port numbers and tuning defaults have one source of
// truth. Import via `use crate::config::constants::*;`.

/// Default listen port for the relay server (matches the port the embedded
/// widgets were originally pointed at).
pub const DEFAULT_PORT: u16 = 3001;

/// Default bind address for the relay server.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";

/// Default completion model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default maximum tokens per completion.
pub const DEFAULT_MAX_TOKENS: u32 = 512;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Base URL a local client CLI talks to when none is given.
pub const DEFAULT_CLIENT_URL: &str = "http://localhost:3001";
