// HTTP server for the relay endpoints

mod handlers;
mod types;

pub use handlers::{create_router, handle_health};
pub use types::{AskRequest, AskResponse, ChatRequest, ChatResponse, ErrorBody, HealthResponse};

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::{Config, Persona};
use crate::providers::CompletionProvider;
use crate::relay::{CompletionRelay, RelayOptions};

/// Shared handler state. Relays hold only immutable Arc'd handles, so
/// concurrent requests need no coordination.
pub struct AppState {
    /// Single-turn endpoint relay (short website-helper persona by default)
    pub ask_relay: CompletionRelay,
    /// Multi-turn endpoint relay (full branded persona by default)
    pub chat_relay: CompletionRelay,
}

impl AppState {
    pub fn from_config(config: &Config, provider: Arc<dyn CompletionProvider>) -> Result<Self> {
        let options = RelayOptions {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        };

        let ask_persona = Persona::resolve(&config.ask_persona)
            .with_context(|| format!("Failed to load ask persona '{}'", config.ask_persona))?;
        let chat_persona = Persona::resolve(&config.chat_persona)
            .with_context(|| format!("Failed to load chat persona '{}'", config.chat_persona))?;

        Ok(Self {
            ask_relay: CompletionRelay::new(Arc::clone(&provider), &ask_persona, options),
            chat_relay: CompletionRelay::new(provider, &chat_persona, options),
        })
    }
}

/// The relay HTTP server.
pub struct RelayServer {
    state: Arc<AppState>,
    bind_address: String,
    allowed_origin: Option<String>,
}

impl RelayServer {
    pub fn new(config: &Config, provider: Arc<dyn CompletionProvider>) -> Result<Self> {
        Ok(Self {
            state: Arc::new(AppState::from_config(config, provider)?),
            bind_address: config.bind_address.clone(),
            allowed_origin: config.allowed_origin.clone(),
        })
    }

    /// Bind and serve until the process is stopped.
    pub async fn serve(self) -> Result<()> {
        let addr: SocketAddr = self
            .bind_address
            .parse()
            .with_context(|| format!("Invalid bind address: {}", self.bind_address))?;

        let app = create_router(self.state, self.allowed_origin.as_deref())?
            .layer(TraceLayer::new_for_http());

        tracing::info!("Starting canopy-assist relay on {}", addr);
        tracing::info!("Health check: http://{}/health", addr);
        tracing::info!("Q&A endpoint: http://{}/ask", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
