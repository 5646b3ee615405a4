// Completion provider abstraction
//
// The relay talks to the upstream LLM service through this narrow seam so
// tests can substitute counting stubs for the real HTTP client.

use anyhow::Result;
use async_trait::async_trait;

use crate::prompt::Turn;

pub mod openai;

pub use openai::OpenAiProvider;

/// Successful provider output. The text may be empty when the model returned
/// no usable content; the relay substitutes its fallback sentence in that case.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
}

/// Trait for chat-completion providers.
///
/// One call per relay request: the full assembled prompt goes out, the full
/// completion comes back. No streaming, no retry.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send the assembled prompt and await the complete response.
    async fn complete(
        &self,
        prompt: &[Turn],
        max_tokens: u32,
        temperature: f32,
    ) -> Result<Completion>;

    /// Whether the provider holds the credential it needs. The relay checks
    /// this before any network I/O and maps false to a configuration error
    /// instead of attempting the call.
    fn is_configured(&self) -> bool {
        true
    }

    /// Provider name for logs (e.g., "openai").
    fn name(&self) -> &str;
}
