// Conversation turn types and prompt assembly

use serde::{Deserialize, Serialize};

/// Who authored a conversation turn.
///
/// Serialized lowercase to match the chat-completion wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of a conversation transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Build the exact message list submitted to the completion provider.
///
/// The branded persona always leads, and any caller-supplied system turns are
/// discarded so an untrusted client cannot replace the persona. Non-system
/// turns keep their original order.
pub fn assemble(transcript: &[Turn], persona: &Turn) -> Vec<Turn> {
    let mut prompt = Vec::with_capacity(1 + transcript.len());
    prompt.push(persona.clone());
    prompt.extend(
        transcript
            .iter()
            .filter(|turn| turn.role != Role::System)
            .cloned(),
    );
    prompt
}
