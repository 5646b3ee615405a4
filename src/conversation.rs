// Client-side conversation state machine
//
// Every chat surface (embedded widget, terminal REPL) drives the same state
// machine: append the question optimistically, hold exactly one request in
// flight, append exactly one answer bubble per resolution, return to Idle.

use chrono::{DateTime, Utc};

use crate::prompt::Turn;

/// Shown as the answer bubble when the backend cannot be reached or returns
/// no usable error text.
pub const CONNECTION_ERROR_FALLBACK: &str =
    "Sorry, I'm having trouble connecting right now. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Question,
    Answer,
}

/// One rendered chat bubble. Append-only; never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientMessage {
    pub id: u64,
    pub kind: MessageKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    AwaitingResponse,
}

/// In-memory transcript plus the loading flag. Lives for one UI session and
/// is discarded with it.
pub struct Conversation {
    messages: Vec<ClientMessage>,
    state: ConversationState,
    next_id: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            state: ConversationState::Idle,
            next_id: 0,
        }
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    /// True while a request is outstanding; the UI disables input on this.
    pub fn is_awaiting(&self) -> bool {
        self.state == ConversationState::AwaitingResponse
    }

    pub fn messages(&self) -> &[ClientMessage] {
        &self.messages
    }

    /// The most recently appended message: the scroll-to-bottom target.
    pub fn latest(&self) -> Option<&ClientMessage> {
        self.messages.last()
    }

    /// Submit user input.
    ///
    /// Returns the trimmed question when accepted, appending it to the
    /// transcript before any network work (optimistic append). Returns None
    /// while a request is in flight or when the trimmed input is empty; the
    /// caller must not issue a request in that case.
    pub fn submit(&mut self, input: &str) -> Option<String> {
        if self.is_awaiting() {
            return None;
        }
        let question = input.trim();
        if question.is_empty() {
            return None;
        }

        self.push(MessageKind::Question, question);
        self.state = ConversationState::AwaitingResponse;
        Some(question.to_string())
    }

    /// Resolve the outstanding request, successfully or not.
    ///
    /// Appends exactly one answer bubble (the relayed answer or a user-facing
    /// error string) and unconditionally returns to Idle so the user can
    /// retry.
    pub fn resolve(&mut self, outcome: Result<String, String>) {
        let content = match outcome {
            Ok(answer) => answer,
            Err(message) => message,
        };
        self.push(MessageKind::Answer, &content);
        self.state = ConversationState::Idle;
    }

    /// The transcript in wire form, for multi-turn endpoints that require the
    /// full history to be resent each call.
    pub fn transcript(&self) -> Vec<Turn> {
        self.messages
            .iter()
            .map(|message| match message.kind {
                MessageKind::Question => Turn::user(message.content.clone()),
                MessageKind::Answer => Turn::assistant(message.content.clone()),
            })
            .collect()
    }

    fn push(&mut self, kind: MessageKind, content: &str) {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ClientMessage {
            id,
            kind,
            content: content.to_string(),
            timestamp: Utc::now(),
        });
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
