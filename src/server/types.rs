// HTTP wire types for the relay endpoints

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::prompt::Turn;
use crate::relay::{AskReply, RelayError};

/// Single-turn request body: `{"question": "..."}`
#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: Option<String>,
}

/// Single-turn response body: answer, echoed question, ISO8601 timestamp
#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub question: String,
    pub timestamp: DateTime<Utc>,
}

impl From<AskReply> for AskResponse {
    fn from(reply: AskReply) -> Self {
        Self {
            answer: reply.answer,
            question: reply.question,
            timestamp: reply.timestamp,
        }
    }
}

/// Multi-turn request body: `{"messages": [{role, content}, ...]}`
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Option<Vec<Turn>>,
}

/// Multi-turn response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Structured error body: every failure the server emits has this shape.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RelayError::ConfigurationMissing | RelayError::Upstream => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.to_string())
    }
}
