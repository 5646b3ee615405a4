// Axum handlers and router assembly

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use super::types::{
    error_response, AskRequest, AskResponse, ChatRequest, ChatResponse, HealthResponse,
};
use super::AppState;

/// Request bodies are natural-language chat payloads; anything bigger than
/// this is not a legitimate widget request.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the full router: relay endpoints, health check, JSON 404/405
/// fallbacks, CORS and body-limit layers.
///
/// CORS is a router-wide layer rather than per-endpoint header code; the
/// layer answers `OPTIONS` preflight with 200 and no body before any relay
/// logic runs.
pub fn create_router(state: Arc<AppState>, allowed_origin: Option<&str>) -> Result<Router> {
    let cors = cors_layer(allowed_origin)?;

    let router = Router::new()
        .route("/health", get(handle_health))
        .route("/ask", post(handle_ask).fallback(handle_method_not_allowed))
        .route(
            "/api/chat",
            post(handle_chat).fallback(handle_method_not_allowed),
        )
        .fallback(handle_not_found)
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state);

    Ok(router)
}

fn cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Widgets embed on arbitrary customer sites, so the default is any
    // origin; deployments can pin one via ALLOWED_ORIGIN.
    Ok(match allowed_origin {
        Some(origin) => {
            let origin: HeaderValue = origin
                .parse()
                .with_context(|| format!("Invalid allowed origin: {}", origin))?;
            cors.allow_origin(origin)
        }
        None => cors.allow_origin(Any),
    })
}

/// `GET /health`
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now(),
    })
}

/// `POST /ask` — single-turn Q&A
pub async fn handle_ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Response {
    let question = match payload {
        Ok(Json(request)) => request.question,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected malformed /ask body");
            None
        }
    };

    let Some(question) = question else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Question is required and must be a string",
        );
    };

    match state.ask_relay.relay_ask(&question).await {
        Ok(reply) => (StatusCode::OK, Json(AskResponse::from(reply))).into_response(),
        Err(err) => err.into_response(),
    }
}

/// `POST /api/chat` — multi-turn transcript relay
pub async fn handle_chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let messages = match payload {
        Ok(Json(request)) => request.messages,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected malformed /api/chat body");
            None
        }
    };

    let Some(messages) = messages else {
        return error_response(StatusCode::BAD_REQUEST, "Missing messages");
    };

    match state.chat_relay.relay_chat(&messages).await {
        Ok(reply) => (StatusCode::OK, Json(ChatResponse { reply })).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Wrong verb on a relay route
pub async fn handle_method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// Unknown route
pub async fn handle_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Endpoint not found")
}
