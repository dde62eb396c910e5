// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use super::handlers::{
    ChatRequest, ChatResponse, HealthResponse, SentimentRequest, SentimentResponse,
    TopicsResponse,
};
use super::ApiError;
use crate::cache::ResponseCache;
use crate::conversation::ConversationManager;
use crate::sentiment::SentimentAnalyzer;
use crate::topics::{pick_topics, DEFAULT_TOPIC_COUNT};

#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<ConversationManager>,
    pub sentiment: Arc<SentimentAnalyzer>,
    pub sentiment_cache: Arc<ResponseCache>,
}

/// Build the application router. Split out of `start_server` so tests can
/// drive the routes in-process.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Conversation endpoint
        .route("/api/chat", post(chat_handler))
        // Sentiment endpoint
        .route("/api/sentiment", post(sentiment_handler))
        // Topic suggestions
        .route("/api/topics", get(topics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(
    state: AppState,
    listen_addr: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state);

    let addr = listen_addr.parse::<SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> impl IntoResponse {
    axum::response::Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<axum::response::Json<ChatResponse>, ApiErrorResponse> {
    if request.message.is_empty() {
        return Err(ApiErrorResponse(ApiError::InvalidRequest(
            "No message provided".to_string(),
        )));
    }

    // Adapter failures are absorbed inside the manager; this path always
    // produces a reply.
    let response = state
        .manager
        .generate_response(&request.message, &request.conversation_history)
        .await;

    Ok(axum::response::Json(ChatResponse {
        response,
        status: "success".to_string(),
        request_id: Uuid::new_v4().to_string(),
    }))
}

async fn sentiment_handler(
    State(state): State<AppState>,
    Json(request): Json<SentimentRequest>,
) -> Result<axum::response::Json<SentimentResponse>, ApiErrorResponse> {
    if request.message.is_empty() {
        return Err(ApiErrorResponse(ApiError::InvalidRequest(
            "No message provided".to_string(),
        )));
    }

    if let Some(cached) = state.sentiment_cache.get(&request.message).await {
        if let Ok(response) = serde_json::from_str::<SentimentResponse>(&cached) {
            return Ok(axum::response::Json(response));
        }
    }

    let result = state.sentiment.analyze(&request.message).await;
    let response = SentimentResponse {
        sentiment: result.label,
        confidence: result.confidence,
        emotion: result.emotion,
        message: request.message.clone(),
    };

    if let Ok(serialized) = serde_json::to_string(&response) {
        state
            .sentiment_cache
            .put(&request.message, serialized)
            .await;
    }

    Ok(axum::response::Json(response))
}

async fn topics_handler() -> impl IntoResponse {
    axum::response::Json(TopicsResponse {
        topics: pick_topics(DEFAULT_TOPIC_COUNT),
    })
}

// Error response wrapper
pub struct ApiErrorResponse(pub ApiError);

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let error_response = self.0.to_response(None);

        (status, axum::response::Json(error_response)).into_response()
    }
}
