// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cache;
pub mod config;
pub mod conversation;
pub mod generation;
pub mod sentiment;
pub mod topics;

// Re-export main types from core modules
pub use api::{AppState, ChatRequest, ChatResponse, SentimentResponse, TopicsResponse};
pub use cache::ResponseCache;
pub use config::AppConfig;
pub use conversation::{ConversationManager, SafetyFilter, Turn};
pub use generation::{GenerationError, SidecarGenerator, TextGenerator};
pub use sentiment::{SentimentAnalyzer, SentimentBackend, SentimentResult, SidecarSentiment};
pub use topics::{pick_topics, TOPIC_CATALOG};
