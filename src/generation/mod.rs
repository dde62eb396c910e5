// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text-generation adapter boundary.
//!
//! The conversation core never talks to a model runtime directly. It sees
//! only the [`TextGenerator`] trait; the production implementation forwards
//! prompts to a sidecar service over an OpenAI-compatible completion API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Failure modes of a generation backend. All of them are recoverable:
/// callers substitute a fallback response instead of propagating.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation backend request failed: {0}")]
    Backend(String),
    #[error("generation backend returned no completion")]
    EmptyCompletion,
}

/// Narrow interface over a "generate continuation" capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a continuation for `prompt`, producing at most
    /// `max_new_tokens` new tokens.
    async fn generate(
        &self,
        prompt: &str,
        max_new_tokens: usize,
    ) -> Result<String, GenerationError>;
}

// --- OpenAI-compatible serde structs ---

#[derive(Serialize)]
struct CompletionRequest {
    prompt: String,
    max_tokens: usize,
    temperature: f32,
    top_p: f32,
    top_k: usize,
    repeat_last_n: usize,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

/// Client for a text-generation sidecar exposing `/v1/completions`.
pub struct SidecarGenerator {
    client: Client,
    endpoint: String,
}

impl SidecarGenerator {
    pub fn new(endpoint: &str) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| GenerationError::Backend(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Check if the generation sidecar is reachable.
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.endpoint))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("generator health check failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl TextGenerator for SidecarGenerator {
    async fn generate(
        &self,
        prompt: &str,
        max_new_tokens: usize,
    ) -> Result<String, GenerationError> {
        // Sampling parameters tuned for short conversational replies.
        let request = CompletionRequest {
            prompt: prompt.to_string(),
            max_tokens: max_new_tokens,
            temperature: 0.85,
            top_p: 0.92,
            top_k: 50,
            repeat_last_n: 3,
        };

        let response = self
            .client
            .post(format!("{}/v1/completions", self.endpoint))
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Backend(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GenerationError::Backend(format!(
                "status {}",
                response.status()
            )));
        }

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Backend(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or(GenerationError::EmptyCompletion)
    }
}
