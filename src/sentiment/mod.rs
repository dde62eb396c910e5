// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Sentiment classification adapter and label policy.
//!
//! The classifier itself lives behind [`SentimentBackend`]; this module owns
//! the policy layered on top of it: mid-confidence results are forced to
//! neutral, and a failing backend degrades to a neutral result instead of
//! an error.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

/// Failure modes of a classification backend. Recoverable: the analyzer
/// substitutes a neutral result.
#[derive(Debug, thiserror::Error)]
pub enum SentimentError {
    #[error("sentiment backend request failed: {0}")]
    Backend(String),
}

/// Narrow interface over a "classify polarity" capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SentimentBackend: Send + Sync {
    /// Classify the polarity of `text`, returning a label and a confidence
    /// in `[0, 1]`.
    async fn classify(&self, text: &str) -> Result<(String, f32), SentimentError>;
}

/// Classification outcome after policy is applied. Derived per call,
/// never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: String,
    pub confidence: f32,
    /// A more specific emotion word for the label, for friendlier feedback.
    pub emotion: String,
}

const EMOTION_WORDS_POSITIVE: [&str; 7] = [
    "happy", "joyful", "content", "pleased", "grateful", "excited", "hopeful",
];
const EMOTION_WORDS_NEUTRAL: [&str; 7] = [
    "calm", "okay", "fine", "balanced", "steady", "neutral", "composed",
];
const EMOTION_WORDS_NEGATIVE: [&str; 7] = [
    "sad", "anxious", "worried", "upset", "frustrated", "tired", "concerned",
];

/// Wraps a classification backend with the core label policy.
pub struct SentimentAnalyzer {
    backend: std::sync::Arc<dyn SentimentBackend>,
    neutral_band: (f32, f32),
}

impl SentimentAnalyzer {
    pub fn new(backend: std::sync::Arc<dyn SentimentBackend>, neutral_band: (f32, f32)) -> Self {
        Self {
            backend,
            neutral_band,
        }
    }

    /// Analyze the sentiment of `text`. Always returns a usable result:
    /// a confidence inside the neutral band (inclusive) overrides the
    /// backend's label, and a backend failure yields ("neutral", 0.33).
    pub async fn analyze(&self, text: &str) -> SentimentResult {
        let (label, confidence) = match self.backend.classify(text).await {
            Ok(classified) => classified,
            Err(e) => {
                error!("Error in sentiment analysis: {}", e);
                return SentimentResult {
                    label: "neutral".to_string(),
                    confidence: 0.33,
                    emotion: emotion_word("neutral"),
                };
            }
        };

        let (low, high) = self.neutral_band;
        let label = if confidence >= low && confidence <= high {
            "neutral".to_string()
        } else {
            label
        };

        info!(
            "Sentiment analysis: '{}' -> {} (confidence: {:.2})",
            text, label, confidence
        );

        SentimentResult {
            emotion: emotion_word(&label),
            label,
            confidence,
        }
    }
}

/// Pick a specific emotion word for a sentiment label. Unknown labels fall
/// back to the neutral table.
pub fn emotion_word(label: &str) -> String {
    let words: &[&str] = match label {
        "positive" => &EMOTION_WORDS_POSITIVE,
        "negative" => &EMOTION_WORDS_NEGATIVE,
        _ => &EMOTION_WORDS_NEUTRAL,
    };

    words
        .choose(&mut rand::thread_rng())
        .expect("emotion word tables are non-empty")
        .to_string()
}

// --- Sidecar classifier client ---

#[derive(Serialize)]
struct ClassifyRequest {
    text: String,
}

#[derive(Deserialize)]
struct ClassifyResponse {
    label: String,
    confidence: f32,
}

/// Client for a sentiment-classifier sidecar exposing `/v1/classify`.
pub struct SidecarSentiment {
    client: Client,
    endpoint: String,
}

impl SidecarSentiment {
    pub fn new(endpoint: &str) -> Result<Self, SentimentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| SentimentError::Backend(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Check if the classifier sidecar is reachable.
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.endpoint))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("sentiment health check failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl SentimentBackend for SidecarSentiment {
    async fn classify(&self, text: &str) -> Result<(String, f32), SentimentError> {
        let request = ClassifyRequest {
            text: text.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/v1/classify", self.endpoint))
            .json(&request)
            .send()
            .await
            .map_err(|e| SentimentError::Backend(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SentimentError::Backend(format!(
                "status {}",
                response.status()
            )));
        }

        let body: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| SentimentError::Backend(e.to_string()))?;

        Ok((body.label.to_lowercase(), body.confidence))
    }
}
