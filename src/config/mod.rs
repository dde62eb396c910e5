// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::env;
use std::time::Duration;

/// Runtime configuration for the companion chat node.
///
/// Every field has a sensible default; `from_env` overrides them from
/// environment variables so deployments configure the node the same way
/// the original backend did (PORT, endpoints, tuning knobs).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: String,
    /// Maximum number of historical turns included in a prompt.
    pub max_history_turns: usize,
    /// Character budget for the prompt handed to the generator.
    /// Roughly 512 tokens at the 4-chars-per-token estimate.
    pub max_prompt_chars: usize,
    /// Upper bound on newly generated tokens per reply.
    pub max_new_tokens: usize,
    /// Character cap applied by the response shaper.
    pub max_response_chars: usize,
    /// Inclusive confidence band inside which sentiment is forced to neutral.
    pub neutral_band: (f32, f32),
    /// Base URL of the text-generation sidecar.
    pub generator_endpoint: String,
    /// Base URL of the sentiment-classifier sidecar.
    pub sentiment_endpoint: String,
    pub cache_max_entries: usize,
    pub cache_ttl: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
            max_history_turns: 10,
            max_prompt_chars: 2048,
            max_new_tokens: 100,
            max_response_chars: 200,
            neutral_band: (0.4, 0.6),
            generator_endpoint: "http://127.0.0.1:8081".to_string(),
            sentiment_endpoint: "http://127.0.0.1:8082".to_string(),
            cache_max_entries: 1000,
            cache_ttl: Duration::from_secs(60),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());

        Self {
            listen_addr: format!("0.0.0.0:{}", port),
            max_history_turns: parse_env("MAX_HISTORY_TURNS", defaults.max_history_turns),
            max_prompt_chars: parse_env("MAX_PROMPT_CHARS", defaults.max_prompt_chars),
            max_new_tokens: parse_env("MAX_NEW_TOKENS", defaults.max_new_tokens),
            max_response_chars: parse_env("MAX_RESPONSE_CHARS", defaults.max_response_chars),
            neutral_band: defaults.neutral_band,
            generator_endpoint: env::var("GENERATOR_ENDPOINT")
                .unwrap_or(defaults.generator_endpoint),
            sentiment_endpoint: env::var("SENTIMENT_ENDPOINT")
                .unwrap_or(defaults.sentiment_endpoint),
            cache_max_entries: parse_env("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            cache_ttl: Duration::from_secs(parse_env(
                "CACHE_TTL_SECS",
                defaults.cache_ttl.as_secs(),
            )),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
