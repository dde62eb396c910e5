// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Conversation manager: safety check, prompt assembly, generation and
//! response shaping behind one entry point that never fails.

use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::{debug, error};

use crate::config::AppConfig;
use crate::conversation::format::{format_history, truncate_prompt, Turn};
use crate::conversation::safety::SafetyFilter;
use crate::conversation::shape::shape_response;
use crate::generation::TextGenerator;

/// Generic follow-up prompts used when generation fails or shapes to empty.
pub const FALLBACK_RESPONSES: [&str; 5] = [
    "I'm thinking about what you said. Could you tell me more?",
    "That's interesting. Can you elaborate on that?",
    "I'd like to understand better. Could you share more about that?",
    "Thank you for sharing that with me. How does that make you feel?",
    "I appreciate you talking with me about this. Would you like to continue on this topic?",
];

/// Drives one reply per request: safety short-circuit, history formatting,
/// prompt budgeting, generation, shaping, fallback substitution.
///
/// The generator is injected at construction and shared for the process
/// lifetime; the manager itself holds no per-conversation state.
pub struct ConversationManager {
    generator: Arc<dyn TextGenerator>,
    safety: SafetyFilter,
    max_history_turns: usize,
    max_prompt_chars: usize,
    max_new_tokens: usize,
    max_response_chars: usize,
}

impl ConversationManager {
    pub fn new(generator: Arc<dyn TextGenerator>, config: &AppConfig) -> Self {
        Self {
            generator,
            safety: SafetyFilter::new(),
            max_history_turns: config.max_history_turns,
            max_prompt_chars: config.max_prompt_chars,
            max_new_tokens: config.max_new_tokens,
            max_response_chars: config.max_response_chars,
        }
    }

    /// Generate a reply to the user's message. Always returns a usable
    /// string: adapter failures and empty generations degrade to canned
    /// follow-up prompts instead of surfacing as errors.
    pub async fn generate_response(&self, user_message: &str, history: &[Turn]) -> String {
        if self.safety.is_concerning(user_message) {
            return self.safety.safety_response();
        }

        let prompt = format_history(user_message, history, self.max_history_turns);
        let prompt = truncate_prompt(&prompt, self.max_prompt_chars);

        let raw = match self.generator.generate(prompt, self.max_new_tokens).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Error generating response: {}", e);
                return fallback_response();
            }
        };

        let shaped = shape_response(&raw, self.max_response_chars);
        if shaped.is_empty() {
            debug!("Generation shaped to empty, substituting fallback");
            return fallback_response();
        }

        shaped
    }
}

fn fallback_response() -> String {
    FALLBACK_RESPONSES
        .choose(&mut rand::thread_rng())
        .expect("fallback response table is non-empty")
        .to_string()
}
