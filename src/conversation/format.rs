// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Conversation history formatting.
//!
//! Renders a bounded window of prior turns plus the new user message into
//! the single prompt string handed to the generation adapter. No other
//! context is injected.

use serde::{Deserialize, Serialize};

/// One message exchange unit, supplied by the caller per request.
/// The server keeps no conversation state of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub sender: String,
    pub text: String,
}

impl Turn {
    fn label(&self) -> &'static str {
        if self.sender == "user" {
            "User"
        } else {
            "Assistant"
        }
    }
}

/// Build the prompt for a user message with optional conversation history.
///
/// With empty history the result is exactly `"User: {msg}\nAssistant:"`.
/// Otherwise only the most recent `max_turns` turns are rendered,
/// oldest-first; older turns are silently dropped.
pub fn format_history(user_message: &str, history: &[Turn], max_turns: usize) -> String {
    if history.is_empty() {
        return format!("User: {}\nAssistant:", user_message);
    }

    let recent = if history.len() > max_turns {
        &history[history.len() - max_turns..]
    } else {
        history
    };

    let mut lines: Vec<String> = recent
        .iter()
        .map(|turn| format!("{}: {}", turn.label(), turn.text))
        .collect();

    lines.push(format!("User: {}", user_message));
    lines.push("Assistant:".to_string());

    lines.join("\n")
}

/// Keep only the trailing portion of a prompt within the character budget,
/// so arbitrarily long histories never exceed the generator's context.
/// The cut never lands inside a multi-byte character.
pub fn truncate_prompt(prompt: &str, max_chars: usize) -> &str {
    if prompt.len() <= max_chars {
        return prompt;
    }

    let mut start = prompt.len() - max_chars;
    while start < prompt.len() && !prompt.is_char_boundary(start) {
        start += 1;
    }

    &prompt[start..]
}
