// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Safety screening for incoming user messages.
//!
//! A small fixed table of case-insensitive patterns covering self-harm
//! ideation. When any pattern matches, the caller must bypass generation
//! entirely and answer with one of the empathetic acknowledgments below.

use rand::seq::SliceRandom;
use regex::Regex;
use tracing::warn;

/// Empathetic responses returned instead of a generated reply when a
/// safety pattern fires.
pub const SAFETY_RESPONSES: [&str; 4] = [
    "I'm concerned about what you're saying. Would you like to talk about what's troubling you?",
    "That sounds difficult. Remember that it's okay to ask for help when you need it.",
    "I care about your wellbeing. Would you like me to suggest some resources that might help?",
    "I'm here to listen. Would you like to talk more about how you're feeling?",
];

const SAFETY_PATTERNS: [&str; 4] = [
    r"(?i)sui[c]+ide",
    r"(?i)kill\s+(?:my|your)self",
    r"(?i)harm\s+(?:my|your)self",
    r"(?i)want\s+to\s+die",
];

/// Scans raw user text against the fixed safety pattern table.
pub struct SafetyFilter {
    patterns: Vec<Regex>,
}

impl Default for SafetyFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl SafetyFilter {
    pub fn new() -> Self {
        let patterns = SAFETY_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("safety pattern table must compile"))
            .collect();

        Self { patterns }
    }

    /// Returns true if the text matches any safety pattern. Deterministic;
    /// the warn record is observability only.
    pub fn is_concerning(&self, text: &str) -> bool {
        for pattern in &self.patterns {
            if pattern.is_match(text) {
                warn!("Safety pattern detected: {}", pattern.as_str());
                return true;
            }
        }

        false
    }

    /// Pick one of the canned safety responses uniformly at random.
    pub fn safety_response(&self) -> String {
        SAFETY_RESPONSES
            .choose(&mut rand::thread_rng())
            .expect("safety response table is non-empty")
            .to_string()
    }
}
