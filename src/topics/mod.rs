// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Conversation-starter topics.

use rand::seq::index::sample;

/// Static catalog of topics related to elderly interests and well-being.
pub const TOPIC_CATALOG: [&str; 9] = [
    "How are you feeling today?",
    "What was your favorite activity when you were younger?",
    "Do you have any family photos you'd like to tell me about?",
    "What's your favorite season and why?",
    "Have you read any good books or watched any good shows lately?",
    "What's the most interesting place you've traveled to?",
    "Do you have any favorite recipes you'd like to share?",
    "What music do you enjoy listening to?",
    "How did you meet your spouse or best friend?",
];

pub const DEFAULT_TOPIC_COUNT: usize = 4;

/// Uniform sample without replacement of `min(count, catalog size)` topics.
/// Order within the sample carries no meaning.
pub fn pick_topics(count: usize) -> Vec<String> {
    let count = count.min(TOPIC_CATALOG.len());
    sample(&mut rand::thread_rng(), TOPIC_CATALOG.len(), count)
        .into_iter()
        .map(|i| TOPIC_CATALOG[i].to_string())
        .collect()
}
