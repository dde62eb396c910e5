// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Response shaping for generated continuations.
//!
//! Raw model output is rarely presentable as-is: it may end mid-word, carry
//! ragged whitespace, or run far past what an elderly reader comfortably
//! takes in. Shaping trims it into a short reply that always ends on
//! sentence-terminal punctuation. An empty result means the caller must
//! substitute a fallback response.

use regex::Regex;

/// Shape a raw generated continuation into a user-presentable reply.
///
/// Steps, in order: trim surrounding whitespace; drop a trailing partial
/// word and append `.` when terminal punctuation is missing; collapse
/// whitespace runs; cap at `max_chars` by greedily accumulating whole
/// sentences. The first sentence is always kept, even when it alone
/// exceeds the cap, so a non-empty input never shapes to empty.
pub fn shape_response(raw: &str, max_chars: usize) -> String {
    let mut response = raw.trim().to_string();

    // Handle incomplete sentences: cut back to the last word boundary.
    if !response.is_empty() && !response.ends_with(['.', '!', '?']) {
        if let Some(last_space) = response.rfind(' ') {
            response.truncate(last_space);
        }
        response.push('.');
    }

    let whitespace = Regex::new(r"\s+").expect("whitespace pattern must compile");
    let response = whitespace.replace_all(&response, " ").into_owned();

    if response.len() <= max_chars {
        return response;
    }

    let mut shortened: Vec<&str> = Vec::new();
    let mut current_length = 0;

    for sentence in split_sentences(&response) {
        if shortened.is_empty() || current_length + sentence.len() <= max_chars {
            shortened.push(sentence);
            current_length += sentence.len() + 1;
        } else {
            break;
        }
    }

    shortened.join(" ")
}

/// Split on boundaries after `.`, `!`, `?` followed by a space. Whitespace
/// runs are already collapsed by the time this is called, so a single
/// space is the only separator form.
fn split_sentences(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if matches!(bytes[i], b'.' | b'!' | b'?') && i + 1 < bytes.len() && bytes[i + 1] == b' ' {
            sentences.push(&text[start..=i]);
            start = i + 2;
            i += 2;
        } else {
            i += 1;
        }
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
}
