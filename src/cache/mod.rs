// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! TTL'd LRU cache for API responses.
//!
//! Sentiment classification is the one blocking call worth memoizing:
//! clients re-send the same message while a conversation view refreshes.
//! Keys are derived from a bounded prefix of the input text, so minor
//! trailing variations still hit the same entry.

use lru::LruCache;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;

/// Number of leading characters of the input that participate in the key.
const KEY_PREFIX_CHARS: usize = 50;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    timestamp: SystemTime,
}

#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub evictions: usize,
    pub total_entries: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// In-memory response cache with LRU eviction and per-entry TTL.
pub struct ResponseCache {
    entries: RwLock<LruCache<String, CacheEntry>>,
    stats: RwLock<CacheStats>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(max_entries.max(1)).expect("capacity is at least 1");

        Self {
            entries: RwLock::new(LruCache::new(capacity)),
            stats: RwLock::new(CacheStats::default()),
            ttl,
        }
    }

    pub async fn get(&self, text: &str) -> Option<String> {
        let key = hash_key(text);

        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(&key) {
            if entry.timestamp.elapsed().unwrap_or(Duration::MAX) < self.ttl {
                let value = entry.value.clone();
                self.stats.write().await.hits += 1;
                return Some(value);
            }

            // Entry expired
            entries.pop(&key);
            self.stats.write().await.evictions += 1;
        }

        self.stats.write().await.misses += 1;
        None
    }

    pub async fn put(&self, text: &str, value: String) {
        let key = hash_key(text);

        let mut entries = self.entries.write().await;
        entries.push(
            key,
            CacheEntry {
                value,
                timestamp: SystemTime::now(),
            },
        );

        self.stats.write().await.total_entries = entries.len();
    }

    pub async fn stats(&self) -> CacheStats {
        self.stats.read().await.clone()
    }
}

fn hash_key(text: &str) -> String {
    let prefix: String = text.chars().take(KEY_PREFIX_CHARS).collect();

    let mut hasher = Sha256::new();
    hasher.update(prefix.as_bytes());
    format!("{:x}", hasher.finalize())
}
