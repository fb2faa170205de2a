//! Client-side response cache
//!
//! Responses of functions that have a TTL are kept in memory, keyed by the
//! JSON text of `{func, input}`. Calls with input files are never cached.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::Result;
use crate::protocol::Download;

/// A cached response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Decoded output
    pub output: Value,
    /// Attachments
    pub ofiles: Vec<Download>,
    /// Time of the fetch, in milliseconds since the Unix epoch
    pub epoch: i64,
}

impl CacheEntry {
    fn expires_at(&self, ttl_secs: u64) -> i64 {
        let ttl_ms = i64::try_from(ttl_secs.saturating_mul(1000)).unwrap_or(i64::MAX);
        self.epoch.saturating_add(ttl_ms)
    }
}

/// In-memory cache of responses
#[derive(Debug, Clone, Default)]
pub struct ResponseCache {
    entries: HashMap<String, CacheEntry>,
}

impl ResponseCache {
    /// Cache key for a call
    #[must_use]
    pub fn key(func: &str, input: &Value) -> String {
        json!({ "func": func, "input": input }).to_string()
    }

    /// Current time in milliseconds since the Unix epoch
    #[must_use]
    pub fn now() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// Look up a live entry, dropping it if it has expired
    pub fn lookup(&mut self, key: &str, ttl_secs: u64, now: i64) -> Option<(Value, Vec<Download>)> {
        let entry = self.entries.get(key)?;
        if entry.expires_at(ttl_secs) > now {
            log::debug!("cache hit");
            return Some((entry.output.clone(), entry.ofiles.clone()));
        }
        log::debug!("cache entry expired");
        self.entries.remove(key);
        None
    }

    /// Store a response fetched at `now`
    pub fn store(&mut self, key: String, output: Value, ofiles: Vec<Download>, now: i64) {
        self.entries.insert(
            key,
            CacheEntry {
                output,
                ofiles,
                epoch: now,
            },
        );
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop entries whose function TTL has passed
    ///
    /// Entries of functions without a TTL are kept.
    pub fn remove_expired(&mut self, ttls: &HashMap<String, u64>, now: i64) {
        self.entries.retain(|key, entry| {
            let func = serde_json::from_str::<Value>(key)
                .ok()
                .and_then(|k| k.get("func").and_then(Value::as_str).map(str::to_string));
            match func.and_then(|f| ttls.get(&f).copied()) {
                Some(ttl) => entry.expires_at(ttl) >= now,
                None => true,
            }
        });
    }

    /// Serialize all entries as a JSON object keyed by cache key
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    /// Replace all entries from JSON produced by [`ResponseCache::to_json`]
    pub fn replace_from_json(&mut self, s: &str) -> Result<()> {
        self.entries = serde_json::from_str(s)?;
        Ok(())
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
