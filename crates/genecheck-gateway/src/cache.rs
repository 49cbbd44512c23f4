//! TTL key-value cache fronting upstream calls

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// Derive a deterministic cache key from a tool name and its arguments
///
/// Arguments are canonicalized (object keys sorted recursively) so that two
/// calls differing only in key order share a key.
pub fn cache_key(tool_name: &str, args: &Map<String, Value>) -> String {
    let canonical = canonicalize(&Value::Object(args.clone()));
    format!("{}:{}", tool_name, canonical)
}

fn canonicalize(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, String> =
                map.iter().map(|(k, v)| (k, canonicalize(v))).collect();
            let fields: Vec<String> = sorted
                .iter()
                .map(|(k, v)| format!("{}:{}", serde_json::to_string(k).unwrap_or_default(), v))
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(canonicalize).collect();
            format!("[{}]", rendered.join(","))
        }
        other => other.to_string(),
    }
}

struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

/// TTL key-value store
///
/// Entries are evicted lazily on read or explicitly via [`TtlCache::sweep`].
/// A value is never returned past its expiry.
pub struct TtlCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl TtlCache {
    /// Create a cache with the given default TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch a value if present and unexpired; evicts an expired entry
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a value under the default TTL, replacing any existing entry
    pub fn insert(&self, key: impl Into<String>, value: Value) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key.into(),
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Remove all expired entries; returns how many were evicted
    pub fn sweep(&self) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!("cache sweep evicted {} entries", evicted);
        }
        evicted
    }

    /// Number of stored entries, including not-yet-swept expired ones
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}
