use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::UsageData;

/// Cached usage counts stay fresh this long.
const CACHE_TTL_MS: i64 = 60_000;
/// Shorter lifetime for entries recorded while the usage API was down.
const CACHE_FAILURE_TTL_MS: i64 = 15_000;

/// On-disk cache entry; `timestamp` is unix milliseconds.
#[derive(Debug, Serialize, Deserialize)]
pub struct UsageCache {
    pub data: UsageData,
    pub timestamp: i64,
}

pub fn cache_path(home: &Path) -> PathBuf {
    home.join(".claude")
        .join("plugins")
        .join("ccsl")
        .join(".usage-cache.json")
}

/// The cached usage data, if present and still fresh at `now`.
pub fn read_usage_cache(path: &Path, now: DateTime<Utc>) -> Option<UsageData> {
    let contents = std::fs::read_to_string(path).ok()?;
    let cache: UsageCache = match serde_json::from_str(&contents) {
        Ok(cache) => cache,
        Err(e) => {
            tracing::debug!("ignoring malformed usage cache: {}", e);
            return None;
        }
    };
    let ttl = if cache.data.api_unavailable {
        CACHE_FAILURE_TTL_MS
    } else {
        CACHE_TTL_MS
    };
    let age = now.timestamp_millis() - cache.timestamp;
    if age >= ttl {
        tracing::debug!("usage cache is stale ({} ms old)", age);
        return None;
    }
    Some(cache.data)
}
