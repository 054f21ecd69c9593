//! Cache contract for scene/topic images fetched by a front end.
//!
//! Nothing here talks to the network. A front end that looks up NASA
//! imagery stores the resulting URL lists under a stable topic key and
//! reads them back through [`ImageCache`]. Persisted blobs are decoded
//! with [`decode_cached_urls`], which rejects malformed payloads instead
//! of silently dropping bad entries.

use std::collections::HashMap;

use log::{debug, warn};
use serde_json::Value;
use thiserror::Error;

/// Prefix for every image cache key. Bump the version suffix when the
/// stored format changes.
pub const CACHE_KEY_PREFIX: &str = "nasa_space_weather_images_v1_";

pub fn cache_key(topic: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{topic}")
}

pub trait ImageCache {
    /// URLs stored under `key`, or an empty list.
    fn get(&self, key: &str) -> Vec<String>;
    fn put(&mut self, key: &str, urls: Vec<String>);
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheDecodeError {
    #[error("cached value is not valid JSON: {0}")]
    Json(String),

    #[error("cached value is not an array")]
    NotAnArray,

    #[error("entry {index} is not a non-empty string")]
    InvalidEntry { index: usize },
}

/// Decode a persisted URL list. Accepts only a JSON array of non-empty
/// strings.
pub fn decode_cached_urls(raw: &str) -> Result<Vec<String>, CacheDecodeError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| CacheDecodeError::Json(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(CacheDecodeError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(url) if !url.is_empty() => Ok(url),
            _ => Err(CacheDecodeError::InvalidEntry { index }),
        })
        .collect()
}

pub fn encode_cached_urls(urls: &[String]) -> String {
    Value::from(urls.to_vec()).to_string()
}

/// Session-scoped cache holding the serialized form, the way a browser
/// session store would.
#[derive(Debug, Default)]
pub struct MemoryImageCache {
    entries: HashMap<String, String>,
}

impl MemoryImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw blob as-is, bypassing encoding.
    pub fn put_raw(&mut self, key: &str, raw: impl Into<String>) {
        self.entries.insert(key.to_string(), raw.into());
    }
}

impl ImageCache for MemoryImageCache {
    fn get(&self, key: &str) -> Vec<String> {
        let Some(raw) = self.entries.get(key) else {
            return Vec::new();
        };
        match decode_cached_urls(raw) {
            Ok(urls) => {
                debug!("Image cache hit for {key}: {} urls", urls.len());
                urls
            }
            Err(e) => {
                warn!("Ignoring corrupt image cache entry {key}: {e}");
                Vec::new()
            }
        }
    }

    fn put(&mut self, key: &str, urls: Vec<String>) {
        self.entries.insert(key.to_string(), encode_cached_urls(&urls));
    }
}
