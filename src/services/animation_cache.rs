// src/services/animation_cache.rs
use std::{collections::HashMap, sync::Arc, time::Duration};

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::sync::RwLock;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Process-wide cache of decorative animation descriptors, keyed by URL.
///
/// Entries are filled on first request and never evicted. A failed fetch is
/// cached as `None` as well.
#[derive(Debug, Clone)]
pub struct AnimationCache {
    client: Client,
    inner: Arc<RwLock<HashMap<String, Option<Value>>>>,
}

impl AnimationCache {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn get(&self, url: &str) -> Option<Value> {
        if let Some(cached) = self.inner.read().await.get(url) {
            return cached.clone();
        }

        // Write lock held across the fetch so one URL is fetched only once.
        let mut guard = self.inner.write().await;
        if let Some(cached) = guard.get(url) {
            return cached.clone();
        }
        let fetched = self.fetch(url).await;
        guard.insert(url.to_string(), fetched.clone());
        fetched
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    async fn fetch(&self, url: &str) -> Option<Value> {
        let response = match self.client.get(url).timeout(FETCH_TIMEOUT).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(%url, error = %err, "animation fetch failed");
                return None;
            }
        };
        if response.status() != StatusCode::OK {
            tracing::debug!(%url, status = %response.status(), "animation unavailable");
            return None;
        }
        match response.json::<Value>().await {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!(%url, error = %err, "animation body is not JSON");
                None
            }
        }
    }
}
