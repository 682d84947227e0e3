// src/state.rs
use std::sync::Arc;

use crate::config::Settings;
use crate::services::animation_cache::AnimationCache;
use crate::services::relay::{EndpointSource, WebhookRelay, build_client};
use crate::services::session_manager::SessionManager;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub sessions: SessionManager,
    pub relay: WebhookRelay,
    pub animations: AnimationCache,
    pub animation_url: Option<String>,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        Self::with_endpoint(settings, EndpointSource::default())
    }

    pub fn with_endpoint(settings: &Settings, endpoint: EndpointSource) -> Self {
        let client = build_client();
        Self {
            sessions: SessionManager::new(settings.session_ttl),
            relay: WebhookRelay::new(client.clone(), endpoint, settings.webhook_timeout),
            animations: AnimationCache::new(client),
            animation_url: settings.animation_url.clone(),
        }
    }
}
