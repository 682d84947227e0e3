// src/services/mod.rs
pub mod animation_cache;
pub mod conversation;
pub mod relay;
pub mod session_manager;
