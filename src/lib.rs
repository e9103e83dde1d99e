//! Tutor Gateway - cached access to the AI Vision Tutor backend
//!
//! Provides a cache-aware API client for the tutor backend and a small
//! gateway server that exposes the same HTTP contract in front of it.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod languages;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use client::ApiClient;
pub use config::Config;
pub use error::RequestError;
pub use tasks::spawn_cleanup_task;
