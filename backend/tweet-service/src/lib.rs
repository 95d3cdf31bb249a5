//! Tweet Service
//!
//! Small web app that signs a user in with Twitter (three-legged OAuth
//! 1.0a) and posts a tweet on their behalf, optionally with one image.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod session;
pub mod uploads;
pub mod views;

use std::path::PathBuf;
use std::sync::Arc;

use twitter_client::TwitterApi;

use crate::views::Views;

// Public re-exports
pub use config::Config;
pub use error::{AppError, Result};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub twitter: Arc<dyn TwitterApi>,
    pub callback_url: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub views: Views,
}

impl AppState {
    pub fn new(
        twitter: Arc<dyn TwitterApi>,
        config: &Config,
    ) -> std::result::Result<Self, tera::Error> {
        Ok(Self {
            twitter,
            callback_url: config.callback_url(),
            upload_dir: config.upload_dir(),
            max_upload_bytes: config.max_upload_bytes,
            views: Views::new()?,
        })
    }
}
