//! # Twitter Client
//!
//! OAuth 1.0a signed access to the handful of Twitter endpoints the
//! posting service needs:
//!
//! - `oauth`: HMAC-SHA1 request signing
//! - `api`: the [`TwitterApi`] trait handlers depend on
//! - `client`: reqwest implementation of [`TwitterApi`]
//! - `media`: chunked media upload

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod media;
pub mod oauth;
pub mod types;

pub use api::TwitterApi;
pub use client::TwitterClient;
pub use config::TwitterConfig;
pub use error::{TwitterError, TwitterResult};
pub use oauth::OAuthSigner;
pub use types::{AccessGrant, AuthLink, CreatedTweet, Credentials, User};
