use std::path::Path;

use async_trait::async_trait;

use crate::error::TwitterResult;
use crate::types::{AccessGrant, AuthLink, CreatedTweet, Credentials, User};

/// The provider capabilities the application depends on.
///
/// Kept deliberately narrow so handlers can be exercised against a mock.
#[async_trait]
pub trait TwitterApi: Send + Sync {
    /// Obtain a request token bound to `callback_url` and the URL the
    /// browser must visit to authorize it.
    async fn generate_auth_link(&self, callback_url: &str) -> TwitterResult<AuthLink>;

    /// Exchange an authorized request token and its verifier for an access
    /// token.
    async fn login(&self, request_token: &Credentials, verifier: &str)
        -> TwitterResult<AccessGrant>;

    /// Fetch the profile of the user owning `credentials`.
    async fn current_user(&self, credentials: &Credentials) -> TwitterResult<User>;

    /// Upload a media file and return its media identifier.
    async fn upload_media(
        &self,
        credentials: &Credentials,
        path: &Path,
        mime_type: &str,
    ) -> TwitterResult<String>;

    /// Create a tweet, attaching `media_ids` when non-empty.
    async fn create_tweet(
        &self,
        credentials: &Credentials,
        text: &str,
        media_ids: &[String],
    ) -> TwitterResult<CreatedTweet>;
}
