//! Request and response types for the Twitter endpoints this client uses.

use serde::{Deserialize, Serialize};

/// An OAuth (token, secret) pair.
///
/// Used both for the short-lived request token issued at the start of the
/// handshake and for the long-lived access token that authenticates posts.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: secret.into(),
        }
    }
}

// Secrets never reach logs through Debug.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Result of the request-token step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthLink {
    /// Where the browser must be sent to authorize the application
    pub url: String,
    pub oauth_token: String,
    pub oauth_token_secret: String,
    /// True only when the provider answered `oauth_callback_confirmed=true`
    pub oauth_callback_confirmed: bool,
}

impl AuthLink {
    pub fn request_token(&self) -> Credentials {
        Credentials::new(&self.oauth_token, &self.oauth_token_secret)
    }
}

/// Result of exchanging a verifier for an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    pub credentials: Credentials,
    pub user_id: Option<String>,
    pub screen_name: Option<String>,
}

/// The authenticated user, as returned by `account/verify_credentials`.
///
/// `Serialize` feeds the page templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "id_str")]
    pub id: String,
    pub name: String,
    pub screen_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub profile_image_url_https: Option<String>,
}

/// Body of `POST /2/tweets`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTweetRequest<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<TweetMedia<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TweetMedia<'a> {
    pub media_ids: &'a [String],
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreateTweetResponse {
    pub data: CreatedTweet,
}

/// A tweet created through the v2 API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedTweet {
    pub id: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::new("token-123", "very-secret");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("token-123"));
        assert!(!debug.contains("very-secret"));
    }

    #[test]
    fn test_create_tweet_request_without_media() {
        let body = CreateTweetRequest {
            text: "hello",
            media: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "text": "hello" }));
    }

    #[test]
    fn test_create_tweet_request_with_media() {
        let ids = vec!["1455952740635586573".to_string()];
        let body = CreateTweetRequest {
            text: "look",
            media: Some(TweetMedia { media_ids: &ids }),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "text": "look", "media": { "media_ids": ["1455952740635586573"] } })
        );
    }

    #[test]
    fn test_user_deserializes_from_verify_credentials() {
        let body = r#"{
            "id": 6253282,
            "id_str": "6253282",
            "name": "Twitter API",
            "screen_name": "TwitterAPI",
            "profile_image_url_https": "https://pbs.twimg.com/profile_images/942858479592554497/BbazLO9L_normal.jpg",
            "followers_count": 6133636
        }"#;
        let user: User = serde_json::from_str(body).unwrap();
        assert_eq!(user.id, "6253282");
        assert_eq!(user.screen_name, "TwitterAPI");
        assert!(user.description.is_none());
        assert!(user.profile_image_url_https.is_some());
    }
}
