use serde::{Deserialize, Serialize};
use twitter_client::Credentials;

/// Per-session OAuth state.
///
/// The request-token pair is written at the start of the handshake and
/// read at the callback; it is superseded by the next handshake, never
/// cleared. The access pair is written at the callback and read on every
/// authenticated request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_token_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_secret: Option<String>,
}

impl SessionData {
    pub fn set_request_token(&mut self, token: &Credentials) {
        self.oauth_token = Some(token.token.clone());
        self.oauth_token_secret = Some(token.secret.clone());
    }

    pub fn set_access_credentials(&mut self, credentials: &Credentials) {
        self.access_token = Some(credentials.token.clone());
        self.access_secret = Some(credentials.secret.clone());
    }

    /// The access pair, if both halves are present and non-empty.
    pub fn access_credentials(&self) -> Option<Credentials> {
        pair(&self.access_token, &self.access_secret)
    }

    /// The request pair stored at handshake step 1.
    pub fn request_token(&self) -> Option<Credentials> {
        pair(&self.oauth_token, &self.oauth_token_secret)
    }
}

fn pair(token: &Option<String>, secret: &Option<String>) -> Option<Credentials> {
    match (non_empty(token), non_empty(secret)) {
        (Some(token), Some(secret)) => Some(Credentials::new(token, secret)),
        _ => None,
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
