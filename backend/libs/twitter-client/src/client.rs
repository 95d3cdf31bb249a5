//! reqwest-backed implementation of [`TwitterApi`].

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::api::TwitterApi;
use crate::config::TwitterConfig;
use crate::error::{TwitterError, TwitterResult};
use crate::oauth::{percent_encode, OAuthSigner};
use crate::types::{
    AccessGrant, AuthLink, CreateTweetRequest, CreateTweetResponse, CreatedTweet, Credentials,
    TweetMedia, User,
};

/// Twitter REST client. One instance is shared by all sessions; user
/// credentials are supplied per call.
#[derive(Debug, Clone)]
pub struct TwitterClient {
    pub(crate) http: Client,
    pub(crate) config: TwitterConfig,
    pub(crate) signer: OAuthSigner,
}

impl TwitterClient {
    pub fn new(config: TwitterConfig) -> TwitterResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("tweet-service/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_http_client(config, http))
    }

    pub fn with_http_client(config: TwitterConfig, http: Client) -> Self {
        let signer = OAuthSigner::new(&config.consumer_key, &config.consumer_secret);
        Self {
            http,
            config,
            signer,
        }
    }

    pub fn config(&self) -> &TwitterConfig {
        &self.config
    }

    fn api_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url, path)
    }

    /// Read an `application/x-www-form-urlencoded` token response.
    async fn token_response(&self, response: Response) -> TwitterResult<HashMap<String, String>> {
        let body = ensure_success(response).await?.text().await?;
        Ok(parse_form(&body))
    }

    pub(crate) async fn json<T: DeserializeOwned>(response: Response) -> TwitterResult<T> {
        let body = ensure_success(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl TwitterApi for TwitterClient {
    #[instrument(skip(self))]
    async fn generate_auth_link(&self, callback_url: &str) -> TwitterResult<AuthLink> {
        let url = self.api_endpoint("/oauth/request_token");
        let auth = self
            .signer
            .sign("POST", &url, &[("oauth_callback", callback_url)], None)?;

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .send()
            .await?;
        let params = self.token_response(response).await?;

        let oauth_token = required(&params, "oauth_token")?;
        let oauth_token_secret = required(&params, "oauth_token_secret")?;
        let oauth_callback_confirmed = params
            .get("oauth_callback_confirmed")
            .is_some_and(|v| v == "true");

        if !oauth_callback_confirmed {
            warn!("request token issued without callback confirmation");
        }

        Ok(AuthLink {
            url: format!(
                "{}?oauth_token={}",
                self.api_endpoint("/oauth/authenticate"),
                percent_encode(&oauth_token)
            ),
            oauth_token,
            oauth_token_secret,
            oauth_callback_confirmed,
        })
    }

    #[instrument(skip(self, request_token, verifier))]
    async fn login(
        &self,
        request_token: &Credentials,
        verifier: &str,
    ) -> TwitterResult<AccessGrant> {
        let url = self.api_endpoint("/oauth/access_token");
        let auth = self.signer.sign(
            "POST",
            &url,
            &[("oauth_verifier", verifier)],
            Some(request_token),
        )?;

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .send()
            .await?;
        let params = self.token_response(response).await?;

        let grant = AccessGrant {
            credentials: Credentials::new(
                required(&params, "oauth_token")?,
                required(&params, "oauth_token_secret")?,
            ),
            user_id: params.get("user_id").cloned(),
            screen_name: params.get("screen_name").cloned(),
        };
        debug!(screen_name = ?grant.screen_name, "access token issued");

        Ok(grant)
    }

    #[instrument(skip(self, credentials))]
    async fn current_user(&self, credentials: &Credentials) -> TwitterResult<User> {
        let url = self.api_endpoint("/1.1/account/verify_credentials.json");
        let auth = self.signer.sign("GET", &url, &[], Some(credentials))?;

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .send()
            .await?;

        Self::json(response).await
    }

    #[instrument(skip(self, credentials))]
    async fn upload_media(
        &self,
        credentials: &Credentials,
        path: &Path,
        mime_type: &str,
    ) -> TwitterResult<String> {
        self.chunked_upload(credentials, path, mime_type).await
    }

    #[instrument(skip(self, credentials, text))]
    async fn create_tweet(
        &self,
        credentials: &Credentials,
        text: &str,
        media_ids: &[String],
    ) -> TwitterResult<CreatedTweet> {
        let url = self.api_endpoint("/2/tweets");
        let auth = self.signer.sign("POST", &url, &[], Some(credentials))?;

        let body = CreateTweetRequest {
            text,
            media: (!media_ids.is_empty()).then_some(TweetMedia { media_ids }),
        };

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .json(&body)
            .send()
            .await?;

        let created: CreateTweetResponse = Self::json(response).await?;
        Ok(created.data)
    }
}

/// Map a non-success response onto [`TwitterError`].
pub(crate) async fn ensure_success(response: Response) -> TwitterResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(TwitterError::from_status(status.as_u16(), error_message(&body)))
}

/// Pull a human readable message out of a v1.1 or v2 error body.
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    value
        .get("errors")
        .and_then(|errors| errors.get(0))
        .and_then(|first| first.get("message"))
        .or_else(|| value.get("detail"))
        .or_else(|| value.get("title"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

fn parse_form(body: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .collect()
}

fn required(params: &HashMap<String, String>, key: &str) -> TwitterResult<String> {
    params
        .get(key)
        .filter(|v| !v.is_empty())
        .cloned()
        .ok_or_else(|| TwitterError::InvalidResponse(format!("Missing {key}")))
}
