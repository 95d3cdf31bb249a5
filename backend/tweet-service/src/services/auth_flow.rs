/// Three-legged OAuth 1.0a handshake.
///
/// `Unauthenticated -> RequestTokenIssued -> Authenticated`. Logout is the
/// only way back and is handled by purging the session.
use actix_session::Session;
use tracing::{info, warn};
use twitter_client::{AccessGrant, Credentials, TwitterApi};

use crate::error::{AppError, Result};
use crate::session::SessionDataExt;

pub struct AuthFlow<'a> {
    twitter: &'a dyn TwitterApi,
    callback_url: &'a str,
}

impl<'a> AuthFlow<'a> {
    pub fn new(twitter: &'a dyn TwitterApi, callback_url: &'a str) -> Self {
        Self {
            twitter,
            callback_url,
        }
    }

    /// Step 1: obtain a request token and return the authorization URL.
    ///
    /// The session is only written once Twitter has confirmed the callback.
    pub async fn begin_handshake(&self, session: &Session) -> Result<String> {
        let link = self.twitter.generate_auth_link(self.callback_url).await?;

        if !link.oauth_callback_confirmed {
            warn!(callback_url = %self.callback_url, "Twitter did not confirm the OAuth callback");
            return Err(AppError::HandshakeRejected);
        }

        let request_token = link.request_token();
        session.update_data(|data| data.set_request_token(&request_token))?;

        Ok(link.url)
    }

    /// Step 2: exchange the returned token and verifier for access
    /// credentials and store them in the session.
    pub async fn complete_handshake(
        &self,
        session: &Session,
        returned_token: Option<&str>,
        verifier: Option<&str>,
    ) -> Result<AccessGrant> {
        let data = session.data()?;

        let (token, verifier, secret) = match (
            non_empty(returned_token),
            non_empty(verifier),
            non_empty(data.oauth_token_secret.as_deref()),
        ) {
            (Some(token), Some(verifier), Some(secret)) => (token, verifier, secret),
            _ => return Err(AppError::MissingHandshakeState),
        };

        if let Some(stored) = non_empty(data.oauth_token.as_deref()) {
            if stored != token {
                warn!("callback token does not match stored request token");
                return Err(AppError::MissingHandshakeState);
            }
        }

        let grant = self
            .twitter
            .login(&Credentials::new(token, secret), verifier)
            .await?;

        session.update_data(|data| data.set_access_credentials(&grant.credentials))?;
        // Fresh session key once the user is authenticated
        session.renew();
        info!(screen_name = ?grant.screen_name, "OAuth handshake completed");

        Ok(grant)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
