/// OAuth handshake handlers
use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::redirect;
use crate::error::{AppError, Result};
use crate::services::AuthFlow;
use crate::AppState;

/// Query string Twitter appends to the callback URL
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub oauth_token: Option<String>,
    pub oauth_verifier: Option<String>,
    /// Present instead of the verifier when the user declines
    pub denied: Option<String>,
}

/// Start the handshake and send the browser to Twitter
pub async fn begin_auth(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    let flow = AuthFlow::new(state.twitter.as_ref(), &state.callback_url);
    let url = flow.begin_handshake(&session).await?;
    Ok(redirect(&url))
}

/// Callback from Twitter carrying `oauth_token` and `oauth_verifier`
pub async fn auth_callback(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<CallbackQuery>,
) -> Result<HttpResponse> {
    if query.denied.is_some() {
        tracing::info!("user declined authorization");
        return Err(AppError::MissingHandshakeState);
    }

    let flow = AuthFlow::new(state.twitter.as_ref(), &state.callback_url);
    flow.complete_handshake(
        &session,
        query.oauth_token.as_deref(),
        query.oauth_verifier.as_deref(),
    )
    .await?;

    Ok(redirect("/"))
}

/// Destroy the session and return home
pub async fn logout(session: Session) -> HttpResponse {
    session.purge();
    redirect("/")
}
