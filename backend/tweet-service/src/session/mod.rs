//! Browser sessions.
//!
//! `actix-session` owns the cookie and the session lifecycle; state lives
//! in the in-process [`MemorySessionStore`]. Handlers read and write the
//! typed [`SessionData`] through [`SessionDataExt`].

mod data;
mod store;

pub use data::SessionData;
pub use store::MemorySessionStore;

use std::time::Duration;

use actix_session::config::{BrowserSession, CookieContentSecurity, TtlExtensionPolicy};
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::{time::Duration as CookieDuration, Key, SameSite};
use twitter_client::Credentials;

use crate::error::{AppError, Result};

pub const SESSION_COOKIE: &str = "tweet.sid";

/// Key the [`SessionData`] payload is stored under
const DATA_KEY: &str = "twitter";

/// Session middleware: signed `tweet.sid` cookie, no max-age, server-side
/// state expiring after `idle_timeout` without a request.
pub fn middleware(
    store: MemorySessionStore,
    key: Key,
    secure: bool,
    idle_timeout: Duration,
) -> SessionMiddleware<MemorySessionStore> {
    let state_ttl = CookieDuration::seconds(idle_timeout.as_secs().min(i64::MAX as u64) as i64);

    SessionMiddleware::builder(store, key)
        .cookie_name(SESSION_COOKIE.to_string())
        .cookie_path("/".to_string())
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .cookie_secure(secure)
        .cookie_content_security(CookieContentSecurity::Signed)
        .session_lifecycle(
            BrowserSession::default()
                .state_ttl(state_ttl)
                .state_ttl_extension_policy(TtlExtensionPolicy::OnEveryRequest),
        )
        .build()
}

/// Typed access to the OAuth state in an `actix_session::Session`.
pub trait SessionDataExt {
    /// Snapshot of the session's data; empty for a fresh session.
    fn data(&self) -> Result<SessionData>;

    /// Apply `f` and write the result back. Last write wins.
    fn update_data<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut SessionData);

    fn access_credentials(&self) -> Result<Option<Credentials>> {
        Ok(self.data()?.access_credentials())
    }
}

impl SessionDataExt for Session {
    fn data(&self) -> Result<SessionData> {
        self.get::<SessionData>(DATA_KEY)
            .map(Option::unwrap_or_default)
            .map_err(|e| AppError::Internal(format!("session read failed: {e}")))
    }

    fn update_data<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut SessionData),
    {
        let mut data = self.data()?;
        f(&mut data);
        self.insert(DATA_KEY, data)
            .map_err(|e| AppError::Internal(format!("session write failed: {e}")))
    }
}
