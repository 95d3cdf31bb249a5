/// HTTP handlers
///
/// - Home: login prompt or profile plus post form
/// - Auth: OAuth handshake start, callback and logout
/// - Tweet: post form submission
pub mod auth;
pub mod home;
pub mod tweet;

use actix_web::{http::header, HttpResponse};

pub use auth::{auth_callback, begin_auth, logout};
pub use home::home;
pub use tweet::post_tweet;

/// 302 to `location`.
pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}
