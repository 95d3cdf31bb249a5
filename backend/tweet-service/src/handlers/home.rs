use actix_session::Session;
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::session::SessionDataExt;
use crate::AppState;

/// Render the home page for the current session
pub async fn home(state: web::Data<AppState>, session: Session) -> Result<HttpResponse> {
    let user = match session.access_credentials()? {
        Some(credentials) => Some(state.twitter.current_user(&credentials).await?),
        None => None,
    };

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(state.views.render_home(user.as_ref())?))
}
