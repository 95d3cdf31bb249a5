use actix_multipart::Multipart;
use actix_session::Session;
use actix_web::{web, HttpResponse};

use super::redirect;
use crate::error::{AppError, Result};
use crate::services::PostService;
use crate::session::SessionDataExt;
use crate::uploads;
use crate::AppState;

/// Post the submitted status, with the optional image attached.
///
/// The uploaded image, if any, is removed when `submission` drops.
pub async fn post_tweet(
    state: web::Data<AppState>,
    session: Session,
    payload: Multipart,
) -> Result<HttpResponse> {
    let credentials = session
        .access_credentials()?
        .ok_or(AppError::NotAuthenticated)?;

    let submission =
        uploads::read_post_form(payload, &state.upload_dir, state.max_upload_bytes).await?;

    PostService::new(state.twitter.as_ref())
        .submit_post(&credentials, &submission)
        .await?;

    Ok(redirect("/"))
}
