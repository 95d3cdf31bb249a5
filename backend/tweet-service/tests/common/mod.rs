#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{test, web, App};
use mockall::mock;

use tweet_service::session::{self, MemorySessionStore, SESSION_COOKIE};
use tweet_service::views::Views;
use tweet_service::{routes, AppState};
use twitter_client::{
    AccessGrant, AuthLink, CreatedTweet, Credentials, TwitterApi, TwitterResult, User,
};

pub const CALLBACK_URL: &str = "http://localhost:3000/auth/twitter";
pub const SESSION_SECRET: &str = "integration-test-session-secret-0123456789";
pub const BOUNDARY: &str = "----tweetserviceboundary7MA4YWxk";

mock! {
    pub Twitter {}

    #[async_trait::async_trait]
    impl TwitterApi for Twitter {
        async fn generate_auth_link(&self, callback_url: &str) -> TwitterResult<AuthLink>;
        async fn login(&self, request_token: &Credentials, verifier: &str) -> TwitterResult<AccessGrant>;
        async fn current_user(&self, credentials: &Credentials) -> TwitterResult<User>;
        async fn upload_media(&self, credentials: &Credentials, path: &Path, mime_type: &str) -> TwitterResult<String>;
        async fn create_tweet(&self, credentials: &Credentials, text: &str, media_ids: &[String]) -> TwitterResult<CreatedTweet>;
    }
}

pub fn state(twitter: MockTwitter, upload_dir: &Path) -> AppState {
    AppState {
        twitter: Arc::new(twitter),
        callback_url: CALLBACK_URL.to_string(),
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: 1024,
        views: Views::new().unwrap(),
    }
}

pub fn store() -> MemorySessionStore {
    MemorySessionStore::new()
}

/// Application wired the same way as the binary.
pub fn app(
    state: AppState,
    store: MemorySessionStore,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(session::middleware(
            store,
            Key::derive_from(SESSION_SECRET.as_bytes()),
            false,
            Duration::from_secs(600),
        ))
        .configure(routes::configure)
}

/// Session cookie issued by a response, if any.
pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(actix_web::http::header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
        .to_string()
}

pub fn user() -> User {
    User {
        id: "783214".into(),
        name: "Twitter".into(),
        screen_name: "twitter".into(),
        description: None,
        profile_image_url_https: Some("https://pbs.twimg.com/profile_images/x.jpg".into()),
    }
}

pub fn auth_link(confirmed: bool) -> AuthLink {
    AuthLink {
        url: "https://api.twitter.com/oauth/authenticate?oauth_token=req-token".into(),
        oauth_token: "req-token".into(),
        oauth_token_secret: "req-secret".into(),
        oauth_callback_confirmed: confirmed,
    }
}

pub fn access_grant() -> AccessGrant {
    AccessGrant {
        credentials: Credentials::new("access-token", "access-secret"),
        user_id: Some("783214".into()),
        screen_name: Some("twitter".into()),
    }
}

pub fn access_credentials() -> Credentials {
    access_grant().credentials
}

/// Expect one successful handshake: request token, then verifier exchange.
pub fn expect_handshake(twitter: &mut MockTwitter) {
    twitter
        .expect_generate_auth_link()
        .times(1)
        .returning(|_| Ok(auth_link(true)));
    twitter
        .expect_login()
        .withf(|token, verifier| {
            *token == Credentials::new("req-token", "req-secret") && verifier == "the-verifier"
        })
        .times(1)
        .returning(|_, _| Ok(access_grant()));
}

/// Run the handshake through the app and return the authenticated cookie.
pub async fn sign_in<S, B>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::get().uri("/auth").to_request();
    let resp = test::call_service(app, req).await;
    let cookie = session_cookie(&resp).expect("session cookie after /auth");

    let req = test::TestRequest::get()
        .uri("/auth/twitter?oauth_token=req-token&oauth_verifier=the-verifier")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::FOUND);
    session_cookie(&resp).expect("renewed session cookie")
}

/// Image part of a post form: (file name, content type, bytes).
pub type ImagePart<'a> = (&'a str, &'a str, &'a [u8]);

/// Content type header value for [`multipart_body`].
pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

pub fn multipart_body(status: &str, image: Option<ImagePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"status\"\r\n\r\n{status}\r\n",
            b = BOUNDARY,
            status = status
        )
        .as_bytes(),
    );
    if let Some((file_name, content_type, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{f}\"\r\nContent-Type: {ct}\r\n\r\n",
                b = BOUNDARY,
                f = file_name,
                ct = content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn dir_is_empty(dir: &Path) -> bool {
    match std::fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => true,
    }
}
