/// Route table shared by the binary and the integration tests
use actix_web::{web, HttpResponse};

use crate::config::CALLBACK_PATH;
use crate::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::home))
        .route("/auth", web::get().to(handlers::begin_auth))
        .route(CALLBACK_PATH, web::get().to(handlers::auth_callback))
        .route("/tweet", web::post().to(handlers::post_tweet))
        .route("/logout", web::get().to(handlers::logout))
        .route("/health", web::get().to(|| async { HttpResponse::Ok().body("OK") }));
}
