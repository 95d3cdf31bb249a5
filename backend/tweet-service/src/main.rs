/// Tweet Service - HTTP Server
///
/// Sign in with Twitter and post a tweet, optionally with an image.
use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tweet_service::session::{self, MemorySessionStore};
use tweet_service::{routes, AppState, Config};
use twitter_client::TwitterClient;

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tweet_service=info,twitter_client=info,actix_web=info".into()
            }),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(?config, "configuration loaded");

    tokio::fs::create_dir_all(config.upload_dir())
        .await
        .with_context(|| format!("Failed to create upload dir {}", config.upload_dir))?;

    let twitter = TwitterClient::new(config.twitter()).context("Failed to build Twitter client")?;
    let state = AppState::new(Arc::new(twitter), &config).context("Failed to load templates")?;

    let store = MemorySessionStore::new();
    let session_key = config.session_key();
    let cookie_secure = config.session_cookie_secure;
    let idle_timeout = config.session_idle_timeout();

    let purge_store = store.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = purge_store.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, remaining = purge_store.len(), "purged idle sessions");
            }
        }
    });

    let bind_address = config.bind_address();
    tracing::info!("Tweet service starting HTTP server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(session::middleware(
                store.clone(),
                session_key.clone(),
                cookie_secure,
                idle_timeout,
            ))
            .wrap(TracingLogger::default())
            .configure(routes::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {bind_address}"))?
    .run()
    .await?;

    tracing::info!("Tweet service shutting down");
    Ok(())
}
