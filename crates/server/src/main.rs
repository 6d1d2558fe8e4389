mod api;
mod config;
mod db;
mod error;
mod filter;
mod service;
mod store;

use anyhow::Context;
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::{
    config::ServerConfig,
    db::{
        migrations::run_migrations,
        pool::{check_pool_health, create_pg_pool, PoolConfig},
    },
    error::{attach_request_id_header, request_id_from_headers_or_generate, with_request_id_scope},
    filter::{ContentFilter, HttpFilterClient},
    service::DocumentService,
    store::DocumentStore,
};

const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = ServerConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&cfg.log_filter)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let database_url = cfg
        .database_url
        .as_deref()
        .context("QUIRE_SERVER_DATABASE_URL must be set")?;

    let pool = create_pg_pool(database_url, PoolConfig::from_env())
        .await
        .context("failed to initialize PostgreSQL pool")?;
    run_migrations(&pool).await?;
    check_pool_health(&pool).await?;

    let filter = ContentFilter::Http(HttpFilterClient::new(&cfg.filter_url));
    let service = DocumentService::new(DocumentStore::Postgres(pool), filter);
    let app = build_router(api::router(service));

    let listener = TcpListener::bind(cfg.listen_addr)
        .await
        .with_context(|| format!("failed to bind listener on {}", cfg.listen_addr))?;

    info!(listen_addr = %cfg.listen_addr, filter_url = %cfg.filter_url, "starting quire server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited unexpectedly")
}

fn build_router(api_router: Router) -> Router {
    apply_middleware(Router::new().route("/healthz", get(healthz)).merge(api_router))
}

fn apply_middleware(router: Router) -> Router {
    router
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(request_context_middleware))
        .layer(middleware::from_fn(panic_handler))
}

async fn healthz() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received");
}

async fn panic_handler(request: Request<Body>, next: Next) -> Response {
    match tokio::spawn(async move { next.run(request).await }).await {
        Ok(response) => response,
        Err(join_error) => {
            error!(?join_error, "request handling panicked");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn request_context_middleware(request: Request<Body>, next: Next) -> Response {
    let request_id = request_id_from_headers_or_generate(request.headers());

    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started_at = Instant::now();

    // Scoped so error envelopes produced anywhere below carry the id.
    let mut response = with_request_id_scope(request_id.clone(), next.run(request)).await;

    attach_request_id_header(&mut response, &request_id);

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        latency_ms = started_at.elapsed().as_millis() as u64,
        "request completed"
    );

    response
}
