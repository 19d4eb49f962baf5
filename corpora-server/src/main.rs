//! Process entry point (spec §5): build every collaborator once, assemble
//! [`corpora_api::AppState`], start the HTTP listener and the ingestion
//! worker pool, then wait for a shutdown signal and drain in order —
//! stop accepting HTTP, stop pulling new jobs, let in-flight work finish.

use anyhow::{Context, Result};
use corpora_api::AppState;
use corpora_auth::{AuthService, LoggingEmailSender};
use corpora_catalog::{DocumentRepo, RateLimitRepo, RefreshTokenRepo, TenantRepo};
use corpora_config::AppConfig;
use corpora_crypto::MasterKey;
use corpora_jobs::JobQueue;
use corpora_orchestrator::{IngestionOrchestrator, IngestionWorker, ProgressBus};
use corpora_rag::{HttpEmbedder, IdentityReranker};
use corpora_ratelimit::{RateLimiter, UsageTracker};
use corpora_vector::PgVectorIndex;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let config = AppConfig::from_env().context("loading configuration")?;
    let master_key = MasterKey::from_hex(&config.master_key_hex).context("parsing master key")?;

    let catalog_pool =
        corpora_catalog::build_pool(&config.catalog).context("building catalog pool")?;
    corpora_catalog::run_migrations(&catalog_pool)
        .await
        .context("running catalog migrations")?;

    let vector_store_config = corpora_vector::VectorStoreConfig {
        host: config.catalog.host.clone(),
        port: config.catalog.port,
        user: config.catalog.user.clone(),
        password: config.catalog.password.clone(),
        dbname: config.catalog.dbname.clone(),
        max_size: config.catalog.max_size,
        idle_timeout: config.catalog.idle_timeout,
        acquire_timeout: config.catalog.acquire_timeout,
    };
    let vector_pool =
        corpora_vector::build_pool(&vector_store_config).context("building vector pool")?;
    corpora_vector::run_migrations(&vector_pool)
        .await
        .context("running vector migrations")?;

    let tenants = TenantRepo::new(catalog_pool.clone());
    let documents = DocumentRepo::new(catalog_pool.clone());
    let refresh_tokens = RefreshTokenRepo::new(catalog_pool.clone());
    let verifications = corpora_catalog::EmailVerificationRepo::new(catalog_pool.clone());
    let rate_limit_repo = RateLimitRepo::new(catalog_pool.clone());
    let usage_repo = corpora_catalog::UsageRepo::new(catalog_pool.clone());

    let auth = Arc::new(AuthService::new(
        tenants.clone(),
        refresh_tokens,
        verifications,
        master_key.clone(),
        Arc::new(LoggingEmailSender),
        config.auth.clone(),
    ));

    let blob: Arc<dyn corpora_blob::BlobStore> = if config.server.blob_in_memory {
        Arc::new(corpora_blob::InMemoryBlobStore::default())
    } else {
        Arc::new(corpora_blob::S3BlobStore::from_env(config.server.blob_bucket.clone()).await)
    };
    let vector = Arc::new(PgVectorIndex::new(vector_pool));
    let metrics = corpora_core::Metrics::new();
    let max_attempts = config.queue.max_attempts;
    let queue = JobQueue::new(config.queue, metrics.clone());

    let platform_embedder: Arc<dyn corpora_rag::Embedder> = Arc::new(HttpEmbedder::new(
        config.server.embedder_base_url.clone(),
        config.server.platform_embedder_api_key.clone(),
    ));
    let reranker: Arc<dyn corpora_rag::Reranker> = Arc::new(IdentityReranker);

    let orchestrator = Arc::new(IngestionOrchestrator::new(
        documents.clone(),
        tenants.clone(),
        blob.clone(),
        vector.clone(),
        queue.clone(),
        usage_repo.clone(),
    ));
    let progress = Arc::new(ProgressBus::new());

    let worker_handler = Arc::new(IngestionWorker::new(
        documents.clone(),
        tenants.clone(),
        vector.clone(),
        blob.clone(),
        usage_repo.clone(),
        progress.clone(),
        master_key,
        config.server.embedder_base_url.clone(),
        platform_embedder.clone(),
        max_attempts,
    ));
    let worker_pool = corpora_jobs::WorkerPool::spawn(queue.clone(), worker_handler);

    let state = Arc::new(AppState {
        auth,
        rate_limiter: RateLimiter::new(rate_limit_repo, metrics.clone()),
        usage: UsageTracker::new(usage_repo),
        tenants,
        documents,
        blob,
        vector,
        orchestrator,
        progress,
        platform_embedder,
        embedder_base_url: config.server.embedder_base_url.clone(),
        reranker,
        mcp_sessions: Arc::new(corpora_api::mcp::session::McpSessions::new()),
        metrics,
    });

    let cors = build_cors_layer(&config.server.cors_origins());
    let app = corpora_api::router(state.clone(), cors).merge(operational_routes(state));

    let bind_addr = format!("{}:{}", config.server.bind_addr, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {bind_addr}"))?;
    tracing::info!(%bind_addr, "corpora-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    tracing::info!("http listener stopped, draining worker pool");
    worker_pool.shutdown().await;
    tracing::info!("shutdown complete");

    Ok(())
}

fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);
    if origins.iter().any(|o| o == "*") {
        layer.allow_origin(tower_http::cors::Any)
    } else {
        let parsed: Vec<_> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(parsed))
    }
}

/// `/healthz`, `/readyz`, and `/metrics` (SPEC_FULL §B): none are
/// tenant-scoped, so they sit outside [`corpora_api::router`]'s auth
/// middleware entirely.
fn operational_routes(state: Arc<AppState>) -> axum::Router {
    use axum::routing::get;
    axum::Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route(
            "/readyz",
            get(|axum::extract::State(state): axum::extract::State<Arc<AppState>>| async move {
                match state.tenants.find_by_api_key("__readyz_probe__").await {
                    Ok(_) => (axum::http::StatusCode::OK, "ready"),
                    Err(_) => (
                        axum::http::StatusCode::SERVICE_UNAVAILABLE,
                        "catalog unreachable",
                    ),
                }
            }),
        )
        .route(
            "/metrics",
            get(|axum::extract::State(state): axum::extract::State<Arc<AppState>>| async move {
                let active_workers = state.orchestrator.in_flight_jobs();
                axum::Json(state.metrics.snapshot(active_workers))
            }),
        )
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
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
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

/// Tracing to stderr, `RUST_LOG`-driven (spec §9 "structured logs, never
/// including secret material").
fn setup_tracing() {
    use std::io;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_target(false)
        .json()
        .init();
}
