//! REST surface assembly (spec §6.2): tenant-facing auth, documents, profile,
//! and usage endpoints, mounted under `/api`.

pub mod auth;
pub mod documents;
pub mod profile;
pub mod usage;

use crate::middleware::jwt_auth_then_rate_limit;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::sync::Arc;

pub fn router(state: Arc<AppState>) -> Router {
    let public_auth = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/verify-email", get(auth::verify_email))
        .route("/auth/resend-verification", post(auth::resend_verification));

    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/auth/logout-all", post(auth::logout_all))
        .route("/documents/upload", post(documents::upload))
        .route("/documents/url", post(documents::ingest_url))
        .route("/documents/search", post(documents::search))
        .route("/documents/stats", get(documents::stats))
        .route("/documents", get(documents::list))
        .route("/documents/:id", get(documents::get).delete(documents::delete))
        .route("/documents/:id/status", get(documents::status))
        .route("/documents/:id/download", get(documents::download))
        .route(
            "/profile/embedder-key",
            get(profile::get_embedder_key_status)
                .put(profile::set_embedder_key)
                .delete(profile::remove_embedder_key),
        )
        .route("/usage", get(usage::summary))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_then_rate_limit,
        ));

    Router::new()
        .merge(public_auth)
        .merge(protected)
        .with_state(state)
}
