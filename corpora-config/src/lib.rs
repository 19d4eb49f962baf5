//! Process-wide configuration (spec §6.1, SPEC_FULL §A.3). Every other crate
//! that needs environment-derived config already exposes its own
//! `from_env()` (`CatalogConfig`, `AuthConfig`, ...); this crate is the one
//! place `corpora-server` calls at startup to load all of them plus the
//! handful of settings that don't belong to any single crate — bind
//! address, CORS origins, the platform embedder/reranker endpoints.
//!
//! Values come from the environment, with a layer of programmatic defaults
//! underneath via the [`config`] crate so a missing variable fails loudly
//! only when there truly is no sane default.

use corpora_auth::AuthConfig;
use corpora_catalog::CatalogConfig;
use corpora_core::CoreError;
use corpora_jobs::QueueOptions;
use serde::Deserialize;
use std::time::Duration;

fn map_config_err(e: config::ConfigError) -> CoreError {
    CoreError::internal(format!("config error: {e}"))
}

/// The subset of settings that don't belong to any one crate: how the
/// server binds, what it trusts, and which external embedder/reranker
/// endpoints it talks to by default.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Comma-separated in the environment; `*` means "reflect the request
    /// origin" rather than a literal wildcard header (spec §4.10 CORS note).
    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: String,
    #[serde(default = "default_embedder_base_url")]
    pub embedder_base_url: String,
    /// The platform's own embedder key, used when a tenant has not
    /// configured one of its own (spec §4.11 "fall back to the platform
    /// key if absent").
    pub platform_embedder_api_key: String,
    #[serde(default)]
    pub reranker_base_url: Option<String>,
    #[serde(default = "default_blob_bucket")]
    pub blob_bucket: String,
    /// Use the in-memory blob store instead of S3 — local dev and tests
    /// only (spec §9 open question: "local dev should not require AWS
    /// credentials").
    #[serde(default)]
    pub blob_in_memory: bool,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origins() -> String {
    "*".to_string()
}

fn default_embedder_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_blob_bucket() -> String {
    "corpora-documents".to_string()
}

impl ServerSettings {
    pub fn from_env() -> Result<Self, CoreError> {
        let settings = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .map_err(map_config_err)?;
        settings.try_deserialize().map_err(map_config_err)
    }

    /// Split `cors_allowed_origins` into distinct origins; `["*"]` is the
    /// reflect-any-origin sentinel.
    #[must_use]
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Everything the server needs to start: the catalog connection, the auth
/// token TTLs, the queue's retry/concurrency policy, the master encryption
/// key, and the process-level [`ServerSettings`] above.
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub auth: AuthConfig,
    pub queue: QueueOptions,
    pub master_key_hex: String,
    pub server: ServerSettings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, CoreError> {
        let master_key_hex = std::env::var("MASTER_ENCRYPTION_KEY").map_err(|_| {
            CoreError::internal("MASTER_ENCRYPTION_KEY must be set to a 32-byte hex string")
        })?;

        Ok(Self {
            catalog: CatalogConfig::from_env()?,
            auth: AuthConfig::from_env(),
            queue: queue_options_from_env(),
            master_key_hex,
            server: ServerSettings::from_env()?,
        })
    }
}

/// [`QueueOptions`] has no `from_env` of its own — it's constructed fresh
/// per process by [`corpora_jobs::JobQueue::new`] rather than loaded once —
/// so the env-var reads live here alongside the rest of startup config.
fn queue_options_from_env() -> QueueOptions {
    let parse_or = |key: &str, default: u64| -> u64 {
        std::env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    };
    let defaults = QueueOptions::default();
    QueueOptions {
        max_attempts: parse_or("QUEUE_MAX_ATTEMPTS", u64::from(defaults.max_attempts)) as u32,
        initial_backoff: Duration::from_secs(parse_or(
            "QUEUE_INITIAL_BACKOFF_SECS",
            defaults.initial_backoff.as_secs(),
        )),
        keep_completed: parse_or("QUEUE_KEEP_COMPLETED", defaults.keep_completed as u64) as usize,
        keep_failed: parse_or("QUEUE_KEEP_FAILED", defaults.keep_failed as u64) as usize,
        concurrency: parse_or("QUEUE_CONCURRENCY", defaults.concurrency as u64) as usize,
        rate_per_second: std::env::var("QUEUE_RATE_PER_SECOND")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.rate_per_second),
    }
}
