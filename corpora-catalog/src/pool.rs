//! Bounded connection pool with idle/acquisition timeouts (spec §4.2).

use corpora_core::CoreError;
use deadpool_postgres::{
    Config as PoolConfig, ManagerConfig, Pool, RecyclingMethod, Runtime, Timeouts,
};
use std::time::Duration;
use tokio_postgres::NoTls;

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    /// Bounded pool size, default ~20 (spec §4.2).
    pub max_size: usize,
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
}

impl CatalogConfig {
    /// Load from the `DB_*` environment variables (spec §6.1).
    pub fn from_env() -> Result<Self, CoreError> {
        let get = |key: &str, default: &str| {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };
        Ok(Self {
            host: get("DB_HOST", "localhost"),
            port: get("DB_PORT", "5432")
                .parse()
                .map_err(|_| CoreError::internal("DB_PORT must be a valid port number"))?,
            user: get("DB_USER", "corpora"),
            password: get("DB_PASSWORD", ""),
            dbname: get("DB_NAME", "corpora"),
            max_size: 20,
            idle_timeout: Duration::from_secs(300),
            acquire_timeout: Duration::from_secs(10),
        })
    }
}

pub fn build_pool(config: &CatalogConfig) -> Result<Pool, CoreError> {
    let mut pool_cfg = PoolConfig::new();
    pool_cfg.host = Some(config.host.clone());
    pool_cfg.port = Some(config.port);
    pool_cfg.user = Some(config.user.clone());
    pool_cfg.password = Some(config.password.clone());
    pool_cfg.dbname = Some(config.dbname.clone());
    pool_cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    pool_cfg.pool = Some(deadpool_postgres::PoolConfig {
        max_size: config.max_size,
        timeouts: Timeouts {
            wait: Some(config.acquire_timeout),
            create: Some(config.acquire_timeout),
            recycle: Some(config.idle_timeout),
        },
        ..Default::default()
    });

    pool_cfg
        .create_pool(Some(Runtime::Tokio1), NoTls)
        .map_err(|e| CoreError::internal(format!("failed to build catalog pool: {e}")))
}

mod embedded {
    refinery::embed_migrations!("src/migrations");
}

/// Apply all catalog migrations. Idempotent; safe to call on every startup.
pub async fn run_migrations(pool: &Pool) -> Result<(), CoreError> {
    let mut client = pool.get().await.map_err(super::error::map_pool_error)?;
    embedded::migrations::runner()
        .run_async(&mut *client)
        .await
        .map_err(|e| CoreError::internal(format!("catalog migration failed: {e}")))?;
    Ok(())
}
