use corpora_core::CoreError;

/// Translate a raw Postgres error into the shared taxonomy. Unique-violation
/// (`23505`) becomes a [`CoreError::Conflict`]; everything else that isn't
/// already typed becomes [`CoreError::ServiceUnavailable`] so the caller can
/// decide whether to retry.
pub fn map_pg_error(err: tokio_postgres::Error) -> CoreError {
    if let Some(db_err) = err.as_db_error() {
        if db_err.code() == &tokio_postgres::error::SqlState::UNIQUE_VIOLATION {
            return CoreError::Conflict {
                message: db_err.message().to_string(),
            };
        }
    }
    CoreError::ServiceUnavailable {
        message: format!("catalog error: {err}"),
    }
}

pub fn map_pool_error(err: deadpool_postgres::PoolError) -> CoreError {
    CoreError::ServiceUnavailable {
        message: format!("catalog pool exhausted or unhealthy: {err}"),
    }
}
