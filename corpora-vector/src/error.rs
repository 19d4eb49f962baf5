use corpora_core::CoreError;

pub fn map_pg_error(err: tokio_postgres::Error) -> CoreError {
    CoreError::ServiceUnavailable {
        message: format!("vector store error: {err}"),
    }
}

pub fn map_pool_error(err: deadpool_postgres::PoolError) -> CoreError {
    CoreError::ServiceUnavailable {
        message: format!("vector pool exhausted or unhealthy: {err}"),
    }
}
