use corpora_core::CoreError;

pub fn map_s3_error<E: std::fmt::Display>(context: &str, err: E) -> CoreError {
    CoreError::ServiceUnavailable {
        message: format!("blob store {context}: {err}"),
    }
}
