#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Remote store error: {message}")]
    Remote { message: String, retryable: bool },

    #[error("Constraint violation on {table}: {detail}")]
    Constraint { table: String, detail: String },
}

impl StoreError {
    /// Transient failures are retried with backoff; everything else is fatal.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Network(e) => {
                e.is_connect()
                    || e.is_timeout()
                    || e.status().is_some_and(|s| s.is_server_error())
            }
            StoreError::Remote { retryable, .. } => *retryable,
            _ => false,
        }
    }
}
