use thiserror::Error;

/// Failures from the durable side of the store. Mutations themselves are total;
/// these only surface from storage backends and snapshot codecs.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
