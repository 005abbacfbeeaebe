use thiserror::Error;

/// Failures raised by the cache tiers. The facade degrades these to a miss
/// (reads) or a skipped write; they never abort a catalog request.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
