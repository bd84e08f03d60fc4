/// Connector-level error shared by every backend
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Driver error (bad URI, client construction)
    #[cfg(feature = "mongodb")]
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// Server did not answer the connection probe
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Health check failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
