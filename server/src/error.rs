use thiserror::Error;

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

/// Failures surfaced by the engine. Delivery problems are logged and skipped
/// rather than propagated to peers; nothing here tears a session down.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("connection closed")]
    ConnectionClosed,

    #[error("transport send failed: {0}")]
    Transport(String),

    #[error("message encoding failed: {0}")]
    Encode(#[from] postcard::Error),
}
