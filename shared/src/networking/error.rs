use std::io::ErrorKind;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkingError {
    #[error("connection closed by peer")]
    Closed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("malformed message: {0}")]
    Malformed(String),

    #[error("wire variants are not registered, call register_variants() at startup")]
    NotRegistered,

    #[error("variant `{0}` is not registered with the codec")]
    UnregisteredVariant(String),
}

impl NetworkingError {
    /// True when the peer went away, false when the bytes themselves were bad.
    pub fn is_disconnect(&self) -> bool {
        match self {
            NetworkingError::Closed => true,
            NetworkingError::Io(e) => matches!(
                e.kind(),
                ErrorKind::UnexpectedEof
                    | ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::BrokenPipe
            ),
            _ => false,
        }
    }
}
