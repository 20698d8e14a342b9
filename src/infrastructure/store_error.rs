// Typed failures of the persistence adapters
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{backend} request failed with status {status}: {body}")]
    Status {
        backend: &'static str,
        status: u16,
        body: String,
    },
    #[error("malformed document {path}: {reason}")]
    Malformed { path: String, reason: String },
    #[error("I/O error on {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("store rejected the write for user {0}")]
    WriteRejected(String),
}
