use std::time::Duration;

use grpc_client::GrpcError;
use thiserror::Error;
use tonic::Code;

#[derive(Debug, Error)]
pub enum VectorError {
    /// The engine answered with a protocol status (includes connectivity
    /// failures reported by the transport, e.g. `Unavailable`)
    #[error("Vector engine error ({}): {}", .0.code(), .0.message())]
    Engine(#[from] tonic::Status),

    /// Failure that is not a protocol status
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Engine rejected {operation} on collection '{collection}'")]
    Rejected {
        operation: &'static str,
        collection: String,
    },

    #[error("Unexpected payload for field '{field}': expected string, found {found}")]
    Payload { field: String, found: String },

    #[error("Client connection is closed")]
    Closed,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),
}

pub type VectorResult<T> = Result<T, VectorError>;

impl VectorError {
    /// The protocol status code, when the failure came from the engine
    pub fn code(&self) -> Option<Code> {
        match self {
            VectorError::Engine(status) => Some(status.code()),
            _ => None,
        }
    }

    /// Whether the engine reported the addressed resource as missing
    ///
    /// Only a protocol status can say "not found"; every other failure
    /// (closed client, cancellation, transport construction) is not a
    /// statement about the resource and returns `false`.
    pub fn is_not_found(&self) -> bool {
        self.code() == Some(Code::NotFound)
    }
}

/// Translate a "not found" engine status into `Ok(None)`
///
/// This is the single place where a failed call becomes a negative answer.
/// Existence checks use it so both of them classify failures identically.
pub trait NotFoundExt<T> {
    fn found(self) -> VectorResult<Option<T>>;
}

impl<T> NotFoundExt<T> for VectorResult<T> {
    fn found(self) -> VectorResult<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

impl From<GrpcError> for VectorError {
    fn from(err: GrpcError) -> Self {
        match err {
            GrpcError::InvalidConfig(msg) => VectorError::Config(msg),
            other => VectorError::Transport(other.to_string()),
        }
    }
}
