use thiserror::Error;

pub type GrpcResult<T> = Result<T, GrpcError>;

/// Errors that can occur while building a gRPC channel or its interceptors
///
/// Connection failures are not represented here: channels connect lazily, so
/// reachability problems surface as a `tonic::Status` on the first RPC.
#[derive(Error, Debug)]
pub enum GrpcError {
  /// The address could not be parsed into an endpoint URI
  #[error("Invalid URI: {0}")]
  InvalidUri(#[from] tonic::transport::Error),

  /// Invalid configuration
  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),
}
