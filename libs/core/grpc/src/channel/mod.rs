pub mod config;

pub use config::{ChannelConfig, KeepAlive};

use crate::error::{GrpcError, GrpcResult};
use tonic::transport::{Channel, Endpoint};

/// Prefix a bare `host:port` address with the `http://` scheme
///
/// gRPC addresses are commonly written without a scheme (`localhost:6334`),
/// while tonic endpoints need a full URI. Addresses that already carry a
/// scheme are returned trimmed but otherwise untouched.
pub fn normalize_address(addr: &str) -> String {
  let addr = addr.trim();
  if addr.contains("://") {
    addr.to_string()
  } else {
    format!("http://{addr}")
  }
}

/// Creates a lazy gRPC channel that connects on first request
///
/// The call returns immediately without touching the network. The actual
/// connection is made when the first RPC is invoked, so an unreachable server
/// surfaces as a `tonic::Status` on that RPC. A malformed address fails here.
///
/// Must be called from within a Tokio runtime: the channel's request buffer
/// is driven by a task spawned on the current runtime.
///
/// ## Example
/// ```ignore
/// use grpc_client::create_channel_lazy;
/// use qdrant_client::qdrant::points_client::PointsClient;
///
/// // Returns immediately, no connection attempt yet
/// let channel = create_channel_lazy("localhost:6334")?;
/// let client = PointsClient::new(channel);
/// ```
pub fn create_channel_lazy(addr: impl AsRef<str>) -> GrpcResult<Channel> {
  create_channel_lazy_with_config(addr, ChannelConfig::default())
}

/// Creates a lazy gRPC channel with custom configuration
pub fn create_channel_lazy_with_config(
  addr: impl AsRef<str>,
  config: ChannelConfig,
) -> GrpcResult<Channel> {
  let raw = addr.as_ref();
  if raw.trim().is_empty() {
    tracing::error!(target: "grpc_client", "Empty gRPC address");
    return Err(GrpcError::InvalidConfig(
      "address must not be empty".to_string(),
    ));
  }

  let addr_string = normalize_address(raw);

  let endpoint = Endpoint::from_shared(addr_string.clone()).map_err(|e| {
    tracing::error!(target: "grpc_client", addr = %addr_string, error = ?e, "Invalid URI");
    GrpcError::InvalidUri(e)
  })?;

  let endpoint = config.apply_to_endpoint(endpoint);

  tracing::debug!(
    target: "grpc_client",
    addr = %addr_string,
    "Creating lazy gRPC channel (connects on first request)"
  );

  Ok(endpoint.connect_lazy())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_normalize_bare_address() {
    assert_eq!(normalize_address("localhost:6334"), "http://localhost:6334");
    assert_eq!(normalize_address("  10.0.0.1:6334 "), "http://10.0.0.1:6334");
  }

  #[test]
  fn test_normalize_keeps_scheme() {
    assert_eq!(normalize_address("http://qdrant:6334"), "http://qdrant:6334");
    assert_eq!(normalize_address("https://qdrant:6334"), "https://qdrant:6334");
  }

  #[tokio::test]
  async fn test_invalid_uri() {
    let result = create_channel_lazy("not a valid uri");
    assert!(matches!(result, Err(GrpcError::InvalidUri(_))));
  }

  #[tokio::test]
  async fn test_empty_address() {
    let result = create_channel_lazy("   ");
    assert!(matches!(result, Err(GrpcError::InvalidConfig(_))));
  }

  #[tokio::test]
  async fn test_lazy_channel_does_not_connect() {
    // Nothing listens on this port; a lazy channel must still be created
    let result = create_channel_lazy("127.0.0.1:1");
    assert!(result.is_ok());
  }
}
