use tonic::metadata::{Ascii, MetadataValue};
use tonic::{Request, Status};

use crate::error::{GrpcError, GrpcResult};

/// Metadata key used by Qdrant-compatible engines for API key authentication
pub const API_KEY_HEADER: &str = "api-key";

/// Interceptor that attaches an API key to every outgoing request
///
/// The key is validated once at construction, so a key that cannot be sent as
/// an HTTP/2 header fails client creation instead of every RPC. An interceptor
/// built with [`ApiKeyInterceptor::none`] passes requests through unchanged.
///
/// # Example
/// ```ignore
/// use grpc_client::{create_channel_lazy, ApiKeyInterceptor};
/// use qdrant_client::qdrant::points_client::PointsClient;
///
/// let auth = ApiKeyInterceptor::api_key("secret")?;
/// let channel = create_channel_lazy("localhost:6334")?;
/// let client = PointsClient::with_interceptor(channel, auth);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ApiKeyInterceptor {
  value: Option<MetadataValue<Ascii>>,
}

impl ApiKeyInterceptor {
  /// An interceptor that adds nothing
  pub fn none() -> Self {
    Self::default()
  }

  /// Create an interceptor that sends `key` in the `api-key` header
  pub fn api_key(key: impl AsRef<str>) -> GrpcResult<Self> {
    let value = key
      .as_ref()
      .parse::<MetadataValue<Ascii>>()
      .map_err(|_| GrpcError::InvalidConfig("API key is not a valid header value".to_string()))?;

    Ok(Self { value: Some(value) })
  }

  /// Build from an optional key, as read from configuration
  pub fn from_optional(key: Option<&str>) -> GrpcResult<Self> {
    match key {
      Some(key) => Self::api_key(key),
      None => Ok(Self::none()),
    }
  }

  pub fn is_enabled(&self) -> bool {
    self.value.is_some()
  }
}

impl tonic::service::Interceptor for ApiKeyInterceptor {
  fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
    if let Some(value) = &self.value {
      request.metadata_mut().insert(API_KEY_HEADER, value.clone());
    }
    Ok(request)
  }
}
