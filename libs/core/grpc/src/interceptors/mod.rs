pub mod auth;

pub use auth::ApiKeyInterceptor;

use tonic::service::interceptor::InterceptedService;
use tonic::transport::Channel;

/// A channel whose every request passes through an [`ApiKeyInterceptor`]
pub type AuthenticatedChannel = InterceptedService<Channel, ApiKeyInterceptor>;
