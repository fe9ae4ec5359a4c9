//! # gRPC Client Library
//!
//! Transport plumbing shared by the gRPC clients in this workspace: channel
//! tuning, lazy channel creation and request interceptors.
//!
//! A channel created here is *lazy*: no connection is attempted until the
//! first RPC. Only problems that can be detected without touching the network
//! (an empty or malformed address, an API key that is not a valid header
//! value) fail at construction time.
//!
//! ## Quick Start
//!
//! ```ignore
//! use grpc_client::{create_channel_lazy, ApiKeyInterceptor};
//! use qdrant_client::qdrant::collections_client::CollectionsClient;
//!
//! let channel = create_channel_lazy("localhost:6334")?;
//! let client = CollectionsClient::with_interceptor(channel, ApiKeyInterceptor::none());
//! ```
//!
//! ### With Custom Configuration
//! ```ignore
//! use grpc_client::{create_channel_lazy_with_config, ChannelConfig};
//! use std::time::Duration;
//!
//! let config = ChannelConfig::default()
//!     .with_connect_timeout(Duration::from_secs(2))
//!     .with_request_timeout(Duration::from_secs(10));
//!
//! let channel = create_channel_lazy_with_config("http://qdrant:6334", config)?;
//! ```

pub mod channel;
pub mod error;
pub mod interceptors;

pub use channel::{
  ChannelConfig, KeepAlive, create_channel_lazy, create_channel_lazy_with_config,
  normalize_address,
};
pub use error::{GrpcError, GrpcResult};
pub use interceptors::{ApiKeyInterceptor, AuthenticatedChannel};
