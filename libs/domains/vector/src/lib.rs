//! Vector Domain Library
//!
//! A small client for storing embeddings with a metadata string and finding
//! the nearest ones, backed by a Qdrant-compatible engine over gRPC.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐
//! │ VectorStoreClient │  ← validation, not-found translation, payload policy
//! └─────────┬─────────┘
//!           │
//! ┌─────────▼─────────┐
//! │   VectorEngine    │  ← engine protocol (mocked / faked in tests)
//! │     (trait)       │
//! └─────────┬─────────┘
//!           │
//! ┌─────────▼─────────┐
//! │   QdrantEngine    │  ← Collections + Points gRPC clients on one channel
//! └───────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_vector::{QdrantConfig, RequestContext, connect};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (client, handle) = connect(QdrantConfig::from_env()?)?;
//! let ctx = RequestContext::background();
//!
//! if !client.collection_exists(&ctx, "docs").await? {
//!     client.create_collection(&ctx, "docs", 3).await?;
//! }
//!
//! client
//!     .upsert_columnar(
//!         &ctx,
//!         "docs",
//!         vec![1],
//!         vec![vec![0.1, 0.2, 0.3]],
//!         vec![r#"{"title":"a"}"#.to_string()],
//!     )
//!     .await?;
//!
//! let hits = client.search(&ctx, "docs", vec![0.1, 0.2, 0.3], 1).await?;
//! assert_eq!(hits, vec![r#"{"title":"a"}"#.to_string()]);
//!
//! handle.close();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod context;
pub mod conversions;
pub mod engine;
pub mod error;
pub mod models;
pub mod qdrant;

#[cfg(test)]
mod fake;

// Re-export commonly used types
pub use client::VectorStoreClient;
pub use context::RequestContext;
pub use engine::VectorEngine;
pub use error::{NotFoundExt, VectorError, VectorResult};
pub use models::{
    ColumnarBatch, DistanceMetric, METADATA_FIELD, PayloadPolicy, ScoredMetadata, VectorParams,
    WriteMode,
};
pub use qdrant::{CloseHandle, QdrantConfig, QdrantEngine};

/// Connect a client to the engine described by `config`
///
/// The connection is established lazily, on the first operation. Only a
/// malformed address or an unusable API key fail here. Must be called from
/// within a Tokio runtime.
pub fn connect(config: QdrantConfig) -> VectorResult<(VectorStoreClient<QdrantEngine>, CloseHandle)> {
    let (engine, handle) = QdrantEngine::connect(&config)?;
    Ok((VectorStoreClient::with_config(engine, &config), handle))
}
