use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use grpc_client::{ApiKeyInterceptor, AuthenticatedChannel, create_channel_lazy_with_config};
use qdrant_client::qdrant::collections_client::CollectionsClient;
use qdrant_client::qdrant::points_client::PointsClient;
use qdrant_client::qdrant::{
    CollectionOperationResponse, CreateCollection, GetCollectionInfoRequest,
    GetCollectionInfoResponse, GetPoints, GetResponse, ListCollectionsRequest,
    ListCollectionsResponse, PointsOperationResponse, SearchPoints, SearchResponse, UpsertPoints,
};
use tracing::debug;

use super::QdrantConfig;
use crate::engine::VectorEngine;
use crate::error::{VectorError, VectorResult};

/// The two protocol sub-clients, bound to one channel
struct Connection {
    collections: CollectionsClient<AuthenticatedChannel>,
    points: PointsClient<AuthenticatedChannel>,
}

type ConnectionSlot = Arc<ArcSwapOption<Connection>>;

/// [`VectorEngine`] over Qdrant's `Collections` and `Points` gRPC services
///
/// Both services share one lazily-connected HTTP/2 channel. Nothing touches
/// the network until the first call, so an unreachable engine surfaces as an
/// `Unavailable` status from that call rather than from [`QdrantEngine::connect`].
pub struct QdrantEngine {
    slot: ConnectionSlot,
}

impl QdrantEngine {
    /// Build the engine and the handle that releases its connection
    ///
    /// Fails immediately on a malformed address or an API key that cannot be
    /// sent as a header. Must be called from within a Tokio runtime.
    pub fn connect(config: &QdrantConfig) -> VectorResult<(Self, CloseHandle)> {
        let channel = create_channel_lazy_with_config(&config.url, config.channel_config())?;
        let auth = ApiKeyInterceptor::from_optional(config.api_key.as_deref())?;

        let connection = Connection {
            collections: CollectionsClient::with_interceptor(channel.clone(), auth.clone()),
            points: PointsClient::with_interceptor(channel, auth),
        };

        debug!(
            url = %config.url,
            authenticated = config.api_key.is_some(),
            "Qdrant engine ready"
        );

        let slot: ConnectionSlot = Arc::new(ArcSwapOption::from_pointee(connection));
        let handle = CloseHandle { slot: slot.clone() };

        Ok((Self { slot }, handle))
    }

    fn connection(&self) -> VectorResult<Arc<Connection>> {
        self.slot.load_full().ok_or(VectorError::Closed)
    }

    fn collections(&self) -> VectorResult<CollectionsClient<AuthenticatedChannel>> {
        Ok(self.connection()?.collections.clone())
    }

    fn points(&self) -> VectorResult<PointsClient<AuthenticatedChannel>> {
        Ok(self.connection()?.points.clone())
    }
}

#[async_trait]
impl VectorEngine for QdrantEngine {
    async fn list_collections(
        &self,
        request: ListCollectionsRequest,
    ) -> VectorResult<ListCollectionsResponse> {
        let response = self.collections()?.list(request).await?;
        Ok(response.into_inner())
    }

    async fn collection_info(
        &self,
        request: GetCollectionInfoRequest,
    ) -> VectorResult<GetCollectionInfoResponse> {
        let response = self.collections()?.get(request).await?;
        Ok(response.into_inner())
    }

    async fn create_collection(
        &self,
        request: CreateCollection,
    ) -> VectorResult<CollectionOperationResponse> {
        let response = self.collections()?.create(request).await?;
        Ok(response.into_inner())
    }

    async fn get_points(&self, request: GetPoints) -> VectorResult<GetResponse> {
        let response = self.points()?.get(request).await?;
        Ok(response.into_inner())
    }

    async fn upsert_points(&self, request: UpsertPoints) -> VectorResult<PointsOperationResponse> {
        let response = self.points()?.upsert(request).await?;
        Ok(response.into_inner())
    }

    async fn search_points(&self, request: SearchPoints) -> VectorResult<SearchResponse> {
        let response = self.points()?.search(request).await?;
        Ok(response.into_inner())
    }
}

/// Releases the engine connection exactly once
///
/// Clones share the same connection slot. Closing drops the client's hold
/// on the channel; calls already in flight keep their own clone and finish
/// normally, later calls fail with [`VectorError::Closed`].
#[derive(Clone)]
pub struct CloseHandle {
    slot: ConnectionSlot,
}

impl CloseHandle {
    /// Returns `true` if this call released the connection, `false` if it
    /// was already closed
    pub fn close(&self) -> bool {
        let released = self.slot.swap(None).is_some();
        if released {
            debug!("Qdrant connection closed");
        }
        released
    }

    pub fn is_closed(&self) -> bool {
        self.slot.load().is_none()
    }
}

impl std::fmt::Debug for CloseHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloseHandle")
            .field("closed", &self.is_closed())
            .finish()
    }
}
