use async_trait::async_trait;
use qdrant_client::qdrant::{
    CollectionOperationResponse, CreateCollection, GetCollectionInfoRequest,
    GetCollectionInfoResponse, GetPoints, GetResponse, ListCollectionsRequest,
    ListCollectionsResponse, PointsOperationResponse, SearchPoints, SearchResponse, UpsertPoints,
};

use crate::error::VectorResult;

/// The slice of the engine's gRPC protocol the client needs
///
/// Messages are the engine's own protobuf types, so an implementation is a
/// straight pass-through to the wire. Failures reported by the engine arrive
/// as [`VectorError::Engine`](crate::VectorError::Engine) carrying the
/// original status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorEngine: Send + Sync {
    async fn list_collections(
        &self,
        request: ListCollectionsRequest,
    ) -> VectorResult<ListCollectionsResponse>;

    /// Fails with a `NotFound` status when the collection is absent
    async fn collection_info(
        &self,
        request: GetCollectionInfoRequest,
    ) -> VectorResult<GetCollectionInfoResponse>;

    async fn create_collection(
        &self,
        request: CreateCollection,
    ) -> VectorResult<CollectionOperationResponse>;

    /// Absent points are either omitted from the result or reported with a
    /// `NotFound` status, depending on the engine
    async fn get_points(&self, request: GetPoints) -> VectorResult<GetResponse>;

    async fn upsert_points(&self, request: UpsertPoints) -> VectorResult<PointsOperationResponse>;

    async fn search_points(&self, request: SearchPoints) -> VectorResult<SearchResponse>;
}
