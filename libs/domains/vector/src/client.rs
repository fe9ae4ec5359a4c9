use std::fmt;
use std::sync::Arc;

use qdrant_client::qdrant::{ListCollectionsRequest, ScoredPoint};
use tracing::{debug, instrument};

use crate::context::RequestContext;
use crate::conversions::{
    collection_info_request, create_collection_request, extract_metadata, point_id_to_u64,
    point_lookup_request, search_request, upsert_request,
};
use crate::engine::VectorEngine;
use crate::error::{NotFoundExt, VectorError, VectorResult};
use crate::models::{
    ColumnarBatch, DistanceMetric, PayloadPolicy, ScoredMetadata, VectorParams, WriteMode,
};
use crate::qdrant::QdrantConfig;

/// Collection management, ingestion and search over a [`VectorEngine`]
///
/// The client keeps no state about collections or points; every call is one
/// request/response exchange with the engine. Clones share the engine.
pub struct VectorStoreClient<E: VectorEngine> {
    engine: Arc<E>,
    distance: DistanceMetric,
    write_mode: WriteMode,
    payload_policy: PayloadPolicy,
}

impl<E: VectorEngine> Clone for VectorStoreClient<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            distance: self.distance,
            write_mode: self.write_mode,
            payload_policy: self.payload_policy,
        }
    }
}

impl<E: VectorEngine> fmt::Debug for VectorStoreClient<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorStoreClient")
            .field("distance", &self.distance)
            .field("write_mode", &self.write_mode)
            .field("payload_policy", &self.payload_policy)
            .finish_non_exhaustive()
    }
}

impl<E: VectorEngine> VectorStoreClient<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine: Arc::new(engine),
            distance: DistanceMetric::default(),
            write_mode: WriteMode::default(),
            payload_policy: PayloadPolicy::default(),
        }
    }

    /// Client with the distance, write mode and payload policy of `config`
    pub fn with_config(engine: E, config: &QdrantConfig) -> Self {
        Self::new(engine)
            .with_distance(config.distance)
            .with_write_mode(config.write_mode)
            .with_payload_policy(config.payload_policy)
    }

    pub fn with_distance(mut self, distance: DistanceMetric) -> Self {
        self.distance = distance;
        self
    }

    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    pub fn with_payload_policy(mut self, policy: PayloadPolicy) -> Self {
        self.payload_policy = policy;
        self
    }

    /// Names of all collections, in the engine's order
    #[instrument(skip(self, ctx))]
    pub async fn list_collections(&self, ctx: &RequestContext) -> VectorResult<Vec<String>> {
        let response = ctx
            .run(|| {
                self.engine
                    .list_collections(ListCollectionsRequest::default())
            })
            .await?;

        let names: Vec<String> = response
            .collections
            .into_iter()
            .map(|description| description.name)
            .collect();

        debug!(count = names.len(), "Listed collections");
        Ok(names)
    }

    /// Whether a collection exists
    ///
    /// A "not found" status from the engine is the answer `false`. Any other
    /// failure is returned as an error.
    #[instrument(skip(self, ctx))]
    pub async fn collection_exists(&self, ctx: &RequestContext, name: &str) -> VectorResult<bool> {
        let info = ctx
            .run(|| self.engine.collection_info(collection_info_request(name)))
            .await
            .found()?;

        Ok(info.is_some())
    }

    /// Create a collection with the client's distance metric
    ///
    /// Not idempotent: creating an existing collection returns the engine's
    /// error.
    pub async fn create_collection(
        &self,
        ctx: &RequestContext,
        name: &str,
        dimension: u64,
    ) -> VectorResult<()> {
        let params = VectorParams::new(dimension).with_distance(self.distance);
        self.create_collection_with(ctx, name, params).await
    }

    #[instrument(skip(self, ctx), fields(dimension = params.dimension, distance = %params.distance))]
    pub async fn create_collection_with(
        &self,
        ctx: &RequestContext,
        name: &str,
        params: VectorParams,
    ) -> VectorResult<()> {
        if params.dimension == 0 {
            return Err(VectorError::Validation(
                "collection dimension must be positive".to_string(),
            ));
        }

        let response = ctx
            .run(|| {
                self.engine
                    .create_collection(create_collection_request(name, params))
            })
            .await?;

        if !response.result {
            return Err(VectorError::Rejected {
                operation: "create_collection",
                collection: name.to_string(),
            });
        }

        debug!("Created collection");
        Ok(())
    }

    /// Whether a point exists in a collection
    ///
    /// Both ways an engine can say "absent" (a "not found" status, or a
    /// successful reply with no points) are the answer `false`.
    #[instrument(skip(self, ctx))]
    pub async fn point_exists(
        &self,
        ctx: &RequestContext,
        collection: &str,
        id: u64,
    ) -> VectorResult<bool> {
        let response = ctx
            .run(|| self.engine.get_points(point_lookup_request(collection, id)))
            .await
            .found()?;

        Ok(response.is_some_and(|response| !response.result.is_empty()))
    }

    /// Insert or overwrite points given as parallel arrays
    ///
    /// Position `i` of each array describes one point. Arrays of different
    /// lengths are rejected before anything is sent.
    pub async fn upsert_columnar(
        &self,
        ctx: &RequestContext,
        collection: &str,
        ids: Vec<u64>,
        embeddings: Vec<Vec<f32>>,
        metadata: Vec<String>,
    ) -> VectorResult<()> {
        let batch = ColumnarBatch::new(ids, embeddings, metadata)?;
        self.upsert_batch(ctx, collection, batch).await
    }

    /// Insert or overwrite a batch of points in one request
    ///
    /// With [`WriteMode::Async`] this returns once the engine has accepted the
    /// request, before the write is applied. An empty batch sends nothing.
    #[instrument(skip(self, ctx, batch), fields(points = batch.len(), wait = self.write_mode.wait()))]
    pub async fn upsert_batch(
        &self,
        ctx: &RequestContext,
        collection: &str,
        batch: ColumnarBatch,
    ) -> VectorResult<()> {
        if batch.is_empty() {
            debug!("Empty batch, nothing to upsert");
            return Ok(());
        }

        let points = batch.len();
        let request = upsert_request(collection, batch, self.write_mode);
        ctx.run(|| self.engine.upsert_points(request)).await?;

        debug!(points, "Upserted points");
        Ok(())
    }

    /// Metadata of the `limit` nearest points, most similar first
    pub async fn search(
        &self,
        ctx: &RequestContext,
        collection: &str,
        query_vector: Vec<f32>,
        limit: u64,
    ) -> VectorResult<Vec<String>> {
        let hits = self.search_hits(ctx, collection, query_vector, limit).await?;

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            if let Some(metadata) = extract_metadata(&hit.payload, self.payload_policy)? {
                results.push(metadata);
            }
        }
        Ok(results)
    }

    /// Like [`search`](Self::search), keeping each hit's id and score
    pub async fn search_scored(
        &self,
        ctx: &RequestContext,
        collection: &str,
        query_vector: Vec<f32>,
        limit: u64,
    ) -> VectorResult<Vec<ScoredMetadata>> {
        let hits = self.search_hits(ctx, collection, query_vector, limit).await?;

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            if let Some(metadata) = extract_metadata(&hit.payload, self.payload_policy)? {
                results.push(ScoredMetadata {
                    id: point_id_to_u64(hit.id.as_ref()),
                    score: hit.score,
                    metadata,
                });
            }
        }
        Ok(results)
    }

    #[instrument(skip(self, ctx, query_vector), fields(dimension = query_vector.len()))]
    async fn search_hits(
        &self,
        ctx: &RequestContext,
        collection: &str,
        query_vector: Vec<f32>,
        limit: u64,
    ) -> VectorResult<Vec<ScoredPoint>> {
        if limit == 0 {
            return Err(VectorError::Validation(
                "search limit must be positive".to_string(),
            ));
        }
        if query_vector.is_empty() {
            return Err(VectorError::Validation(
                "query vector must not be empty".to_string(),
            ));
        }

        let request = search_request(collection, query_vector, limit);
        let response = ctx.run(|| self.engine.search_points(request)).await?;

        debug!(hits = response.result.len(), "Search completed");
        Ok(response.result)
    }
}
