//! In-memory engine for exercising the client end to end without a server

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use qdrant_client::qdrant::{
    CollectionDescription, CollectionOperationResponse, CreateCollection, Distance,
    GetCollectionInfoRequest, GetCollectionInfoResponse, GetPoints, GetResponse,
    ListCollectionsRequest, ListCollectionsResponse, PointId, PointStruct,
    PointsOperationResponse, RetrievedPoint, ScoredPoint, SearchPoints, SearchResponse,
    UpsertPoints, Value as QdrantValue, vector, vectors, vectors_config, with_payload_selector,
};
use tonic::Status;

use crate::conversions::point_id_to_u64;
use crate::engine::VectorEngine;
use crate::error::VectorResult;
use crate::models::DistanceMetric;

/// How the fake reports a point that does not exist
#[derive(Debug, Clone, Copy)]
pub enum MissingPoints {
    /// Successful reply without the point
    Omit,
    /// `NotFound` status
    NotFound,
}

struct StoredPoint {
    vector: Vec<f32>,
    payload: HashMap<String, QdrantValue>,
}

struct FakeCollection {
    dimension: u64,
    distance: DistanceMetric,
    points: BTreeMap<u64, StoredPoint>,
}

pub struct FakeEngine {
    collections: Mutex<BTreeMap<String, FakeCollection>>,
    missing_points: MissingPoints,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::with_missing_points(MissingPoints::Omit)
    }

    pub fn with_missing_points(missing_points: MissingPoints) -> Self {
        Self {
            collections: Mutex::new(BTreeMap::new()),
            missing_points,
        }
    }

    fn with_collection<T>(
        &self,
        name: &str,
        f: impl FnOnce(&mut FakeCollection) -> Result<T, Status>,
    ) -> VectorResult<T> {
        let mut collections = self.collections.lock().unwrap();
        let collection = collections
            .get_mut(name)
            .ok_or_else(|| Status::not_found(format!("Collection `{}` doesn't exist!", name)))?;
        Ok(f(collection)?)
    }
}

fn distance_from_qdrant(distance: i32) -> DistanceMetric {
    match Distance::try_from(distance) {
        Ok(Distance::Euclid) => DistanceMetric::Euclidean,
        Ok(Distance::Dot) => DistanceMetric::Dot,
        Ok(Distance::Manhattan) => DistanceMetric::Manhattan,
        _ => DistanceMetric::Cosine,
    }
}

fn missing_id() -> Status {
    Status::invalid_argument("only numeric point ids are supported")
}

#[allow(deprecated)]
fn dense_vector(point: &PointStruct) -> Result<Vec<f32>, Status> {
    match point
        .vectors
        .as_ref()
        .and_then(|v| v.vectors_options.as_ref())
    {
        Some(vectors::VectorsOptions::Vector(v)) => match &v.vector {
            Some(vector::Vector::Dense(dense)) => Ok(dense.data.clone()),
            // Legacy senders only fill the flat field
            _ => Ok(v.data.clone()),
        },
        _ => Err(Status::invalid_argument("expected a single dense vector")),
    }
}

fn check_dimension(collection: &FakeCollection, len: usize) -> Result<(), Status> {
    if len as u64 != collection.dimension {
        return Err(Status::invalid_argument(format!(
            "Wrong input: Vector dimension error: expected dim: {}, got {}",
            collection.dimension, len
        )));
    }
    Ok(())
}

/// Score where larger is always better, plus the score the engine reports
fn score(distance: DistanceMetric, a: &[f32], b: &[f32]) -> (f32, f32) {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    match distance {
        DistanceMetric::Cosine => {
            let norm = |v: &[f32]| v.iter().map(|x| x * x).sum::<f32>().sqrt();
            let denom = norm(a) * norm(b);
            let cosine = if denom == 0.0 { 0.0 } else { dot / denom };
            (cosine, cosine)
        }
        DistanceMetric::Dot => (dot, dot),
        DistanceMetric::Euclidean => {
            let d = a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f32>()
                .sqrt();
            (-d, d)
        }
        DistanceMetric::Manhattan => {
            let d: f32 = a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum();
            (-d, d)
        }
    }
}

#[async_trait]
impl VectorEngine for FakeEngine {
    async fn list_collections(
        &self,
        _request: ListCollectionsRequest,
    ) -> VectorResult<ListCollectionsResponse> {
        let collections = self.collections.lock().unwrap();
        Ok(ListCollectionsResponse {
            collections: collections
                .keys()
                .map(|name| CollectionDescription {
                    name: name.clone(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        })
    }

    async fn collection_info(
        &self,
        request: GetCollectionInfoRequest,
    ) -> VectorResult<GetCollectionInfoResponse> {
        self.with_collection(&request.collection_name, |_| {
            Ok(GetCollectionInfoResponse::default())
        })
    }

    async fn create_collection(
        &self,
        request: CreateCollection,
    ) -> VectorResult<CollectionOperationResponse> {
        let params = match request.vectors_config.and_then(|c| c.config) {
            Some(vectors_config::Config::Params(params)) => params,
            _ => return Err(Status::invalid_argument("missing vector params").into()),
        };

        let mut collections = self.collections.lock().unwrap();
        if collections.contains_key(&request.collection_name) {
            return Err(Status::already_exists(format!(
                "Collection `{}` already exists!",
                request.collection_name
            ))
            .into());
        }

        collections.insert(
            request.collection_name,
            FakeCollection {
                dimension: params.size,
                distance: distance_from_qdrant(params.distance),
                points: BTreeMap::new(),
            },
        );

        Ok(CollectionOperationResponse {
            result: true,
            ..Default::default()
        })
    }

    async fn get_points(&self, request: GetPoints) -> VectorResult<GetResponse> {
        let missing_points = self.missing_points;
        self.with_collection(&request.collection_name, |collection| {
            let mut result = Vec::new();
            for id in &request.ids {
                let num = point_id_to_u64(Some(id)).ok_or_else(missing_id)?;
                if collection.points.contains_key(&num) {
                    result.push(RetrievedPoint {
                        id: Some(PointId::from(num)),
                        ..Default::default()
                    });
                } else if let MissingPoints::NotFound = missing_points {
                    return Err(Status::not_found(format!("No point with id {} found", num)));
                }
            }

            Ok(GetResponse {
                result,
                ..Default::default()
            })
        })
    }

    async fn upsert_points(&self, request: UpsertPoints) -> VectorResult<PointsOperationResponse> {
        self.with_collection(&request.collection_name, |collection| {
            let mut staged = Vec::with_capacity(request.points.len());
            for point in &request.points {
                let id = point_id_to_u64(point.id.as_ref()).ok_or_else(missing_id)?;
                let vector = dense_vector(point)?;
                check_dimension(collection, vector.len())?;
                staged.push((id, vector, point.payload.clone()));
            }

            // All or nothing
            for (id, vector, payload) in staged {
                collection.points.insert(id, StoredPoint { vector, payload });
            }

            Ok(PointsOperationResponse::default())
        })
    }

    async fn search_points(&self, request: SearchPoints) -> VectorResult<SearchResponse> {
        let with_payload = matches!(
            request
                .with_payload
                .as_ref()
                .and_then(|s| s.selector_options.as_ref()),
            Some(with_payload_selector::SelectorOptions::Enable(true))
        );

        self.with_collection(&request.collection_name, |collection| {
            check_dimension(collection, request.vector.len())?;

            let mut scored: Vec<(f32, f32, u64)> = collection
                .points
                .iter()
                .map(|(id, point)| {
                    let (rank, reported) = score(collection.distance, &request.vector, &point.vector);
                    (rank, reported, *id)
                })
                .collect();
            scored.sort_by(|a, b| b.0.total_cmp(&a.0));
            scored.truncate(request.limit as usize);

            let result = scored
                .into_iter()
                .map(|(_, reported, id)| ScoredPoint {
                    id: Some(PointId::from(id)),
                    payload: if with_payload {
                        collection.points[&id].payload.clone()
                    } else {
                        HashMap::new()
                    },
                    score: reported,
                    ..Default::default()
                })
                .collect();

            Ok(SearchResponse {
                result,
                ..Default::default()
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VectorStoreClient;
    use crate::context::RequestContext;
    use crate::error::VectorError;

    fn ctx() -> RequestContext {
        RequestContext::background()
    }

    #[tokio::test]
    async fn test_docs_scenario() {
        let client = VectorStoreClient::new(FakeEngine::new());

        client.create_collection(&ctx(), "docs", 3).await.unwrap();
        client
            .upsert_columnar(
                &ctx(),
                "docs",
                vec![1],
                vec![vec![0.1, 0.2, 0.3]],
                vec!["{\"title\":\"a\"}".to_string()],
            )
            .await
            .unwrap();

        assert!(client.point_exists(&ctx(), "docs", 1).await.unwrap());
        assert_eq!(
            client
                .search(&ctx(), "docs", vec![0.1, 0.2, 0.3], 1)
                .await
                .unwrap(),
            vec!["{\"title\":\"a\"}".to_string()]
        );
    }

    #[tokio::test]
    async fn test_missing_collection_on_empty_engine() {
        let client = VectorStoreClient::new(FakeEngine::new());
        assert!(!client.collection_exists(&ctx(), "missing").await.unwrap());
        assert!(client.list_collections(&ctx()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_created_collection_exists_and_is_listed() {
        let client = VectorStoreClient::new(FakeEngine::new());
        client.create_collection(&ctx(), "b", 2).await.unwrap();
        client.create_collection(&ctx(), "a", 2).await.unwrap();

        assert!(client.collection_exists(&ctx(), "a").await.unwrap());
        assert_eq!(client.list_collections(&ctx()).await.unwrap(), vec!["a", "b"]);

        let err = client.create_collection(&ctx(), "a", 2).await.unwrap_err();
        assert_eq!(err.code(), Some(tonic::Code::AlreadyExists));
    }

    #[tokio::test]
    async fn test_missing_point_is_false_for_both_signals() {
        for missing in [MissingPoints::Omit, MissingPoints::NotFound] {
            let client = VectorStoreClient::new(FakeEngine::with_missing_points(missing));
            client.create_collection(&ctx(), "docs", 2).await.unwrap();
            client
                .upsert_columnar(&ctx(), "docs", vec![1], vec![vec![1.0, 0.0]], vec!["x".into()])
                .await
                .unwrap();

            assert!(client.point_exists(&ctx(), "docs", 1).await.unwrap());
            assert!(!client.point_exists(&ctx(), "docs", 2).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_point_in_missing_collection_is_false() {
        let client = VectorStoreClient::new(FakeEngine::new());
        assert!(!client.point_exists(&ctx(), "nowhere", 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_nearest_point_ranks_first() {
        let client = VectorStoreClient::new(FakeEngine::new());
        client.create_collection(&ctx(), "docs", 2).await.unwrap();
        client
            .upsert_columnar(
                &ctx(),
                "docs",
                vec![1, 2, 3],
                vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.7, 0.7]],
                vec!["east".into(), "north".into(), "diagonal".into()],
            )
            .await
            .unwrap();

        let results = client.search(&ctx(), "docs", vec![0.0, 1.0], 2).await.unwrap();
        assert_eq!(results, vec!["north", "diagonal"]);

        let scored = client
            .search_scored(&ctx(), "docs", vec![0.0, 1.0], 1)
            .await
            .unwrap();
        assert_eq!(scored[0].id, Some(2));
        assert!((scored[0].score - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_euclidean_collection_ranks_by_distance() {
        let client = VectorStoreClient::new(FakeEngine::new())
            .with_distance(DistanceMetric::Euclidean);
        client.create_collection(&ctx(), "geo", 1).await.unwrap();
        client
            .upsert_columnar(
                &ctx(),
                "geo",
                vec![1, 2],
                vec![vec![10.0], vec![2.0]],
                vec!["far".into(), "near".into()],
            )
            .await
            .unwrap();

        let results = client.search(&ctx(), "geo", vec![0.0], 2).await.unwrap();
        assert_eq!(results, vec!["near", "far"]);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_existing_point() {
        let client = VectorStoreClient::new(FakeEngine::new());
        client.create_collection(&ctx(), "docs", 1).await.unwrap();
        client
            .upsert_columnar(&ctx(), "docs", vec![1], vec![vec![1.0]], vec!["old".into()])
            .await
            .unwrap();
        client
            .upsert_columnar(&ctx(), "docs", vec![1], vec![vec![1.0]], vec!["new".into()])
            .await
            .unwrap();

        let results = client.search(&ctx(), "docs", vec![1.0], 10).await.unwrap();
        assert_eq!(results, vec!["new"]);
    }

    #[tokio::test]
    async fn test_wrong_dimension_is_engine_error() {
        let client = VectorStoreClient::new(FakeEngine::new());
        client.create_collection(&ctx(), "docs", 3).await.unwrap();

        let err = client
            .upsert_columnar(&ctx(), "docs", vec![1], vec![vec![1.0, 2.0]], vec!["m".into()])
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(tonic::Code::InvalidArgument));
        assert!(!client.point_exists(&ctx(), "docs", 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_upsert_into_missing_collection_is_not_translated() {
        let client = VectorStoreClient::new(FakeEngine::new());
        let err = client
            .upsert_columnar(&ctx(), "missing", vec![1], vec![vec![1.0]], vec!["m".into()])
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, VectorError::Engine(_)));
    }
}
