use std::collections::HashMap;

use qdrant_client::qdrant::{
    CreateCollection, Distance, GetCollectionInfoRequest, GetPoints, PointId, PointStruct,
    SearchPoints, UpsertPoints, Value as QdrantValue, VectorParams as QdrantVectorParams,
    Vectors, VectorsConfig, WithPayloadSelector, WithVectorsSelector, point_id, value,
    vectors_config, with_payload_selector, with_vectors_selector,
};

use crate::error::{VectorError, VectorResult};
use crate::models::{
    ColumnarBatch, DistanceMetric, METADATA_FIELD, PayloadPolicy, VectorParams, WriteMode,
};

// ===== Distance Metric =====

pub fn distance_to_qdrant(metric: DistanceMetric) -> Distance {
    match metric {
        DistanceMetric::Cosine => Distance::Cosine,
        DistanceMetric::Euclidean => Distance::Euclid,
        DistanceMetric::Dot => Distance::Dot,
        DistanceMetric::Manhattan => Distance::Manhattan,
    }
}

// ===== Requests =====

pub fn collection_info_request(name: &str) -> GetCollectionInfoRequest {
    GetCollectionInfoRequest {
        collection_name: name.to_string(),
    }
}

pub fn create_collection_request(name: &str, params: VectorParams) -> CreateCollection {
    CreateCollection {
        collection_name: name.to_string(),
        vectors_config: Some(VectorsConfig {
            config: Some(vectors_config::Config::Params(QdrantVectorParams {
                size: params.dimension,
                distance: distance_to_qdrant(params.distance) as i32,
                ..Default::default()
            })),
        }),
        ..Default::default()
    }
}

/// Lookup of a single point that transfers neither payload nor vector
pub fn point_lookup_request(collection: &str, id: u64) -> GetPoints {
    GetPoints {
        collection_name: collection.to_string(),
        ids: vec![PointId::from(id)],
        with_payload: Some(payload_selector(false)),
        with_vectors: Some(vectors_selector(false)),
        ..Default::default()
    }
}

pub fn upsert_request(collection: &str, batch: ColumnarBatch, mode: WriteMode) -> UpsertPoints {
    UpsertPoints {
        collection_name: collection.to_string(),
        wait: Some(mode.wait()),
        points: batch_to_points(batch),
        ..Default::default()
    }
}

pub fn search_request(collection: &str, vector: Vec<f32>, limit: u64) -> SearchPoints {
    SearchPoints {
        collection_name: collection.to_string(),
        vector,
        limit,
        with_payload: Some(payload_selector(true)),
        with_vectors: Some(vectors_selector(false)),
        ..Default::default()
    }
}

fn payload_selector(enable: bool) -> WithPayloadSelector {
    WithPayloadSelector {
        selector_options: Some(with_payload_selector::SelectorOptions::Enable(enable)),
    }
}

fn vectors_selector(enable: bool) -> WithVectorsSelector {
    WithVectorsSelector {
        selector_options: Some(with_vectors_selector::SelectorOptions::Enable(enable)),
    }
}

// ===== Points =====

/// One wire record per batch row: numeric id, dense vector, `{"metadata": ..}`
pub fn batch_to_points(batch: ColumnarBatch) -> Vec<PointStruct> {
    let (ids, embeddings, metadata) = batch.into_parts();

    ids.into_iter()
        .zip(embeddings)
        .zip(metadata)
        .map(|((id, embedding), metadata)| {
            let mut payload = HashMap::with_capacity(1);
            payload.insert(METADATA_FIELD.to_string(), QdrantValue::from(metadata));

            PointStruct {
                id: Some(PointId::from(id)),
                payload,
                vectors: Some(Vectors::from(embedding)),
                ..Default::default()
            }
        })
        .collect()
}

/// Numeric id of a point; `None` for UUID-keyed points
pub fn point_id_to_u64(id: Option<&PointId>) -> Option<u64> {
    match id.and_then(|id| id.point_id_options.as_ref()) {
        Some(point_id::PointIdOptions::Num(num)) => Some(*num),
        _ => None,
    }
}

// ===== Payload =====

/// Pull the metadata string out of a search hit's payload
///
/// Returns `Ok(None)` when the hit should be dropped (only under
/// [`PayloadPolicy::Skip`]).
pub fn extract_metadata(
    payload: &HashMap<String, QdrantValue>,
    policy: PayloadPolicy,
) -> VectorResult<Option<String>> {
    let kind = payload
        .get(METADATA_FIELD)
        .and_then(|value| value.kind.as_ref());

    if let Some(value::Kind::StringValue(s)) = kind {
        return Ok(Some(s.clone()));
    }

    match policy {
        PayloadPolicy::Reject => Err(VectorError::Payload {
            field: METADATA_FIELD.to_string(),
            found: kind_name(kind).to_string(),
        }),
        PayloadPolicy::Skip => Ok(None),
        PayloadPolicy::Coerce => Ok(Some(match kind {
            None | Some(value::Kind::NullValue(_)) => String::new(),
            Some(kind) => kind_to_json(kind).to_string(),
        })),
    }
}

fn kind_name(kind: Option<&value::Kind>) -> &'static str {
    match kind {
        None => "nothing",
        Some(value::Kind::NullValue(_)) => "null",
        Some(value::Kind::BoolValue(_)) => "bool",
        Some(value::Kind::IntegerValue(_)) => "integer",
        Some(value::Kind::DoubleValue(_)) => "double",
        Some(value::Kind::StringValue(_)) => "string",
        Some(value::Kind::StructValue(_)) => "struct",
        Some(value::Kind::ListValue(_)) => "list",
    }
}

fn value_to_json(value: &QdrantValue) -> serde_json::Value {
    match &value.kind {
        Some(kind) => kind_to_json(kind),
        None => serde_json::Value::Null,
    }
}

fn kind_to_json(kind: &value::Kind) -> serde_json::Value {
    use serde_json::Value as Json;

    match kind {
        value::Kind::NullValue(_) => Json::Null,
        value::Kind::BoolValue(b) => Json::Bool(*b),
        value::Kind::IntegerValue(i) => Json::from(*i),
        value::Kind::DoubleValue(f) => serde_json::Number::from_f64(*f)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        value::Kind::StringValue(s) => Json::String(s.clone()),
        value::Kind::StructValue(st) => Json::Object(
            st.fields
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
        value::Kind::ListValue(list) => Json::Array(list.values.iter().map(value_to_json).collect()),
    }
}
