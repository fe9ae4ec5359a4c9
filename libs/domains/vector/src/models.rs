use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{VectorError, VectorResult};

/// Payload key under which each point's metadata string is stored
pub const METADATA_FIELD: &str = "metadata";

/// Distance metric for similarity calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    #[default]
    Cosine,
    Euclidean,
    Dot,
    Manhattan,
}

impl FromStr for DistanceMetric {
    type Err = VectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(DistanceMetric::Cosine),
            "euclid" | "euclidean" | "l2" => Ok(DistanceMetric::Euclidean),
            "dot" | "dotproduct" => Ok(DistanceMetric::Dot),
            "manhattan" | "l1" => Ok(DistanceMetric::Manhattan),
            other => Err(VectorError::Config(format!(
                "unknown distance metric '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::Euclidean => "euclid",
            DistanceMetric::Dot => "dot",
            DistanceMetric::Manhattan => "manhattan",
        };
        f.write_str(name)
    }
}

/// Whether upserts wait for the engine to durably apply the write
///
/// `Async` returns once the engine has accepted the request; a write
/// acknowledged this way can still be lost if the engine fails before
/// applying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    Async,
    Wait,
}

impl WriteMode {
    pub fn wait(self) -> bool {
        matches!(self, WriteMode::Wait)
    }
}

/// What search does with a hit whose metadata is not a plain string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadPolicy {
    /// Fail the whole search with [`VectorError::Payload`]
    #[default]
    Reject,
    /// Drop the hit
    Skip,
    /// Render the value as compact JSON text; missing or null becomes `""`
    Coerce,
}

impl FromStr for PayloadPolicy {
    type Err = VectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(PayloadPolicy::Reject),
            "skip" => Ok(PayloadPolicy::Skip),
            "coerce" => Ok(PayloadPolicy::Coerce),
            other => Err(VectorError::Config(format!(
                "unknown payload policy '{}'",
                other
            ))),
        }
    }
}

/// Vector configuration of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorParams {
    pub dimension: u64,
    pub distance: DistanceMetric,
}

impl VectorParams {
    pub fn new(dimension: u64) -> Self {
        Self {
            dimension,
            distance: DistanceMetric::default(),
        }
    }

    pub fn with_distance(mut self, distance: DistanceMetric) -> Self {
        self.distance = distance;
        self
    }
}

/// Parallel arrays describing the points of one upsert request
///
/// Position `i` of each array belongs to the same point. Construction checks
/// that the arrays line up and that every embedding has the same non-zero
/// length, so a batch that exists is always safe to turn into wire records.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnarBatch {
    ids: Vec<u64>,
    embeddings: Vec<Vec<f32>>,
    metadata: Vec<String>,
}

impl ColumnarBatch {
    pub fn new(
        ids: Vec<u64>,
        embeddings: Vec<Vec<f32>>,
        metadata: Vec<String>,
    ) -> VectorResult<Self> {
        if ids.len() != embeddings.len() || ids.len() != metadata.len() {
            return Err(VectorError::Validation(format!(
                "columnar batch arrays differ in length: {} ids, {} embeddings, {} metadata",
                ids.len(),
                embeddings.len(),
                metadata.len()
            )));
        }

        if let Some(first) = embeddings.first() {
            let dimension = first.len();
            if dimension == 0 {
                return Err(VectorError::Validation(
                    "embeddings must not be empty".to_string(),
                ));
            }
            if let Some(pos) = embeddings.iter().position(|e| e.len() != dimension) {
                return Err(VectorError::Validation(format!(
                    "embedding for id {} has {} dimensions, expected {}",
                    ids[pos],
                    embeddings[pos].len(),
                    dimension
                )));
            }
        }

        Ok(Self {
            ids,
            embeddings,
            metadata,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Shared embedding length, `None` for an empty batch
    pub fn dimension(&self) -> Option<usize> {
        self.embeddings.first().map(Vec::len)
    }

    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    pub fn into_parts(self) -> (Vec<u64>, Vec<Vec<f32>>, Vec<String>) {
        (self.ids, self.embeddings, self.metadata)
    }
}

/// One search hit with its score and identifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredMetadata {
    /// `None` when the point is keyed by a UUID rather than a number
    pub id: Option<u64>,
    pub score: f32,
    pub metadata: String,
}
