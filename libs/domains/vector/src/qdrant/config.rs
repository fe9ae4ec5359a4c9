use std::str::FromStr;
use std::time::Duration;

use grpc_client::ChannelConfig;

use crate::error::{VectorError, VectorResult};
use crate::models::{DistanceMetric, PayloadPolicy, WriteMode};

const DEFAULT_URL: &str = "http://localhost:6334";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Qdrant connection configuration
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub connect_timeout_secs: u64,
    /// Per-request timeout enforced by the transport; `0` disables it
    pub timeout_secs: u64,
    /// Metric used by `create_collection`
    pub distance: DistanceMetric,
    pub write_mode: WriteMode,
    pub payload_policy: PayloadPolicy,
}

impl QdrantConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
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

    /// Load from `QDRANT_*` environment variables
    ///
    /// Unset variables fall back to defaults; set but unparsable ones are an
    /// error naming the variable.
    pub fn from_env() -> VectorResult<Self> {
        let url = std::env::var("QDRANT_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());

        let api_key = std::env::var("QDRANT_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let connect_timeout_secs =
            env_parse("QDRANT_CONNECT_TIMEOUT_SECS")?.unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);
        let timeout_secs = env_parse("QDRANT_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let distance = env_parse("QDRANT_DISTANCE")?.unwrap_or_default();
        let payload_policy = env_parse("QDRANT_PAYLOAD_POLICY")?.unwrap_or_default();
        let write_mode = match env_parse::<bool>("QDRANT_WAIT_FOR_WRITES")? {
            Some(true) => WriteMode::Wait,
            _ => WriteMode::Async,
        };

        Ok(Self {
            url,
            api_key,
            connect_timeout_secs,
            timeout_secs,
            distance,
            write_mode,
            payload_policy,
        })
    }

    /// Transport settings derived from the timeouts
    pub fn channel_config(&self) -> ChannelConfig {
        let config =
            ChannelConfig::default().with_connect_timeout(Duration::from_secs(self.connect_timeout_secs));

        if self.timeout_secs == 0 {
            config.without_request_timeout()
        } else {
            config.with_request_timeout(Duration::from_secs(self.timeout_secs))
        }
    }
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            api_key: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            distance: DistanceMetric::default(),
            write_mode: WriteMode::default(),
            payload_policy: PayloadPolicy::default(),
        }
    }
}

fn env_parse<T>(key: &str) -> VectorResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| VectorError::Config(format!("{}: {}", key, e))),
        _ => Ok(None),
    }
}
