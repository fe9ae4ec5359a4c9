use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use core_config::LogFormat;
use domain_vector::{DistanceMetric, QdrantConfig, RequestContext, VectorResult};

#[derive(Parser, Debug)]
#[command(name = "vecstore")]
#[command(about = "Manage collections and run similarity search against a Qdrant-compatible engine")]
#[command(version)]
pub struct Cli {
    /// Engine gRPC address (host:port or URL)
    #[arg(long, env = "QDRANT_URL", global = true)]
    pub url: Option<String>,

    /// API key sent with every request
    #[arg(long, env = "QDRANT_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Give up on the operation after this many seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Log output format (pretty or json)
    #[arg(long, env = "LOG_FORMAT", global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List collection names, one per line
    Collections,

    /// Print whether a collection exists
    Exists { collection: String },

    /// Create a collection
    Create {
        collection: String,

        /// Vector dimensionality
        #[arg(long)]
        dim: u64,

        /// Distance metric (cosine, euclid, dot, manhattan). Defaults to QDRANT_DISTANCE.
        #[arg(long)]
        distance: Option<DistanceMetric>,
    },

    /// Print whether a point exists in a collection
    PointExists { collection: String, id: u64 },

    /// Upsert points from a JSON Lines file in a single batch
    ///
    /// Each line: {"id": 1, "vector": [0.1, 0.2], "metadata": "..."}.
    /// Non-string metadata is stored as its JSON text.
    Upsert {
        collection: String,

        #[arg(long)]
        file: PathBuf,
    },

    /// Print the metadata of the nearest points
    Search {
        collection: String,

        /// Comma-separated query vector, e.g. 0.1,0.2,0.3
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        vector: Vec<f32>,

        #[arg(long, default_value_t = 10)]
        limit: u64,

        /// Print id and score as JSON alongside the metadata
        #[arg(long)]
        scores: bool,
    },
}

impl Cli {
    /// Environment configuration with command-line overrides applied
    pub fn qdrant_config(&self) -> VectorResult<QdrantConfig> {
        let mut config = QdrantConfig::from_env()?;

        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(api_key) = &self.api_key {
            config.api_key = Some(api_key.clone()).filter(|key| !key.is_empty());
        }

        Ok(config)
    }

    pub fn request_context(&self) -> RequestContext {
        match self.timeout_secs {
            Some(secs) => RequestContext::with_timeout(Duration::from_secs(secs)),
            None => RequestContext::background(),
        }
    }
}
