mod config;
mod engine;

pub use config::QdrantConfig;
pub use engine::{CloseHandle, QdrantEngine};
