//! vecstore
//!
//! Command-line access to a Qdrant-compatible vector engine through
//! `domain_vector::VectorStoreClient`. Each invocation performs one
//! operation and closes the connection.
//!
//! ## Modules
//!
//! - `app`: logging, configuration and client lifecycle
//! - `cli`: argument definitions
//! - `commands`: one handler per subcommand

pub mod app;
pub mod cli;
pub mod commands;

// Re-export for convenience
pub use app::run;
