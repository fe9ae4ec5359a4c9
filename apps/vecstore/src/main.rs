//! vecstore - Entry Point
//!
//! Minimal entry point that delegates to the app module.

#[tokio::main]
async fn main() -> eyre::Result<()> {
    vecstore::run().await
}
