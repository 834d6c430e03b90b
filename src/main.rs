use anyhow::Result;

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    tienda::cli::run().await
}
