use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    repolens_cli::main_entry().await
}
