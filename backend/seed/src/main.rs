use anyhow::Result;
use clap::Parser;
use meilisearch_sdk::client::Client;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON array of documents, local path or http(s) URL
    source: String,

    #[arg(long, env = "DATA_INDEX", default_value = "data")]
    index: String,

    #[arg(long, env = "MEILI_URL", default_value = "http://localhost:7700")]
    meili_url: String,

    #[arg(long, env = "MEILI_ADMIN_KEY")]
    meili_key: Option<String>,

    #[arg(long, default_value_t = 500)]
    batch: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();

    let documents = seed::load_dataset(&args.source).await?;
    info!("Loaded {} documents from {}", documents.len(), args.source);

    let client = Client::new(&args.meili_url, args.meili_key.as_deref())?;
    let seeded = seed::seed(&client, &args.index, documents, args.batch).await?;

    println!("Seeded {seeded} documents into {}", args.index);

    Ok(())
}
