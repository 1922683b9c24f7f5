use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use model_catalog::viewer::api::CatalogClient;
use model_catalog::viewer::ViewerApp;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the catalog API
    #[arg(long, default_value = "http://localhost:3000")]
    api_url: String,

    /// Record id to open (defaults to the newest record)
    #[arg(long)]
    id: Option<String>,
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "model_catalog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = Arc::new(CatalogClient::new(&args.api_url)?);

    let records = client.list_models()?;
    if records.is_empty() {
        anyhow::bail!("catalog is empty, upload a model first");
    }
    info!("📚 {} record(s) in the catalog", records.len());

    let start = args
        .id
        .and_then(|id| records.iter().position(|r| r.id == id))
        .unwrap_or(0);

    ViewerApp::new(client, records, start).run()
}
