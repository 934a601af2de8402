use std::{env, time::Duration};

use anyhow::{Result, bail};
use insights::{
    Dashboard, Facet, HttpRecordSource,
    presentation::{TextPresenter, present},
};
use tracing_subscriber::{EnvFilter, fmt};

/// Usage: `tester [facet=value ...]`, against `API_URL` (default http://localhost:1111).
#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let base_url = env::var("API_URL").unwrap_or_else(|_| "http://localhost:1111".to_string());
    let source = HttpRecordSource::new(&base_url);

    let mut dashboard = Dashboard::new();
    dashboard.load(&source).await;

    if let Some(error) = dashboard.error() {
        bail!("Could not load {}: {error}", source.url());
    }

    println!("Loaded {} records from {}", dashboard.raw().len(), source.url());

    for arg in env::args().skip(1) {
        let Some((name, value)) = arg.split_once('=') else {
            bail!("Expected facet=value, got {arg}");
        };

        let Some(facet) = Facet::ALL.into_iter().find(|f| f.name() == name) else {
            bail!("Unknown facet {name}");
        };

        dashboard.set_filter(facet, value);
    }

    let mut presenter = TextPresenter::new();
    if let Some(view) = dashboard.view() {
        present(&mut presenter, &view, Some(Duration::from_millis(200))).await?;
    }

    print!("{}", presenter.output);

    Ok(())
}
