use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use folio_common::observability::init_logging;
use folio_config::{FolioConfig, FolioConfigLoader};
use pipeline::{build_extractor, build_source};
mod pipeline;

/// Extract the work history of a profile page as JSON.
#[derive(Debug, Parser)]
#[command(name = "folio", version)]
struct Args {
    /// YAML config; skipped when the file does not exist.
    #[arg(long, env = "FOLIO_CONFIG", default_value = "folio.yaml")]
    config: PathBuf,

    /// Read a saved page instead of the configured source.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Indent the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1) Load config (env wins)
    let cfg: FolioConfig = FolioConfigLoader::new()
        .with_optional_file(&args.config)
        .load()?;

    let log_path = init_logging(cfg.logging.to_log_config("folio"))?;
    tracing::debug!(config = %args.config.display(), log = %log_path.display(), "app.start");

    let source = build_source(&cfg, args.input)?;
    let extractor = build_extractor(&cfg.images)?;

    let html = source.fetch_html().await?;
    tracing::info!(source = %source.describe(), bytes = html.len(), "app.html.acquired");

    let records = extractor.extract_document(&html).await;
    if records.is_empty() {
        tracing::warn!(source = %source.describe(), "app.no_records");
    }

    let out = if args.pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };
    println!("{out}");
    Ok(())
}
