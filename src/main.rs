use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use opendosm_sync::cli::Args;
use opendosm_sync::display::display_merged_table;
use opendosm_sync::merge::Merger;
use opendosm_sync::output::{ExistingArtifact, OutputWriter};
use opendosm_sync::pipeline::{build_agent, pull_series};
use opendosm_sync::sources::create_adapter;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = args.into_config()?;

    info!("Starting sync of {} sources", config.sources.len());
    info!("Artifact: {}", config.artifact.path.display());

    // Sources run one after another; the feeds are small and the artifact
    // depends on merge order.
    let agent = build_agent();
    let mut merger = Merger::new();

    for source in &config.sources {
        let Some(adapter) = create_adapter(&source.name) else {
            warn!("No adapter registered for '{}', skipping", source.name);
            continue;
        };

        let table = pull_series(&agent, source, adapter.as_ref());
        if table.is_empty() {
            info!("{}: no new data", source.name);
            continue;
        }
        merger.merge(&table);
    }

    let merged = merger.finalize();
    if merged.is_empty() {
        info!("No new data across all sources, artifact left untouched");
        return Ok(());
    }

    display_merged_table(&merged);

    let writer = OutputWriter::new(&config.artifact.path, config.artifact.columns.clone());
    let existing = ExistingArtifact::load(&config.artifact.path)?;
    let plan = writer.plan(existing.as_ref(), &merged);
    writer.commit(existing.as_ref(), &plan)?;

    info!("Sync completed successfully");
    Ok(())
}
