//! `vend-wl-init`: the whitelist initializer CLI (spec §6, §4.C). A
//! one-shot procedure that snapshots every asset currently existing under
//! the whitelist policy into `whitelist_dir`, crash-safely and idempotently.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vending_indexer::{BlockfrostIndexer, Indexer};

#[derive(Parser, Debug)]
#[command(about = "Populates a whitelist directory from every asset currently under a policy id")]
struct Cli {
    #[arg(long)]
    blockfrost_project: String,

    #[arg(long)]
    consumed_dir: PathBuf,

    #[arg(long)]
    whitelist_dir: PathBuf,

    #[arg(long)]
    policy_id: String,

    #[arg(long, default_value_t = false, conflicts_with = "mainnet")]
    preview: bool,

    #[arg(long, default_value_t = false)]
    mainnet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    std::fs::create_dir_all(&cli.consumed_dir)
        .with_context(|| format!("could not create consumed dir {}", cli.consumed_dir.display()))?;

    // Idempotent (§4.C): a directory already holding entries is treated as
    // an already-completed snapshot and is left untouched.
    if cli.whitelist_dir.is_dir()
        && std::fs::read_dir(&cli.whitelist_dir)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    {
        info!(whitelist_dir = %cli.whitelist_dir.display(), "whitelist already initialized; skipping");
        return Ok(());
    }

    let indexer = if cli.mainnet {
        BlockfrostIndexer::mainnet(cli.blockfrost_project.clone())
    } else {
        BlockfrostIndexer::preview(cli.blockfrost_project.clone())
    };

    let assets = indexer
        .assets_under(&cli.policy_id)
        .await
        .context("could not list assets under whitelist policy")?;
    info!(count = assets.len(), policy_id = %cli.policy_id, "fetched whitelist snapshot");

    // Stage the full snapshot in a sibling temp directory, then replace
    // `whitelist_dir` with a single rename: an interrupted run leaves the
    // real path untouched (empty), never half-populated (§3).
    let parent = cli
        .whitelist_dir
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&parent)?;
    let staging = tempfile::Builder::new()
        .prefix(".vend-wl-init-")
        .tempdir_in(&parent)
        .context("could not create staging directory")?;

    for asset_id in &assets {
        std::fs::write(staging.path().join(asset_id.as_str()), [])
            .with_context(|| format!("could not stage whitelist entry {asset_id}"))?;
    }

    if cli.whitelist_dir.is_dir() {
        std::fs::remove_dir(&cli.whitelist_dir).context("could not remove empty whitelist dir")?;
    }
    std::fs::rename(staging.into_path(), &cli.whitelist_dir)
        .context("could not publish whitelist snapshot")?;

    info!(whitelist_dir = %cli.whitelist_dir.display(), "whitelist initialized");
    Ok(())
}
