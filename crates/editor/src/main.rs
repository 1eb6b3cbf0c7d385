use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use brickyard_lib::command::execute_json_batch;
use brickyard_lib::harness::TestHarness;
use brickyard_lib::state::{EditorSettings, EditorState};
use shared::{Catalog, Obstacle};

/// Replay a JSON command script against a headless brick house editor.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// JSON array of commands; read from stdin when omitted.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,
    /// Template catalog JSON instead of the built-in catalog.
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,
    /// Road segment list JSON instead of the default layout.
    #[arg(long, value_name = "PATH", conflicts_with = "no_roads")]
    obstacles: Option<PathBuf>,
    /// Settings JSON instead of the user config directory.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Start with no roads at all.
    #[arg(long)]
    no_roads: bool,
    /// Pretty-print the responses.
    #[arg(long)]
    pretty: bool,
    /// Write the effective settings to the user config directory.
    #[arg(long)]
    save_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brickyard=info,brickyard_lib=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let catalog = match &args.catalog {
        Some(path) => {
            let json = read_file(path)?;
            Catalog::from_json(&json)
                .with_context(|| format!("invalid catalog {}", path.display()))?
        }
        None => shared::builtin_catalog(),
    };

    let obstacles: Vec<Obstacle> = match &args.obstacles {
        Some(path) => serde_json::from_str(&read_file(path)?)
            .with_context(|| format!("invalid obstacle list {}", path.display()))?,
        None if args.no_roads => Vec::new(),
        None => shared::default_roads(),
    };

    let settings = match &args.config {
        Some(path) => EditorSettings::load_from(path)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid settings {}", path.display()))?,
        None => EditorSettings::load(),
    };
    if args.save_config {
        settings.save();
    }

    tracing::info!(
        "Editor ready: {} templates, {} road segments",
        catalog.len(),
        obstacles.len()
    );

    let script = match &args.script {
        Some(path) => read_file(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read script from stdin")?;
            buf
        }
    };

    let mut harness = TestHarness::with_state(EditorState::new(catalog, obstacles, settings));
    let responses = execute_json_batch(&mut harness, &script).map_err(anyhow::Error::msg)?;

    let failed = responses.iter().filter(|r| !r.success).count();
    if failed > 0 {
        tracing::warn!("{failed} of {} commands failed", responses.len());
    }

    let out = if args.pretty {
        serde_json::to_string_pretty(&responses)?
    } else {
        serde_json::to_string(&responses)?
    };
    println!("{out}");
    Ok(())
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
