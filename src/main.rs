//! mdiff CLI - compare two versions of a file with hash trees
//!
//! Each file is cut into blocks (lines or fixed-size chunks), the blocks
//! are hashed into a tree, and the trees are compared to report which
//! blocks of the subject differ from the reference.

use anyhow::Context;
use clap::{Parser, Subcommand};
use merkle_diff::blocks::{self, Span};
use merkle_diff::{
    diff_trees, Algorithm, Blake3, BlockMode, Config, OutputFormat, Sha256, TreeHasher,
};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mdiff")]
#[command(about = "Find divergent blocks between two versions of a file using hash trees")]
#[command(version)]
struct Cli {
    /// Path to the config file (default: ~/.config/mdiff/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Hash algorithm
    #[arg(short, long, global = true)]
    algorithm: Option<Algorithm>,

    /// How files are cut into blocks
    #[arg(short, long, global = true)]
    mode: Option<BlockMode>,

    /// Block size in bytes for chunk mode
    #[arg(long, global = true)]
    chunk_size: Option<usize>,

    /// Output format (json or text)
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the root hash of a file's tree
    Root {
        /// The file to hash
        file: PathBuf,
    },

    /// Show blocks of SUBJECT that differ from REFERENCE
    Diff {
        /// The file whose divergent blocks are reported
        subject: PathBuf,
        /// The file to compare against
        reference: PathBuf,
    },

    /// Show the effective configuration
    Config {
        /// Persist the effective configuration to the config file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let config = apply_overrides(&cli, Config::load_from(&config_path)?);
    config.validate()?;
    debug!(?config, "effective config");

    match &cli.command {
        Commands::Root { file } => {
            let data = read_input(file)?;
            let report = match config.algorithm {
                Algorithm::Blake3 => root_report::<Blake3>(&data, &config)?,
                Algorithm::Sha256 => root_report::<Sha256>(&data, &config)?,
            };
            output(config.format, &report)?;
        }

        Commands::Diff { subject, reference } => {
            let subject_data = read_input(subject)?;
            let reference_data = read_input(reference)?;
            let report = match config.algorithm {
                Algorithm::Blake3 => diff_report::<Blake3>(&subject_data, &reference_data, &config)?,
                Algorithm::Sha256 => diff_report::<Sha256>(&subject_data, &reference_data, &config)?,
            };
            output(config.format, &report)?;
        }

        Commands::Config { save } => {
            if *save {
                config.save_to(&config_path)?;
            }
            output(
                config.format,
                &serde_json::json!({
                    "path": config_path.display().to_string(),
                    "saved": save,
                    "config": config
                }),
            )?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "merkle_diff=debug,mdiff=debug"
    } else {
        "merkle_diff=warn,mdiff=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn apply_overrides(cli: &Cli, mut config: Config) -> Config {
    if let Some(algorithm) = cli.algorithm {
        config.algorithm = algorithm;
    }
    if let Some(mode) = cli.mode {
        config.block_mode = mode;
    }
    if let Some(chunk_size) = cli.chunk_size {
        config.chunk_size = chunk_size;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    config
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn root_report<H: TreeHasher>(data: &[u8], config: &Config) -> anyhow::Result<serde_json::Value> {
    let tree = blocks::tree_for::<H>(data, config.block_mode, config.chunk_size)?;

    Ok(serde_json::json!({
        "algorithm": config.algorithm.name(),
        "mode": config.block_mode.to_string(),
        "blocks": tree.value().map(Span::len).unwrap_or(0),
        "leaves": tree.leaf_count(),
        "height": tree.height(),
        "root": tree.hash_hex()
    }))
}

fn diff_report<H: TreeHasher>(
    subject: &[u8],
    reference: &[u8],
    config: &Config,
) -> anyhow::Result<serde_json::Value> {
    let subject_tree = blocks::tree_for::<H>(subject, config.block_mode, config.chunk_size)?;
    let reference_tree = blocks::tree_for::<H>(reference, config.block_mode, config.chunk_size)?;

    let subject_blocks = subject_tree.value().map(Span::len).unwrap_or(0);
    let reference_blocks = reference_tree.value().map(Span::len).unwrap_or(0);
    if subject_blocks != reference_blocks {
        warn!(
            subject_blocks,
            reference_blocks, "block counts differ, positions past the shorter tree's shape are not compared"
        );
    }

    let diff = diff_trees(&subject_tree, &reference_tree);

    let mut divergent: Vec<(Span, String)> = diff
        .leaves
        .iter()
        .filter_map(|leaf| Some((*leaf.value()?, leaf.hash_hex()?)))
        .collect();
    divergent.sort_by_key(|(span, _)| span.start);

    let entries: Vec<_> = divergent
        .iter()
        .map(|(span, hash)| {
            serde_json::json!({
                "start": span.start,
                "end": span.end,
                "hash": hash
            })
        })
        .collect();

    Ok(serde_json::json!({
        "algorithm": config.algorithm.name(),
        "mode": config.block_mode.to_string(),
        "subject_root": subject_tree.hash_hex(),
        "reference_root": reference_tree.hash_hex(),
        "subject_blocks": subject_blocks,
        "reference_blocks": reference_blocks,
        "count": entries.len(),
        "divergent": entries,
        "stats": {
            "nodes_visited": diff.stats.nodes_visited,
            "unchanged_subtrees": diff.stats.unchanged_subtrees,
            "boundary_mismatches": diff.stats.boundary_mismatches
        }
    }))
}

fn output(format: OutputFormat, value: &serde_json::Value) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(value)?);
        }
        OutputFormat::Text => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
    }
    Ok(())
}
