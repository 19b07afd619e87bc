//! source-fetch - resolve and fetch build sources
//!
//! Usage:
//!   source-fetch resolve <reference>          Print the resolved descriptor as JSON
//!   source-fetch get <reference>...           Fetch sources, print their paths
//!   source-fetch checksum <file>              Print a file digest

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use levitate_fetch::{Config, HashAlgorithm, Options, fetch, file_digest, output, resolve};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "source-fetch")]
#[command(about = "Resolve and fetch build sources into the local cache")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file with [defines] and [hashes]
    #[arg(short, long, global = true, env = "SOURCE_FETCH_CONFIG")]
    config: Option<PathBuf>,

    /// Define holding the cache roots
    #[arg(long, global = true, default_value = "_sourcedir")]
    path_key: String,

    /// Log what would happen without touching the cache
    #[arg(short = 'n', long, global = true)]
    dry_run: bool,

    /// Only use sources already in the cache
    #[arg(long, global = true)]
    no_download: bool,

    /// Mirror base tried before the reference's own URLs (repeatable, comma-separated)
    #[arg(long = "url", global = true, value_delimiter = ',')]
    urls: Vec<String>,

    /// Print trace output
    #[arg(long, global = true)]
    trace: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a reference and print its descriptor
    Resolve {
        /// Source reference (scheme://host/path[?op...])
        reference: String,
    },

    /// Resolve and fetch one or more references
    Get {
        /// Source references
        #[arg(required = true)]
        references: Vec<String>,
    },

    /// Print the digest of a local file
    Checksum {
        /// File to hash
        file: PathBuf,

        /// Hash algorithm
        #[arg(short, long, default_value = "sha256")]
        algorithm: String,
    },
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Ok(Config::load(path)?);
    }
    match Config::default_path() {
        Some(path) if path.exists() => Config::load(&path)
            .with_context(|| format!("Failed to load default config: {}", path.display())),
        _ => Ok(Config::new()),
    }
}

fn main() {
    if let Err(e) = run() {
        output::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    output::set_trace(cli.trace);

    let options = Options {
        dry_run: cli.dry_run,
        download_disabled: cli.no_download,
        mirror_bases: (!cli.urls.is_empty()).then(|| cli.urls.clone()),
    };

    match &cli.command {
        Commands::Resolve { reference } => {
            let config = load_config(cli.config.as_deref())?;
            let source = resolve(reference, &cli.path_key, &config)
                .with_context(|| format!("Failed to resolve {}", reference))?;
            let json = serde_json::to_string_pretty(&source)?;
            output::stdout_raw(&format!("{}\n", json));
        }

        Commands::Get { references } => {
            let config = load_config(cli.config.as_deref())?;
            for reference in references {
                let source = resolve(reference, &cli.path_key, &config)
                    .with_context(|| format!("Failed to resolve {}", reference))?;
                fetch(&source.url, &source.local, &options, &config)
                    .with_context(|| format!("Failed to fetch {}", reference))?;
                output::stdout_raw(&format!("{}\n", source.symlink.display()));
            }
        }

        Commands::Checksum { file, algorithm } => {
            let algorithm: HashAlgorithm = match algorithm.parse() {
                Ok(a) => a,
                Err(_) => bail!(
                    "unknown hash algorithm '{}' (supported: {})",
                    algorithm,
                    HashAlgorithm::ALL
                        .iter()
                        .map(|a| a.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            };
            if !file.is_file() {
                bail!("not a file: {}", file.display());
            }
            let digest = file_digest(file, algorithm)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            output::stdout_raw(&format!("{} {}\n", algorithm, digest));
        }
    }

    Ok(())
}
