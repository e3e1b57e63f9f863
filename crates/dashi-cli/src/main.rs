//! dashi CLI - Resource bundle inspection tool
//!
//! Commands:
//! - `dashi entries` - List the raw entries of a bundle
//! - `dashi cat` - Write one entry's decoded contents to stdout
//! - `dashi ids` - Collate a bundle and list identifiers with their variants
//! - `dashi resolve` - Resolve one identifier for a runtime context

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod inspect;

#[derive(Parser)]
#[command(name = "dashi")]
#[command(author, version, about = "Inspect dashi resource bundles", long_about = None)]
struct Cli {
    /// Bundle configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List raw entry names
    Entries {
        /// Bundle directory, .zip archive, or container document
        bundle: PathBuf,
    },

    /// Write an entry's decoded contents to stdout
    Cat {
        /// Bundle directory, .zip archive, or container document
        bundle: PathBuf,

        /// Entry name (e.g. icons/inbox.png)
        entry: String,
    },

    /// List identifiers and the qualifiers of their variants
    Ids {
        /// Bundle directory, .zip archive, or container document
        bundle: PathBuf,
    },

    /// Resolve one identifier for a runtime context
    Resolve {
        /// Bundle directory, .zip archive, or container document
        bundle: PathBuf,

        /// Identifier to resolve
        id: String,

        #[command(flatten)]
        runtime: inspect::RuntimeArgs,

        /// Print the resolved item as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = inspect::load_config(cli.config.as_deref())?;
    init_tracing(&config.log_level);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Entries { bundle } => {
            inspect::entries(&bundle, &mut out)?;
        }
        Commands::Cat { bundle, entry } => {
            inspect::cat(&bundle, &entry, &mut out)?;
        }
        Commands::Ids { bundle } => {
            inspect::ids(&bundle, &config, &mut out, &mut std::io::stderr())?;
        }
        Commands::Resolve {
            bundle,
            id,
            runtime,
            json,
        } => {
            inspect::resolve(&bundle, &id, &runtime, json, &config, &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
