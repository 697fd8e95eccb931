//! Tessera Publish - command line publishing for a Tessera data directory.
//!
//! # Usage
//!
//! ```bash
//! # Write the page to TESSERA_OUTPUT_PATH
//! tessera-publish publish
//!
//! # Print the page that would be published
//! tessera-publish preview > /tmp/preview.html
//!
//! # List the tile types this build knows about
//! tessera-publish types
//! ```

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use tessera_publish::{PageGenerator, PublishConfig, builtin_registry};

/// Tessera Publish - static page generation for Tessera tiles.
#[derive(Parser, Debug)]
#[command(name = "tessera-publish")]
#[command(about = "Publish or preview the Tessera page from a data directory")]
#[command(version)]
struct Args {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the page and write it to the output path
    Publish,
    /// Print the page to stdout without writing anything
    Preview,
    /// List registered tile types
    Types,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if std::path::Path::new(&args.dotenv).exists() {
        dotenvy::from_path(&args.dotenv)?;
        eprintln!("Loaded environment from {}", args.dotenv);
    }

    // Logs go to stderr so `preview` output can be redirected cleanly.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let registry = Arc::new(builtin_registry());

    match args.command {
        Command::Types => {
            for tile_type in registry.iter() {
                println!(
                    "{:<12} {:<12} {}",
                    tile_type.key(),
                    tile_type.name(),
                    tile_type.description()
                );
            }
        }
        Command::Preview => {
            let config = PublishConfig::from_env()?;
            let generator = PageGenerator::open(&config, registry);
            print!("{}", generator.preview()?);
        }
        Command::Publish => {
            let config = PublishConfig::from_env()?;
            let generator = PageGenerator::open(&config, registry);
            let outcome = generator.generate()?;
            println!(
                "Published {} tiles to {} ({} bytes)",
                outcome.tiles_published,
                outcome.path.display(),
                outcome.bytes
            );
            if outcome.tiles_skipped > 0 {
                eprintln!("{} tiles were skipped, see log for details", outcome.tiles_skipped);
            }
        }
    }

    Ok(())
}
