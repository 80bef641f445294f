//! bagit CLI - read and verify BagIt bags

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use bagit::{generate_payload_oxum, read_bag, BagVerifier, Config};

#[derive(Parser)]
#[command(name = "bagit")]
#[command(about = "read and verify BagIt packages")]
#[command(version)]
struct Cli {
    /// log level (RUST_LOG overrides)
    #[arg(long, default_value = "warn", env = "BAGIT_LOG_LEVEL")]
    log_level: String,

    /// verifier settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// print what a bag declares
    Read {
        /// bag root directory
        bag: PathBuf,
    },

    /// check that a bag is valid
    Verify {
        /// bag root directory
        bag: PathBuf,

        /// only check completeness, skip checksums
        #[arg(long)]
        complete_only: bool,

        /// treat hidden files as payload
        #[arg(long)]
        include_hidden: bool,
    },

    /// compare the payload-oxum against the payload
    Quick {
        /// bag root directory
        bag: PathBuf,
    },

    /// print the payload-oxum of a directory
    Oxum {
        /// payload directory
        dir: PathBuf,
    },
}

fn init_logging(level: &str) {
    let log_level: tracing::Level = level.parse().unwrap_or(tracing::Level::WARN);
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stderr_layer).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> bagit::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Read { bag } => {
            let bag = read_bag(&bag)?;

            println!("root: {}", bag.root().display());
            println!("version: {}", bag.version());
            println!("encoding: {}", bag.encoding());

            for manifest in bag.payload_manifests() {
                println!("payload manifest: {} ({} files)", manifest.algorithm(), manifest.len());
            }
            for manifest in bag.tag_manifests() {
                println!("tag manifest: {} ({} files)", manifest.algorithm(), manifest.len());
            }

            if !bag.metadata().is_empty() {
                println!("\nmetadata:");
                for (key, value) in bag.metadata().all() {
                    println!("  {}: {}", key, value);
                }
            }

            if !bag.items_to_fetch().is_empty() {
                println!("\nfetch:");
                for item in bag.items_to_fetch() {
                    println!("  {}", item);
                }
            }
        }

        Commands::Verify {
            bag,
            complete_only,
            include_hidden,
        } => {
            let verifier = BagVerifier::from_config(&config)?;
            let bag = verifier.read_bag(&bag)?;
            let ignore_hidden = config.ignore_hidden_files && !include_hidden;

            let outcome = if complete_only {
                verifier.is_complete(&bag, ignore_hidden)
            } else {
                verifier.is_valid(&bag, ignore_hidden)
            };
            verifier.close();
            outcome?;

            let verdict = if complete_only { "complete" } else { "valid" };
            println!("bag at {} is {}", bag.root().display(), verdict);
        }

        Commands::Quick { bag } => {
            let bag = read_bag(&bag)?;
            if !BagVerifier::can_quick_verify(&bag) {
                println!(
                    "bag at {} cannot be quickly verified (no payload-oxum, or items left to fetch)",
                    bag.root().display()
                );
                return Ok(());
            }

            BagVerifier::quickly_verify(&bag)?;
            println!("bag at {} matches its payload-oxum", bag.root().display());
        }

        Commands::Oxum { dir } => {
            println!("{}", generate_payload_oxum(&dir)?);
        }
    }

    Ok(())
}
