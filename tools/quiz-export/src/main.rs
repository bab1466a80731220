//! quiz-export - quiz bundle packing tool
//!
//! Packs question and result audio clips, plus the per-question scoring
//! tables from a quiz.toml manifest, into the single bundle file the quiz
//! player loads.
//!
//! # Usage
//!
//! ```bash
//! # Pack everything listed in quiz.toml
//! quiz-export build
//!
//! # Validate the manifest and payload files without writing anything
//! quiz-export check
//!
//! # Dump the layout of an existing bundle
//! quiz-export inspect build/bundle.bin
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quiz-export")]
#[command(about = "Quiz bundle packing tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the bundle from a manifest file
    Build {
        /// Path to quiz.toml manifest
        #[arg(default_value = "quiz.toml")]
        manifest: PathBuf,

        /// Output bundle file (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate manifest and payload files without building
    Check {
        /// Path to quiz.toml manifest
        #[arg(default_value = "quiz.toml")]
        manifest: PathBuf,
    },

    /// Print the records of an existing bundle
    Inspect {
        /// Bundle file to read
        bundle: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            manifest,
            output,
            verbose,
        } => {
            if verbose {
                tracing::info!("Building bundle from {:?}", manifest);
            }
            let summary = quiz_export::build(&manifest, output)?;
            quiz_export::build::log_summary(&summary);
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let bundle = quiz_export::check(&manifest)?;
            tracing::info!(
                "Manifest is valid! ({} questions, {} bytes when packed)",
                bundle.question_count(),
                bundle.encoded_len()
            );
        }

        Commands::Inspect { bundle } => {
            quiz_export::inspect(&bundle)?;
        }
    }

    Ok(())
}
