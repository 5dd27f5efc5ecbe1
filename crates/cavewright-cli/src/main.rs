mod cmd;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cavewright",
    about = "Inspect, validate, and normalize cavewright action XML",
    version,
    propagate_version = true
)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every action in a document against its schema
    Validate { file: PathBuf },

    /// Parse a document and re-emit it in normalized form
    Format {
        file: PathBuf,

        /// Write to this path instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Print the attribute table for one or all action kinds
    Schema { tag: Option<String> },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Validate { file } => cmd::validate::run(&file, cli.json),
        Commands::Format { file, output } => cmd::format::run(&file, output.as_deref()),
        Commands::Schema { tag } => cmd::schema::run(tag.as_deref(), cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
