//! Quarry CLI - inspect how physical plans compile.
//!
//! Reads a workload file (catalog, storage capability profile, optional
//! compiler config, and a physical plan) and prints the executor tree the
//! compiler produces for it.

mod commands;
mod output;
mod workload;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Quarry plan compiler tool.
#[derive(Parser)]
#[command(name = "quarry")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Suppress info messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// Output format options.
#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// Machine-readable JSON format
    Json,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Compile the workload's plan and print the executor tree
    Explain {
        /// Path to the workload file
        path: PathBuf,

        /// Keep every selection condition local
        #[arg(long)]
        no_pushdown: bool,

        /// Also print every capability query the compiler made
        #[arg(long)]
        trace_capabilities: bool,
    },

    /// List the tables in the workload's catalog
    Catalog {
        /// Path to the workload file
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays parseable.
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    } else if !cli.quiet {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match cli.command {
        Commands::Explain {
            path,
            no_pushdown,
            trace_capabilities,
        } => commands::explain::run(
            &path,
            commands::explain::Options {
                no_pushdown,
                trace_capabilities,
            },
            cli.format,
            cli.quiet,
        ),
        Commands::Catalog { path } => commands::catalog::run(&path, cli.format, cli.quiet),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
