//! proglog CLI
//!
//! Command-line tools for proglog store files.
//!
//! # Commands
//!
//! - `append` - Append records to a store
//! - `read` - Print the record at a position
//! - `read-at` - Print raw bytes at an offset
//! - `inspect` - Walk the records of a store and report their layout

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// proglog store file tools.
#[derive(Parser)]
#[command(name = "proglog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the store file
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append each payload as one record
    Append {
        /// Payloads to append
        payloads: Vec<String>,

        /// Append all of standard input as a single record
        #[arg(long, conflicts_with = "payloads")]
        stdin: bool,
    },

    /// Print the payload of the record at a position
    Read {
        /// Position of the record's length prefix
        position: u64,

        /// Print the payload as hex
        #[arg(long)]
        hex: bool,
    },

    /// Print raw bytes at an offset, ignoring record framing
    ReadAt {
        /// Byte offset to start reading at
        offset: u64,

        /// Number of bytes to read
        len: usize,
    },

    /// Walk the records of a store
    Inspect {
        /// Maximum number of records to list
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Append { payloads, stdin } => {
            let path = cli.path.ok_or("Store path required for append")?;
            commands::append::run(&path, &payloads, stdin)?;
        }
        Commands::Read { position, hex } => {
            let path = cli.path.ok_or("Store path required for read")?;
            commands::read::run(&path, position, hex)?;
        }
        Commands::ReadAt { offset, len } => {
            let path = cli.path.ok_or("Store path required for read-at")?;
            commands::read::run_raw(&path, offset, len)?;
        }
        Commands::Inspect { limit, format } => {
            let path = cli.path.ok_or("Store path required for inspect")?;
            commands::inspect::run(&path, limit, &format)?;
        }
        Commands::Version => {
            println!("proglog CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
