//! hbarchiv - Hörbuch archive maintenance CLI
//!
//! This binary provides commands for validating and repairing the archive
//! structure, listing the audiobook catalog, and consolidating each book
//! into a single mp3 file.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use hbarchiv_cli::commands;

/// hbarchiv - Hörbuch archive structure checker and converter
#[derive(Parser)]
#[command(name = "hbarchiv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the archive against the five-level structure rules
    Check {
        /// Archive root directory
        root: String,

        /// Apply automatic repairs before checking
        #[arg(long)]
        fix: bool,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// List the audiobook catalog with normalized names
    List {
        /// Archive root directory
        root: String,

        /// Also list every audio file per book
        #[arg(long)]
        files: bool,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Consolidate every audiobook into one mp3 below the destination root
    Convert {
        /// Archive root directory
        root: String,

        /// Destination root directory (must exist)
        out_root: String,

        /// Number of parallel conversions
        #[arg(long, default_value_t = 2)]
        jobs: usize,

        /// Re-encode at this bitrate (e.g. 64k) instead of stream copy
        #[arg(long)]
        bitrate: Option<String>,

        /// Print the plan without converting anything
        #[arg(long)]
        dry_run: bool,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Check system dependencies and configuration
    Doctor,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { root, fix, json } => commands::check::run(&root, fix, json),
        Commands::List { root, files, json } => commands::list::run(&root, files, json),
        Commands::Convert {
            root,
            out_root,
            jobs,
            bitrate,
            dry_run,
            json,
        } => commands::convert::run(&root, &out_root, jobs, bitrate.as_deref(), dry_run, json),
        Commands::Doctor => commands::doctor::run(),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}
