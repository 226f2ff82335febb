use std::path::PathBuf;

use clap::{command, Parser, Subcommand};

//
// For parsing the user specified command.
//
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a job descriptor from a map and a reduce function.
    Create {
        /// Map function, written as `<script>:<function>`.
        #[arg(short, long)]
        map: String,

        /// Reduce function, written as `<script>:<function>`.
        #[arg(short, long)]
        reduce: String,

        /// Identifier for the job. A fresh one is minted when omitted.
        #[arg(short, long)]
        guid: Option<String>,

        /// Where to write the descriptor. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the contents of a job descriptor file.
    Inspect {
        /// Path of the descriptor file.
        file: PathBuf,
    },
    /// Check that a job descriptor file decodes cleanly.
    Validate {
        /// Path of the descriptor file.
        file: PathBuf,
    },
}

/// Parse the user command.
/// Can be 1 of 3:
/// - create
/// - inspect
/// - validate
pub fn parse_args() -> Commands {
    Args::parse().command
}
