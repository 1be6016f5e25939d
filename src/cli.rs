//! Command-line interface for hypofix.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hypofix")]
#[command(about = "Upgrade deprecated Hypothesis call sites", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Refactor deprecated code in place
    ///
    /// PATH is the file(s) or directories of files to rewrite in place, or
    /// "-" to read from stdin and write to stdout.
    Codemod {
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        /// Report files that would change without writing them
        #[arg(long)]
        check: bool,
    },
    /// Print the bundled signature table as JSON
    Signatures {
        /// Fully-qualified names to print (default: the whole table)
        #[arg(value_name = "NAME")]
        names: Vec<String>,
    },
}
