//! hypofix CLI entry point.

mod cli;

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Command};
use hypofix::codemod::{CodemodOptions, run_codemod};
use hypofix::Refactorer;
use hypofix_passes::registry::{self, positional_exclusions};
use hypofix_passes::{ConfigError, ParamDescriptor, SignatureDatabase};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const CONFIG_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Codemod { paths, check } => codemod(&paths, check),
        Command::Signatures { names } => print_signatures(&names),
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("hypofix: {e}");
            ExitCode::from(CONFIG_ERROR)
        }
    }
}

/// Log to stderr. `HYPOFIX_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("HYPOFIX_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn codemod(paths: &[std::path::PathBuf], check: bool) -> Result<ExitCode, ConfigError> {
    let summary = run_codemod(paths, CodemodOptions { check }, &Refactorer::new())?;
    if summary.failed > 0 || (check && summary.changed > 0) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

#[derive(Serialize)]
struct SignatureEntry {
    qualname: String,
    registered: bool,
    parameters: Vec<ParamDescriptor>,
    positional_exclusions: Vec<&'static str>,
}

fn print_signatures(names: &[String]) -> Result<ExitCode, ConfigError> {
    let qualnames: Vec<String> = if names.is_empty() {
        registry::table_qualnames().collect()
    } else {
        names.to_vec()
    };

    let database = SignatureDatabase::global();
    let entries = qualnames
        .into_iter()
        .map(|qualname| {
            let signature = database.lookup(&qualname)?;
            Ok(SignatureEntry {
                registered: registry::is_target(&qualname),
                parameters: signature.to_vec(),
                positional_exclusions: positional_exclusions(&qualname).collect(),
                qualname,
            })
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;

    match serde_json::to_string_pretty(&entries) {
        Ok(json) => {
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("hypofix: could not serialize signatures: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
