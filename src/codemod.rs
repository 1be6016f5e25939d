//! The `codemod` command: rewrite files in place.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use derive_more::{Display, Error, From};
use hypofix_passes::ConfigError;

use crate::diagnostics::print_parse_error;
use crate::files::{Input, discover_inputs};
use crate::pipeline::{RefactorError, Refactorer};

/// Failure to process one input. Only [`CodemodError::Config`] is fatal.
#[derive(Debug, Display, Error, From)]
pub enum CodemodError {
    #[display("{}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("{_0}")]
    Refactor(RefactorError),
}

/// What happened to a single input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged,
    Failed,
}

/// Per-run counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CodemodSummary {
    pub changed: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl CodemodSummary {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Changed => self.changed += 1,
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.changed + self.unchanged + self.failed
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CodemodOptions {
    /// Report changes without writing anything back.
    pub check: bool,
}

/// Run the codemod over `paths`.
///
/// Unparseable files are reported and skipped; the remaining files are still
/// processed. A configuration error aborts the run before any file is
/// touched, or as soon as one surfaces.
pub fn run_codemod(
    paths: &[PathBuf],
    options: CodemodOptions,
    refactorer: &Refactorer,
) -> Result<CodemodSummary, ConfigError> {
    refactorer.signatures().verify_registry()?;

    let mut summary = CodemodSummary::default();
    for input in discover_inputs(paths) {
        let result = match &input {
            Input::Stdin => codemod_stdin(refactorer),
            Input::File(path) => codemod_file(path, options, refactorer),
        };
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(CodemodError::Refactor(RefactorError::Config(err))) => return Err(err),
            Err(CodemodError::Refactor(RefactorError::Parse(_))) => Outcome::Failed,
            Err(err) => {
                tracing::error!(error = %err, "Could not process input");
                Outcome::Failed
            }
        };
        summary.record(outcome);
    }

    tracing::info!(
        changed = summary.changed,
        unchanged = summary.unchanged,
        failed = summary.failed,
        "Codemod finished"
    );
    Ok(summary)
}

fn codemod_file(
    path: &Path,
    options: CodemodOptions,
    refactorer: &Refactorer,
) -> Result<Outcome, CodemodError> {
    let io_err = |source| CodemodError::Io {
        path: path.to_path_buf(),
        source,
    };
    let code = std::fs::read_to_string(path).map_err(io_err)?;
    let refactored = refactor_reporting(refactorer, &code, &path.display().to_string())?;

    if refactored == code {
        tracing::debug!(path = %path.display(), "Unchanged");
        return Ok(Outcome::Unchanged);
    }
    if options.check {
        tracing::info!(path = %path.display(), "Would rewrite");
    } else {
        std::fs::write(path, refactored).map_err(io_err)?;
        tracing::info!(path = %path.display(), "Rewrote");
    }
    Ok(Outcome::Changed)
}

fn codemod_stdin(refactorer: &Refactorer) -> Result<Outcome, CodemodError> {
    let path = PathBuf::from("<stdin>");
    let mut code = String::new();
    io::stdin()
        .read_to_string(&mut code)
        .map_err(|source| CodemodError::Io {
            path: path.clone(),
            source,
        })?;

    let refactored = refactor_reporting(refactorer, &code, "<stdin>")?;
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(refactored.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|source| CodemodError::Io { path, source })?;

    Ok(if refactored == code {
        Outcome::Unchanged
    } else {
        Outcome::Changed
    })
}

/// Refactor `code`, rendering a parse error against its source before
/// returning it.
fn refactor_reporting(
    refactorer: &Refactorer,
    code: &str,
    file_path: &str,
) -> Result<String, CodemodError> {
    refactorer.refactor(code).map_err(|err| {
        if let RefactorError::Parse(parse) = &err {
            print_parse_error(parse, code, file_path);
        }
        CodemodError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPRECATED: &str = "from hypothesis import strategies as st\nst.fractions(0, 1, 9)\n";
    const FIXED: &str =
        "from hypothesis import strategies as st\nst.fractions(0, 1, max_denominator=9)\n";

    #[test]
    fn test_rewrites_changed_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let changed = dir.path().join("changed.py");
        let clean = dir.path().join("clean.py");
        std::fs::write(&changed, DEPRECATED).unwrap();
        std::fs::write(&clean, FIXED).unwrap();

        let summary = run_codemod(
            &[dir.path().to_path_buf()],
            CodemodOptions::default(),
            &Refactorer::new(),
        )
        .unwrap();

        assert_eq!(
            summary,
            CodemodSummary {
                changed: 1,
                unchanged: 1,
                failed: 0
            }
        );
        assert_eq!(std::fs::read_to_string(&changed).unwrap(), FIXED);
        assert_eq!(std::fs::read_to_string(&clean).unwrap(), FIXED);
    }

    #[test]
    fn test_check_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.py");
        std::fs::write(&path, DEPRECATED).unwrap();

        let summary = run_codemod(
            &[path.clone()],
            CodemodOptions { check: true },
            &Refactorer::new(),
        )
        .unwrap();

        assert_eq!(summary.changed, 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEPRECATED);
    }

    #[test]
    fn test_parse_failure_does_not_stop_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.py");
        let good = dir.path().join("good.py");
        std::fs::write(&broken, "def f(:\n    pass\n").unwrap();
        std::fs::write(&good, DEPRECATED).unwrap();

        let summary = run_codemod(
            &[broken.clone(), good.clone()],
            CodemodOptions::default(),
            &Refactorer::new(),
        )
        .unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.changed, 1);
        assert_eq!(summary.total(), 2);
        assert_eq!(
            std::fs::read_to_string(&broken).unwrap(),
            "def f(:\n    pass\n"
        );
        assert_eq!(std::fs::read_to_string(&good).unwrap(), FIXED);
    }

    #[test]
    fn test_missing_file_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let summary = run_codemod(
            &[dir.path().join("missing.py")],
            CodemodOptions::default(),
            &Refactorer::new(),
        )
        .unwrap();
        assert_eq!(summary.failed, 1);
    }
}
