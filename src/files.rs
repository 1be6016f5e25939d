//! Input discovery for the codemod command.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

/// One unit of work.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    /// Read standard input, write standard output.
    Stdin,
    File(PathBuf),
}

/// Expand command-line paths into inputs.
///
/// `-` means standard input. Directories are walked recursively for `*.py`
/// files; explicitly named files are taken as they are. Each file appears
/// once, however many arguments reach it.
pub fn discover_inputs(paths: &[PathBuf]) -> Vec<Input> {
    let mut inputs = Vec::new();
    let mut seen = HashSet::new();
    let mut push = |inputs: &mut Vec<Input>, input: Input| {
        let key = match &input {
            Input::Stdin => None,
            Input::File(path) => Some(std::fs::canonicalize(path).unwrap_or_else(|_| path.clone())),
        };
        if seen.insert(key) {
            inputs.push(input);
        }
    };
    for path in paths {
        if path.as_os_str() == "-" {
            push(&mut inputs, Input::Stdin);
        } else if path.is_dir() {
            let mut files = python_files(path);
            files.sort();
            for file in files {
                push(&mut inputs, Input::File(file));
            }
        } else {
            push(&mut inputs, Input::File(path.clone()));
        }
    }
    inputs
}

fn python_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_ignored_dir(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(error = %err, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "py"))
        .map(DirEntry::into_path)
        .collect()
}

fn is_ignored_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.') || name == "__pycache__")
}
