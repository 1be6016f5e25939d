//! Common utilities for CLI tests.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

pub const DEPRECATED: &str = "from hypothesis import strategies as st\nst.fractions(0, 1, 9)\n";
pub const FIXED: &str =
    "from hypothesis import strategies as st\nst.fractions(0, 1, max_denominator=9)\n";

pub fn hypofix() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_hypofix"));
    command.env_remove("HYPOFIX_LOG");
    command
}

/// Run `hypofix` with `args`, feeding `stdin` when given.
#[allow(dead_code)]
pub fn run(args: &[&str], cwd: &Path, stdin: Option<&str>) -> Output {
    let mut child = hypofix()
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn hypofix");

    let mut pipe = child.stdin.take().expect("stdin is piped");
    pipe.write_all(stdin.unwrap_or_default().as_bytes())
        .expect("Failed to write stdin");
    drop(pipe);

    child.wait_with_output().expect("Failed to wait for hypofix")
}
