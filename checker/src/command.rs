//! Checker command construction.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use sidelight_types::CheckerConfig;

/// Flags passed on every invocation, ahead of any configured extras.
///
/// The output parser's line grammar depends on these: absolute paths,
/// 1-indexed columns, explicit end positions, and no trailing summary
/// line.
pub(crate) const FIXED_FLAGS: [&str; 4] = [
    "--no-error-summary",
    "--show-absolute-path",
    "--show-column-numbers",
    "--show-error-end",
];

/// Build the invocation for checking one file.
///
/// `program` is the already-resolved executable. The working directory is
/// the project root so the checker picks up per-project configuration.
/// Only stdout is captured; the checker gets no stdin and its stderr is
/// discarded.
pub(crate) fn checker_command(
    program: &Path,
    config: &CheckerConfig,
    file: &Path,
    project_root: &Path,
) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(FIXED_FLAGS)
        .args(config.args())
        .arg(file)
        .current_dir(project_root)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);
    cmd
}
