use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};

pub mod commands;

/// Environment variable that overrides the install directory.
pub const INSTALL_DIR_ENV: &str = "SYMBOLIZE_INSTALL_DIR";

/// Directory the tool is installed in.
///
/// `SYMBOLIZE_INSTALL_DIR` takes precedence; otherwise this is the directory holding
/// the running executable. Dumpers and the default symbol store resolve against it,
/// never against the current working directory.
pub fn resolve_install_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os(INSTALL_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let exe = env::current_exe().context("Failed to locate the running executable")?;
    exe.parent()
        .map(|p| p.to_path_buf())
        .with_context(|| format!("Executable has no parent directory: {}", exe.display()))
}

/// Map a dumper exit code onto this process's exit status.
///
/// Codes that do not fit a process status, and signal deaths (`None`), become 1.
pub fn exit_code_for(code: Option<i32>) -> ExitCode {
    code.and_then(|c| u8::try_from(c).ok()).map(ExitCode::from).unwrap_or(ExitCode::FAILURE)
}
