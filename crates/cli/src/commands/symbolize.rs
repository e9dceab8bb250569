use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use symbolize_core::layout::InstallLayout;
use symbolize_core::{symbolize, SymbolizeReport, SymbolizeRequest};

use crate::resolve_install_dir;

/// Dump symbols for `binary` into `symbol_dir` (or the install's default store).
///
/// Prints `Writing: <path>` as the symbol file is created, or the full report as JSON
/// when `json` is set. Returns the report so the caller can propagate the dumper's
/// exit code.
pub fn symbolize_command(
    binary: &Path,
    symbol_dir: Option<&Path>,
    json: bool,
) -> Result<SymbolizeReport> {
    let install = InstallLayout::new(resolve_install_dir()?);
    let symbol_dir =
        symbol_dir.map(Path::to_path_buf).unwrap_or_else(|| install.default_symbol_dir.clone());

    let request = SymbolizeRequest { binary_path: binary.to_path_buf(), symbol_dir, install };

    let report = symbolize(&request, |path| {
        if !json {
            println!("Writing: {}", path.display());
        }
    })?;

    if report.stored.is_none() {
        warn!("no symbol file written for {}", binary.display());
    }

    if json {
        let serialized =
            serde_json::to_string_pretty(&report).context("Failed to serialize report to JSON")?;
        println!("{}", serialized);
    }

    Ok(report)
}
