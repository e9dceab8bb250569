use std::fs::{self, File};
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::dumper::{DumperKind, DumperLines, DumperProcess};
use crate::error::SymbolizeError;
use crate::layout::{InstallLayout, SymbolLayout};
use crate::module::{is_module_header, ModuleRecord};

/// Request to dump and store the symbols of one binary.
#[derive(Debug, Clone)]
pub struct SymbolizeRequest {
    /// Non-stripped Linux, Windows, or NaCl binary.
    pub binary_path: PathBuf,
    /// Root of the symbol store. Must already exist.
    pub symbol_dir: PathBuf,
    /// Where the `dump_syms` executables live.
    pub install: InstallLayout,
}

/// A symbol file written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredModule {
    pub module: ModuleRecord,
    pub path: PathBuf,
}

/// Outcome of a completed dumper run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolizeReport {
    pub binary_path: PathBuf,
    pub dumper: DumperKind,
    pub dumper_path: PathBuf,
    /// `None` when the dumper produced no `MODULE` record.
    pub stored: Option<StoredModule>,
    /// Exit code of the dumper; `None` if it was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl SymbolizeReport {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Run the dumper for `request.binary_path` and store its output.
///
/// `on_write` is called with the output path right before the symbol file is created.
/// The dumper is terminated on every return path, including errors.
pub fn symbolize(
    request: &SymbolizeRequest,
    on_write: impl FnMut(&Path),
) -> Result<SymbolizeReport, SymbolizeError> {
    // dump_syms reports a missing input poorly, so check up front.
    if !request.binary_path.is_file() {
        return Err(SymbolizeError::MissingBinary(request.binary_path.clone()));
    }
    // Never create the store root; a typo should not start a new tree.
    if !request.symbol_dir.is_dir() {
        return Err(SymbolizeError::MissingSymbolDir(request.symbol_dir.clone()));
    }

    let dumper = DumperKind::for_binary(&request.binary_path);
    let dumper_path = request.install.dumper_path(dumper).to_path_buf();
    debug!("using {:?} dumper at {}", dumper, dumper_path.display());

    let mut process = DumperProcess::spawn(&dumper_path, &request.binary_path)?;
    let layout = SymbolLayout::new(&request.symbol_dir);
    let stored = store_symbols(process.lines()?, &layout, &request.binary_path, on_write)?;

    let status = process.wait()?;
    let exit_code = status.code();
    if !status.success() {
        warn!("{} exited with {}", dumper_path.display(), status);
    }

    Ok(SymbolizeReport {
        binary_path: request.binary_path.clone(),
        dumper,
        dumper_path,
        stored,
        exit_code,
    })
}

/// Copy a dumper output stream into the store, naming the file from its `MODULE` line.
///
/// Lines are copied verbatim, header included. A second `MODULE` line or data before
/// the first one is fatal; a file already written stays on disk.
pub fn store_symbols<R: BufRead>(
    lines: DumperLines<R>,
    layout: &SymbolLayout,
    binary: &Path,
    mut on_write: impl FnMut(&Path),
) -> Result<Option<StoredModule>, SymbolizeError> {
    let mut open: Option<(StoredModule, BufWriter<File>)> = None;

    for line in lines {
        let line = line.map_err(SymbolizeError::io("Failed to read dump_syms output"))?;

        if is_module_header(&line) {
            if let Some((stored, _)) = &open {
                return Err(SymbolizeError::MultipleModules(stored.path.clone()));
            }

            let module = ModuleRecord::parse(&line)?;
            if !module.has_build_id() {
                return Err(SymbolizeError::MissingBuildId);
            }

            let target = module.target(binary)?;
            let path = layout.symbol_file_path(&target, &module.build_id);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(SymbolizeError::io(format!(
                    "Failed to create symbol dir {}",
                    parent.display()
                )))?;
            }

            on_write(&path);
            let file = File::create(&path).map_err(SymbolizeError::io(format!(
                "Failed to create symbol file {}",
                path.display()
            )))?;
            info!("writing {} ({} {})", path.display(), module.name, module.build_id);
            open = Some((StoredModule { module, path }, BufWriter::new(file)));
        }

        let Some((stored, out)) = open.as_mut() else {
            return Err(SymbolizeError::MissingModule);
        };
        out.write_all(&line).map_err(|source| SymbolizeError::Io {
            context: format!("Failed to write symbol file {}", stored.path.display()),
            source,
        })?;
    }

    match open {
        Some((stored, mut out)) => {
            out.flush().map_err(SymbolizeError::io(format!(
                "Failed to flush symbol file {}",
                stored.path.display()
            )))?;
            Ok(Some(stored))
        }
        None => {
            debug!("dump_syms produced no MODULE record for {}", binary.display());
            Ok(None)
        }
    }
}
