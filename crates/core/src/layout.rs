use std::path::{Path, PathBuf};

use crate::dumper::DumperKind;
use crate::module::SymbolTarget;

/// Name of the default symbol store directory inside the install directory.
pub const DEFAULT_SYMBOLS_DIR: &str = "symbols";

/// Logical layout of an installed `symbolize` tree.
///
/// Derived from the directory the tool is installed in. It does *not* perform any IO;
/// missing dumpers are reported when the spawn fails.
#[derive(Debug, Clone)]
pub struct InstallLayout {
    /// `dump_syms` built for Windows (PE/DWARF) targets.
    pub windows_dumper: PathBuf,
    /// `dump_syms` built for Linux and NaCl targets.
    pub linux_dumper: PathBuf,
    /// Symbol store used when none is given on the command line.
    pub default_symbol_dir: PathBuf,
}

impl InstallLayout {
    /// Compute the layout for a tool installed at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let windows_dumper = root.join(DumperKind::Windows.relative_path());
        let linux_dumper = root.join(DumperKind::Linux.relative_path());
        let default_symbol_dir = root.join(DEFAULT_SYMBOLS_DIR);

        Self { windows_dumper, linux_dumper, default_symbol_dir }
    }

    /// Path of the dumper executable for the given kind.
    pub fn dumper_path(&self, kind: DumperKind) -> &Path {
        match kind {
            DumperKind::Windows => &self.windows_dumper,
            DumperKind::Linux => &self.linux_dumper,
        }
    }
}

/// Layout of a symbol store: `<root>/<target>/<build-id>/<module>.sym`.
#[derive(Debug, Clone)]
pub struct SymbolLayout {
    pub root: PathBuf,
}

impl SymbolLayout {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    /// Directory holding every build of `target`.
    pub fn target_dir(&self, target: &SymbolTarget) -> PathBuf {
        self.root.join(&target.dir_name)
    }

    /// Full path of the `.sym` file for one build of `target`.
    pub fn symbol_file_path(&self, target: &SymbolTarget, build_id: &str) -> PathBuf {
        self.target_dir(target).join(build_id).join(format!("{}.sym", target.file_stem))
    }
}
