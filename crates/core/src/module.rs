//! Breakpad `MODULE` header records.
//!
//! `dump_syms` starts every module with a line of the form
//! `MODULE <os> <arch> <build-id> <name>`. Everything needed to place the symbol
//! file in the store comes from that one line.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SymbolizeError;

/// Prefix that marks the start of a module in `dump_syms` output.
pub const MODULE_MARKER: &[u8] = b"MODULE";

/// Declared module names with this suffix are NaCl executables.
pub const NACL_SUFFIX: &str = ".nexe";

/// Name NaCl modules are stored under, whatever the input file was called.
pub const NACL_MODULE_NAME: &str = "main.nexe";

/// Returns true if `line` opens a new module.
pub fn is_module_header(line: &[u8]) -> bool {
    line.starts_with(MODULE_MARKER)
}

fn is_field_separator(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0b' | b'\x0c')
}

/// Parsed `MODULE` header line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub os: String,
    pub arch: String,
    /// Hex build identifier (field 3).
    pub build_id: String,
    /// Module name as declared by the dumper (field 4).
    pub name: String,
}

/// Where a module's symbol file goes inside the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTarget {
    /// Directory directly under the store root.
    pub dir_name: String,
    /// File name of the `.sym` file, without the extension.
    pub file_stem: String,
}

impl ModuleRecord {
    /// Parse a `MODULE` header line. Fields are separated by runs of ASCII whitespace,
    /// vertical tab included, and the trailing newline, if any, is ignored.
    pub fn parse(line: &[u8]) -> Result<Self, SymbolizeError> {
        let fields: Vec<&[u8]> =
            line.split(|&b| is_field_separator(b)).filter(|f| !f.is_empty()).collect();
        if fields.len() < 5 {
            return Err(SymbolizeError::MalformedModule(format!(
                "expected at least 5 fields, found {} in {:?}",
                fields.len(),
                String::from_utf8_lossy(line).trim_end()
            )));
        }

        let utf8_field = |idx: usize, label: &str| {
            std::str::from_utf8(fields[idx]).map(str::to_string).map_err(|_| {
                SymbolizeError::MalformedModule(format!("{label} is not valid UTF-8"))
            })
        };

        Ok(Self {
            os: String::from_utf8_lossy(fields[1]).into_owned(),
            arch: String::from_utf8_lossy(fields[2]).into_owned(),
            build_id: utf8_field(3, "build id")?,
            name: utf8_field(4, "module name")?,
        })
    }

    /// An id made only of `0` digits means the binary was linked without a build id.
    pub fn has_build_id(&self) -> bool {
        !self.build_id.bytes().all(|b| b == b'0')
    }

    pub fn is_nacl(&self) -> bool {
        self.name.ends_with(NACL_SUFFIX)
    }

    /// Resolve the store location for this module when dumped from `binary`.
    ///
    /// NaCl modules always land in `main.nexe/<id>/main.nexe.sym`. Every other module
    /// is filed under the input binary's base file name and keeps its declared name.
    pub fn target(&self, binary: &Path) -> Result<SymbolTarget, SymbolizeError> {
        if self.is_nacl() {
            return Ok(SymbolTarget {
                dir_name: NACL_MODULE_NAME.to_string(),
                file_stem: NACL_MODULE_NAME.to_string(),
            });
        }

        let dir_name = binary
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| SymbolizeError::MissingBinary(binary.to_path_buf()))?;
        Ok(SymbolTarget { dir_name, file_stem: self.name.clone() })
    }
}

