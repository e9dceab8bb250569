//! symbolize-core
//!
//! Core library for turning a non-stripped binary into a stored breakpad symbol file.
//!
//! This crate selects the platform-appropriate `dump_syms` executable, runs it, and
//! streams its output into `<symbol-dir>/<target>/<build-id>/<module>.sym` so a
//! symbol server can later look symbols up by (module, build id).
//!
//! All substantive logic lives here so it is testable without the CLI frontend.

pub mod dumper;
pub mod error;
pub mod layout;
pub mod module;
pub mod symbolizer;

pub use error::SymbolizeError;
pub use symbolizer::{store_symbols, symbolize, StoredModule, SymbolizeReport, SymbolizeRequest};

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
