use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SymbolizeError {
    #[error("Binary doesn't exist: {}", .0.display())]
    MissingBinary(PathBuf),
    #[error("Symbol directory doesn't exist: {}", .0.display())]
    MissingSymbolDir(PathBuf),
    #[error("You need to build the dump_syms binary {}", .0.display())]
    MissingDumper(PathBuf),
    #[error("Binary lacks build id")]
    MissingBuildId,
    #[error("Malformed MODULE record: {0}")]
    MalformedModule(String),
    /// Binaries containing more than one module are not supported.
    #[error("dump_syms emitted a second MODULE record while writing {}", .0.display())]
    MultipleModules(PathBuf),
    #[error("dump_syms emitted symbol data before any MODULE record")]
    MissingModule,
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl SymbolizeError {
    /// Build a closure for `map_err` that wraps an I/O error with a message.
    pub(crate) fn io(context: impl Into<String>) -> impl FnOnce(io::Error) -> Self {
        let context = context.into();
        move |source| SymbolizeError::Io { context, source }
    }
}
