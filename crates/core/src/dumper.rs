use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::SymbolizeError;

/// Which `dump_syms` build handles a binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DumperKind {
    /// PE/DWARF binaries, selected by an `.exe` suffix.
    Windows,
    /// ELF binaries, including NaCl `.nexe` modules.
    Linux,
}

impl DumperKind {
    /// Pick the dumper from the binary path's suffix alone.
    pub fn for_binary(binary: &Path) -> Self {
        if binary.as_os_str().to_string_lossy().ends_with(".exe") {
            DumperKind::Windows
        } else {
            DumperKind::Linux
        }
    }

    /// Location of the dumper relative to the install directory.
    pub fn relative_path(self) -> PathBuf {
        let parts: &[&str] = match self {
            DumperKind::Windows => &["src", "tools", "windows", "dump_syms_dwarf", "dump_syms"],
            DumperKind::Linux => &["src", "tools", "linux", "dump_syms", "dump_syms"],
        };
        parts.iter().collect()
    }
}

/// Running `dump_syms` child.
///
/// The child is killed and reaped when this guard is dropped, unless it has
/// already exited.
#[derive(Debug)]
pub struct DumperProcess {
    child: Child,
    path: PathBuf,
}

impl DumperProcess {
    /// Start `<dumper> <binary>` with no stdin and stdout captured.
    pub fn spawn(dumper: &Path, binary: &Path) -> Result<Self, SymbolizeError> {
        debug!("spawning {} {}", dumper.display(), binary.display());
        let child = Command::new(dumper)
            .arg(binary)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => SymbolizeError::MissingDumper(dumper.to_path_buf()),
                _ => SymbolizeError::Io {
                    context: format!("Failed to spawn {}", dumper.display()),
                    source: e,
                },
            })?;
        Ok(Self { child, path: dumper.to_path_buf() })
    }

    /// Take the child's stdout as a line stream. Can only be taken once.
    pub fn lines(&mut self) -> Result<DumperLines<BufReader<ChildStdout>>, SymbolizeError> {
        let stdout = self.child.stdout.take().ok_or_else(|| SymbolizeError::Io {
            context: format!("stdout of {} was already taken", self.path.display()),
            source: io::Error::new(io::ErrorKind::BrokenPipe, "stdout not captured"),
        })?;
        Ok(DumperLines::new(BufReader::new(stdout)))
    }

    pub fn wait(&mut self) -> Result<ExitStatus, SymbolizeError> {
        self.child
            .wait()
            .map_err(SymbolizeError::io(format!("Failed to wait for {}", self.path.display())))
    }
}

impl Drop for DumperProcess {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            debug!("terminating {} (pid {})", self.path.display(), self.child.id());
            if let Err(e) = self.child.kill() {
                warn!("failed to terminate {}: {e}", self.path.display());
            }
            let _ = self.child.wait();
        }
    }
}

/// Lines of dumper output, each including its trailing `\n` when present.
///
/// No decoding happens; the bytes are passed through exactly as read.
pub struct DumperLines<R> {
    reader: R,
}

impl<R: BufRead> DumperLines<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Iterator for DumperLines<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line) {
            Ok(0) => None,
            Ok(_) => Some(Ok(line)),
            Err(e) => Some(Err(e)),
        }
    }
}
