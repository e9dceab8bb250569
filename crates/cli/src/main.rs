use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use symbolize::commands::symbolize_command;
use symbolize::exit_code_for;

/// Generate debug symbols and store them in the symbol server directory structure.
///
/// Runs the platform-appropriate `dump_syms` on the binary and writes its output to
/// `<symbol-directory>/<binary-name>/<build-id>/<module-name>.sym`. The exit status is
/// the dumper's own, so the tool can be chained in build scripts.
#[derive(Parser, Debug)]
#[command(
    name = "symbolize",
    version,
    about = "Generate debug symbols and store in required directory structure",
    long_about = None
)]
struct Cli {
    /// Non-stripped Linux, Windows, or NaCl binary.
    binary: PathBuf,

    /// Where to store output. Defaults to `symbols` next to the installed tool.
    #[arg(short = 's', long = "symbol-directory")]
    symbol_directory: Option<PathBuf>,

    /// Emit a JSON report instead of human-readable progress.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();

    let report = symbolize_command(&cli.binary, cli.symbol_directory.as_deref(), cli.json)?;

    Ok(exit_code_for(report.exit_code))
}
