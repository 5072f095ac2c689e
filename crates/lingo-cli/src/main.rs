//! CLI entrypoint for the lingo code search client.
//!
//! The binary delegates to [`lingo_cli::run`], which loads configuration,
//! parses the command line, and talks to the configured flow service.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    lingo_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
