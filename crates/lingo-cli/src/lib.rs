//! Command-line runtime for the lingo code search client.
//!
//! The module owns argument parsing, configuration bootstrapping and command
//! dispatch. Commands talk to the flow service through [`service`] and hand
//! their results to [`output`] for rendering. The runtime can be driven from
//! the binary or from tests with substituted configuration and IO streams.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use lingo_config::Config;

mod auth;
mod cli;
mod config;
mod diagnostics;
mod errors;
mod facts;
pub mod output;
pub mod search;
mod service;
mod telemetry;
mod transport;

#[cfg(test)]
mod tests;

use cli::{Cli, CliCommand};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
use config::split_config_arguments;
use diagnostics::error_summary;
pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub(crate) use errors::AppError;
use service::SocketFlowService;
pub use telemetry::TelemetryError;

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }
}

struct CliRunner<'a, W: Write, E: Write, L: ConfigLoader> {
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a, W, E, L> CliRunner<'a, W, E, L>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    fn new(io: &'a mut IoStreams<'a, W, E>, loader: &'a L, diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            io,
            loader,
            diagnostics,
        }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);

        let cli = match Cli::try_parse_from(split.command_arguments(&args)) {
            Ok(cli) => cli,
            Err(error) => return self.report_usage(error),
        };
        let command = cli.command.name();

        let outcome = self
            .loader
            .load(&split.config_arguments)
            .and_then(|config| {
                telemetry::initialise(&config)?;
                self.dispatch(&cli.command, &config)
            });

        match outcome {
            Ok(message) => self.print(&message),
            Err(error) => {
                self.diagnostics.command_failed(command, &error);
                let _ = writeln!(self.io.stderr, "{}", error_summary(&error));
                ExitCode::FAILURE
            }
        }
    }

    fn dispatch(&self, command: &CliCommand, config: &Config) -> Result<String, AppError> {
        let service = SocketFlowService::new(config.service_endpoint());
        match command {
            CliCommand::Search(args) => {
                search::run_search(args, config, &service, self.diagnostics)
            }
            CliCommand::DescribeFact(args) => facts::run_describe_fact(args, &service),
            CliCommand::Auth { action } => auth::run_auth(action, config),
        }
    }

    fn print(&mut self, message: &str) -> ExitCode {
        let written = if message.is_empty() || message.ends_with('\n') {
            self.io.stdout.write_all(message.as_bytes())
        } else {
            writeln!(self.io.stdout, "{message}")
        };
        match written.and_then(|()| self.io.stdout.flush()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                let error = AppError::WriteOutput(error);
                self.diagnostics.command_failed("output", &error);
                let _ = writeln!(self.io.stderr, "{}", error_summary(&error));
                ExitCode::FAILURE
            }
        }
    }

    /// Help and version requests succeed on stdout; real usage errors fail on
    /// stderr.
    fn report_usage(&mut self, error: clap::Error) -> ExitCode {
        match error.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = write!(self.io.stdout, "{}", error.render());
                ExitCode::SUCCESS
            }
            _ => {
                let error = AppError::CliUsage(error);
                let _ = write!(self.io.stderr, "{error}");
                ExitCode::FAILURE
            }
        }
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader, &TracingDiagnostics)
}

/// Runs the CLI with a custom configuration loader and diagnostics sink.
#[must_use]
pub(crate) fn run_with_loader<'a, I, W, E, L>(
    args: I,
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
    diagnostics: &'a dyn Diagnostics,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader, diagnostics).run(args)
}
