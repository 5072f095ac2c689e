//! Command-line grammar for the `lingo` binary.
//!
//! Configuration flags are stripped before these definitions are parsed, so
//! only command tokens appear here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lingo_config::AuthKey;

use crate::output::FactFormat;

#[derive(Debug, Parser)]
#[command(
    name = "lingo",
    about = "Search code with CodeLingo queries and inspect lexicon facts",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum CliCommand {
    /// Run a .lingo query against the flow service.
    Search(SearchArgs),
    /// Show the documentation of a lexicon fact.
    DescribeFact(DescribeFactArgs),
    /// Manage stored credentials.
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

impl CliCommand {
    pub(crate) const fn name(&self) -> &'static str {
        match self {
            Self::Search(_) => "search",
            Self::DescribeFact(_) => "describe-fact",
            Self::Auth { .. } => "auth",
        }
    }
}

#[derive(Debug, Clone, Args)]
pub(crate) struct SearchArgs {
    /// Path to the .lingo query file.
    pub(crate) query: PathBuf,
    /// Result encoding: json or json-pretty.
    #[arg(long, short = 'f', default_value = "json-pretty")]
    pub(crate) format: String,
    /// Write results to this file instead of stdout.
    #[arg(long, short = 'o', default_value = "")]
    pub(crate) output: String,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct DescribeFactArgs {
    /// Fact to describe, as <owner>/<lexicon>/<fact>.
    pub(crate) fact: String,
    /// Presentation of the description.
    #[arg(long, short = 'f', value_enum, default_value_t = FactFormat::List)]
    pub(crate) format: FactFormat,
    /// Write the description to this file instead of stdout.
    #[arg(long, short = 'o', default_value = "")]
    pub(crate) output: String,
    /// Lexicon version; the latest release when omitted.
    #[arg(long = "version", id = "lexicon_version")]
    pub(crate) lexicon_version: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
pub(crate) enum AuthAction {
    /// Create the credentials file from the built-in template.
    Init {
        /// Replace an existing file.
        #[arg(long)]
        overwrite: bool,
    },
    /// Print every stored value for the active environment.
    Dump,
    /// Print one stored value.
    Get {
        #[arg(value_enum)]
        key: AuthKey,
    },
    /// Store a value.
    Set {
        #[arg(value_enum)]
        key: AuthKey,
        value: String,
    },
}
