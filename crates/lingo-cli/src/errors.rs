//! Error types for the CLI runtime.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use lingo_config::{AuthError, ConfigHomeError};
use thiserror::Error;

use crate::output::OutputError;
use crate::search::CollectError;
use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("failed to initialise logging")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to read query file {path}", path = path.display())]
    ReadQuery {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to resolve flow service address {endpoint}")]
    Resolve {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to connect to flow service at {endpoint}")]
    Connect {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    #[cfg(not(unix))]
    #[error("platform does not support Unix sockets: {0}")]
    UnsupportedUnixTransport(String),
    #[error("failed to send request to flow service")]
    SendRequest(#[source] io::Error),
    #[error("failed to start reading search results")]
    StartStream(#[source] io::Error),
    #[error("failed to read response from flow service")]
    ReadResponse(#[source] io::Error),
    #[error("failed to parse flow service message")]
    ParseMessage(#[source] serde_json::Error),
    #[error("flow service sent an unexpected {0} event")]
    UnexpectedEvent(&'static str),
    #[error("flow service error: {0}")]
    Service(String),
    #[error("flow service closed the connection without replying")]
    MissingResponse,
    #[error(transparent)]
    Collect(#[from] CollectError),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("invalid fact path {0:?}: expected <owner>/<lexicon>/<fact>, e.g. codelingo/go/func_decl")]
    InvalidFactPath(String),
    #[error(transparent)]
    ConfigHome(#[from] ConfigHomeError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("failed to write output")]
    WriteOutput(#[source] io::Error),
}
