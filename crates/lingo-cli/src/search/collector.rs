//! Drains a search's result and error channels into an ordered sequence.

use std::io;
use std::time::Duration;

use crossbeam_channel::{Receiver, never, select};
use lingo_service_types::SearchResult;
use thiserror::Error;

use super::cancel::CancellationToken;
use crate::diagnostics::Diagnostics;

/// A non-fatal problem observed while a search streams.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The service reported an error for part of the query.
    #[error("flow service error: {0}")]
    Service(String),
    /// A response line could not be decoded.
    #[error("failed to decode service event")]
    Malformed {
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// Reading from the connection failed; no further events will arrive.
    #[error("failed to read from flow service")]
    Transport {
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },
}

/// Receiving halves of one search's two logical channels.
///
/// Each channel is closed independently when its sender is dropped.
#[derive(Debug)]
pub struct ResultChannels {
    /// Matches in the order the service produced them.
    pub results: Receiver<SearchResult>,
    /// Errors raised while the search ran.
    pub errors: Receiver<StreamError>,
}

/// Reasons a drain stops before both channels close.
#[derive(Debug, Error)]
pub enum CollectError {
    /// The caller cancelled the search.
    #[error("search cancelled after receiving {received} results")]
    Cancelled {
        /// Results received before cancellation.
        received: usize,
    },
    /// The configured deadline passed.
    #[error("search timed out after {timeout:?} with {received} results received")]
    DeadlineElapsed {
        /// Configured timeout.
        timeout: Duration,
        /// Results received before the deadline.
        received: usize,
    },
}

/// Waits on both channels until each has closed and returns every result in
/// arrival order.
///
/// Errors are handed to `diagnostics` and never end the drain. The wait ends
/// early only when `cancellation` fires, in which case nothing collected so
/// far is returned.
///
/// # Errors
///
/// Returns [`CollectError`] when the token is cancelled or its deadline
/// elapses before both channels close.
pub fn collect_results(
    channels: &ResultChannels,
    cancellation: &CancellationToken,
    diagnostics: &dyn Diagnostics,
) -> Result<Vec<SearchResult>, CollectError> {
    let closed_results = never::<SearchResult>();
    let closed_errors = never::<StreamError>();
    let deadline = cancellation.deadline();

    let mut results_open = true;
    let mut errors_open = true;
    let mut collected = Vec::new();
    let mut suppressed = 0usize;

    while results_open || errors_open {
        let results = if results_open {
            &channels.results
        } else {
            &closed_results
        };
        let errors = if errors_open {
            &channels.errors
        } else {
            &closed_errors
        };

        select! {
            recv(results) -> message => match message {
                Ok(result) => collected.push(result),
                Err(_) => results_open = false,
            },
            recv(errors) -> message => match message {
                Ok(error) => {
                    suppressed += 1;
                    diagnostics.stream_error(&error);
                }
                Err(_) => errors_open = false,
            },
            recv(cancellation.signal()) -> _ => {
                return Err(CollectError::Cancelled {
                    received: collected.len(),
                });
            }
            recv(deadline) -> _ => {
                return Err(CollectError::DeadlineElapsed {
                    timeout: cancellation.timeout().unwrap_or_default(),
                    received: collected.len(),
                });
            }
        }
    }

    diagnostics.search_completed(collected.len(), suppressed);
    Ok(collected)
}
