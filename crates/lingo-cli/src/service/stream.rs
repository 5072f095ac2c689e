//! Splits a search connection into result and error channels.

use std::io::{self, BufRead, BufReader};
use std::thread;

use crossbeam_channel::{Sender, unbounded};
use lingo_service_types::{EventChannel, SearchResult, ServiceEvent};

use crate::search::{ResultChannels, StreamError};
use crate::transport::Connection;

/// A running search: the two channels plus ownership of the socket.
///
/// Dropping the stream shuts the socket down so the reader thread ends even
/// when the drain stopped early.
#[derive(Debug)]
pub(crate) struct SearchStream {
    channels: ResultChannels,
    connection: Connection,
}

impl SearchStream {
    pub(crate) const fn channels(&self) -> &ResultChannels {
        &self.channels
    }
}

impl Drop for SearchStream {
    fn drop(&mut self) {
        // The peer may already have closed; nothing to report.
        let _ = self.connection.shutdown();
    }
}

/// Spawns the reader thread for `connection` and returns the stream handle.
pub(crate) fn spawn_search_stream(connection: Connection) -> io::Result<SearchStream> {
    let reader = connection.try_clone()?;
    let (result_tx, results) = unbounded();
    let (error_tx, errors) = unbounded();
    thread::Builder::new()
        .name(String::from("lingo-search-reader"))
        .spawn(move || demultiplex(reader, result_tx, error_tx))?;
    Ok(SearchStream {
        channels: ResultChannels { results, errors },
        connection,
    })
}

/// Forwards events from `reader` until EOF, a transport failure, or both
/// channels have been closed by the service or abandoned by the receiver.
pub(crate) fn demultiplex<R>(
    reader: R,
    result_tx: Sender<SearchResult>,
    error_tx: Sender<StreamError>,
) where
    R: io::Read,
{
    let mut results = Some(result_tx);
    let mut errors = Some(error_tx);
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    while results.is_some() || errors.is_some() {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(source) => {
                forward_error(&mut errors, StreamError::Transport { source });
                break;
            }
        }
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<ServiceEvent>(&line) {
            Ok(ServiceEvent::Result { result }) => {
                if let Some(sender) = &results
                    && sender.send(result).is_err()
                {
                    results = None;
                }
            }
            Ok(ServiceEvent::Error { message }) => {
                forward_error(&mut errors, StreamError::Service(message));
            }
            Ok(ServiceEvent::Close {
                channel: EventChannel::Results,
            }) => results = None,
            Ok(ServiceEvent::Close {
                channel: EventChannel::Errors,
            }) => errors = None,
            Ok(ServiceEvent::FactDescription { .. }) => {
                forward_error(
                    &mut errors,
                    StreamError::Service(String::from(
                        "unexpected fact description in search stream",
                    )),
                );
            }
            Err(source) => forward_error(&mut errors, StreamError::Malformed { source }),
        }
    }
}

fn forward_error(errors: &mut Option<Sender<StreamError>>, error: StreamError) {
    if let Some(sender) = errors.as_ref()
        && sender.send(error).is_err()
    {
        *errors = None;
    }
}
