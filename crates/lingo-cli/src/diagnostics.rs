//! Diagnostic reporting for CLI commands.
//!
//! Commands receive a [`Diagnostics`] implementation instead of logging
//! through globals, so tests can observe exactly what would have been logged.

use std::error::Error;
use std::path::Path;

use lingo_config::ServiceEndpoint;

use crate::search::StreamError;

/// Observer for events that are logged but never shown to the user.
pub trait Diagnostics: Send + Sync {
    /// Invoked once the query document has been read and the request is
    /// about to be sent.
    fn search_started(&self, endpoint: &ServiceEndpoint, query_path: &Path);

    /// Invoked for every error received while results stream in.
    fn stream_error(&self, error: &StreamError);

    /// Invoked when both channels have closed.
    fn search_completed(&self, results: usize, suppressed_errors: usize);

    /// Invoked when a command fails, before the user-facing message is
    /// printed.
    fn command_failed(&self, command: &str, error: &(dyn Error + 'static));
}

/// Default sink that records events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn search_started(&self, endpoint: &ServiceEndpoint, query_path: &Path) {
        tracing::debug!(
            target: "lingo::diagnostics",
            event = "search_started",
            endpoint = %endpoint,
            query = %query_path.display(),
            "sending search request"
        );
    }

    fn stream_error(&self, error: &StreamError) {
        tracing::debug!(
            target: "lingo::diagnostics",
            event = "stream_error",
            error = %error_summary(error),
            "skipping error received during search"
        );
    }

    fn search_completed(&self, results: usize, suppressed_errors: usize) {
        tracing::debug!(
            target: "lingo::diagnostics",
            event = "search_completed",
            results,
            suppressed_errors,
            "search stream closed"
        );
    }

    fn command_failed(&self, command: &str, error: &(dyn Error + 'static)) {
        tracing::debug!(
            target: "lingo::diagnostics",
            event = "command_failed",
            command,
            error_chain = %error_chain(error),
            "command failed"
        );
    }
}

/// An error followed by each of its sources, outermost first.
fn causes<'a>(error: &'a (dyn Error + 'static)) -> impl Iterator<Item = &'a (dyn Error + 'static)> {
    std::iter::successors(Some(error), |&current| current.source())
}

/// Joins an error and all of its sources, one per line.
pub(crate) fn error_chain(error: &(dyn Error + 'static)) -> String {
    join_causes(error, "\n  caused by: ")
}

/// Joins an error and all of its sources on a single line.
pub(crate) fn error_summary(error: &(dyn Error + 'static)) -> String {
    join_causes(error, ": ")
}

fn join_causes(error: &(dyn Error + 'static), separator: &str) -> String {
    causes(error)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::io;
    use std::sync::Mutex;

    /// Captures diagnostic events for assertions.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingDiagnostics {
        started: Mutex<Vec<String>>,
        stream_errors: Mutex<Vec<String>>,
        completions: Mutex<Vec<(usize, usize)>>,
        failures: Mutex<Vec<(String, String)>>,
    }

    impl RecordingDiagnostics {
        pub(crate) fn started(&self) -> Vec<String> {
            self.started.lock().map(|v| v.clone()).unwrap_or_default()
        }

        pub(crate) fn stream_errors(&self) -> Vec<String> {
            self.stream_errors
                .lock()
                .map(|v| v.clone())
                .unwrap_or_default()
        }

        pub(crate) fn completions(&self) -> Vec<(usize, usize)> {
            self.completions
                .lock()
                .map(|v| v.clone())
                .unwrap_or_default()
        }

        pub(crate) fn failures(&self) -> Vec<(String, String)> {
            self.failures.lock().map(|v| v.clone()).unwrap_or_default()
        }
    }

    impl Diagnostics for RecordingDiagnostics {
        fn search_started(&self, endpoint: &ServiceEndpoint, query_path: &Path) {
            if let Ok(mut started) = self.started.lock() {
                started.push(format!("{endpoint} {}", query_path.display()));
            }
        }

        fn stream_error(&self, error: &StreamError) {
            if let Ok(mut errors) = self.stream_errors.lock() {
                errors.push(error.to_string());
            }
        }

        fn search_completed(&self, results: usize, suppressed_errors: usize) {
            if let Ok(mut completions) = self.completions.lock() {
                completions.push((results, suppressed_errors));
            }
        }

        fn command_failed(&self, command: &str, error: &(dyn Error + 'static)) {
            if let Ok(mut failures) = self.failures.lock() {
                failures.push((command.to_owned(), error_chain(error)));
            }
        }
    }

    #[test]
    fn error_chain_lists_every_source_once() {
        let error = StreamError::Transport {
            source: io::Error::new(io::ErrorKind::ConnectionReset, "peer reset"),
        };
        let chain = error_chain(&error);
        assert_eq!(
            chain,
            "failed to read from flow service\n  caused by: peer reset"
        );
    }

    #[test]
    fn error_summary_keeps_the_cause_on_one_line() {
        let error = StreamError::Transport {
            source: io::Error::new(io::ErrorKind::ConnectionReset, "peer reset"),
        };
        assert_eq!(
            error_summary(&error),
            "failed to read from flow service: peer reset"
        );
    }
}
