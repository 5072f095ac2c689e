//! Cancellation and deadlines for the result drain.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TryRecvError, at, bounded, never};

/// Signal that lets a caller stop a search before the service finishes.
///
/// Clones share the same signal: cancelling any clone wakes every drain
/// waiting on the token, now or later. A token may also carry a deadline,
/// measured from the moment it was created.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    /// Sole sender of the signal channel. Dropping it disconnects the
    /// channel, which every receiver observes on every `recv`.
    trigger: Arc<Mutex<Option<Sender<()>>>>,
    signal: Receiver<()>,
    timeout: Option<Duration>,
    deadline: Option<Instant>,
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    /// Token without a deadline; only [`Self::cancel`] ends the wait early.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    /// Token that also fires once `timeout` has elapsed, when one is given.
    ///
    /// A timeout too large to represent as an instant behaves as no deadline.
    #[must_use]
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        let (trigger, signal) = bounded(0);
        Self {
            trigger: Arc::new(Mutex::new(Some(trigger))),
            signal,
            timeout,
            deadline: timeout.and_then(|timeout| Instant::now().checked_add(timeout)),
        }
    }

    /// Requests cancellation. Repeated calls are harmless.
    pub fn cancel(&self) {
        let mut trigger = match self.trigger.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        trigger.take();
    }

    /// Whether cancellation has been requested. Stays true once set.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self.signal.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Configured timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Channel that becomes ready, permanently, once the token is cancelled.
    pub(crate) const fn signal(&self) -> &Receiver<()> {
        &self.signal
    }

    /// Channel that delivers once the deadline passes; never fires without one.
    pub(crate) fn deadline(&self) -> Receiver<Instant> {
        self.deadline.map_or_else(never, at)
    }
}
