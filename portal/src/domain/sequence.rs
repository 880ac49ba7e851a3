//! Generation counters for discarding stale responses.
//!
//! A view that re-fetches (a filter change, a page flip) issues a new ticket
//! per request. When responses arrive out of order, only the one holding the
//! newest ticket is applied; earlier ones are dropped on purpose.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

/// Sequence number issued for one request of a logical operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    /// Raw sequence number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Monotonic ticket source for one logical operation.
///
/// # Examples
/// ```
/// use portal::domain::RequestSequencer;
///
/// let seq = RequestSequencer::new();
/// let first = seq.issue();
/// let second = seq.issue();
/// assert_eq!(seq.accept(first, "old"), None);
/// assert_eq!(seq.accept(second, "new"), Some("new"));
/// ```
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    /// Start with no tickets issued.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
        }
    }

    /// Issue a ticket that supersedes every earlier one.
    pub fn issue(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether `ticket` is still the newest.
    #[must_use]
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Keep `value` only if `ticket` is still the newest.
    pub fn accept<T>(&self, ticket: RequestTicket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            debug!(ticket = ticket.0, "discarding stale response");
            None
        }
    }

    /// Make every outstanding ticket stale, as when the consumer goes away.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }

    /// Issue a ticket, await `request`, and keep the result only if no newer
    /// request was issued meanwhile.
    pub async fn run<F, T>(&self, request: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let ticket = self.issue();
        let value = request.await;
        self.accept(ticket, value)
    }
}
