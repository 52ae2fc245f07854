//! Latest-request-wins bookkeeping
//!
//! A client that re-triggers a prediction (new location, refresh) supersedes
//! its earlier request. Results of superseded requests are dropped so a slow
//! early response can never overwrite a faster later one.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Identifies one in-flight request of a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    client: String,
    id: u64,
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    next_id: AtomicU64,
    latest: Mutex<HashMap<String, u64>>,
}

impl RequestSequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `client`, superseding any earlier one
    pub fn begin(&self, client: &str) -> RequestTicket {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        latest.insert(client.to_string(), id);
        RequestTicket {
            client: client.to_string(),
            id,
        }
    }

    /// Whether no later request has been started for the ticket's client
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        let latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        latest.get(&ticket.client) == Some(&ticket.id)
    }

    /// Hand back `value` only if the ticket is still current. The client's
    /// entry is released once its latest request completes.
    pub fn complete<T>(&self, ticket: RequestTicket, value: T) -> Option<T> {
        let current = self.is_current(&ticket);
        self.release(&ticket);
        if current {
            Some(value)
        } else {
            debug!("Discarding superseded result for client {}", ticket.client);
            None
        }
    }

    /// Forget the client's entry if it still belongs to `ticket`
    fn release(&self, ticket: &RequestTicket) {
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        if latest.get(&ticket.client) == Some(&ticket.id) {
            latest.remove(&ticket.client);
        }
    }

    /// Number of clients with a request in flight
    pub fn in_flight(&self) -> usize {
        self.latest.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Run `fut` as the latest request of `client`; `None` if it was superseded
    /// before finishing. Dropping the returned future releases the client.
    pub async fn run<F, T>(&self, client: &str, fut: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let guard = InFlight {
            sequencer: self,
            ticket: self.begin(client),
        };
        let value = fut.await;
        let current = self.is_current(&guard.ticket);
        drop(guard);
        if current {
            Some(value)
        } else {
            debug!("Discarding superseded result for client {client}");
            None
        }
    }
}

/// Releases the ticket when the request finishes or is cancelled
struct InFlight<'a> {
    sequencer: &'a RequestSequencer,
    ticket: RequestTicket,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.sequencer.release(&self.ticket);
    }
}
