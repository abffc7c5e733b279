/// Request sequencing for server-backed lists
///
/// Every reload is stamped with a ticket from a monotonic counter. Only the
/// completion carrying the latest ticket may replace the list, so a slow
/// response can never overwrite a newer one.

use crate::error::GatewayError;

/// Sequence number identifying one logical request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Monotonic ticket source
#[derive(Debug, Default)]
pub struct Counter {
    last: u64,
}

impl Counter {
    pub fn next(&mut self) -> Ticket {
        self.last += 1;
        Ticket(self.last)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.last
    }
}

/// What a server-backed list currently holds
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    /// No reload has completed yet
    Pending,
    Ready(Vec<T>),
    /// The last reload failed; no stale items are kept
    Failed(String),
}

/// A list that is always replaced wholesale from the server
#[derive(Debug)]
pub struct Reloadable<T> {
    state: LoadState<T>,
    tickets: Counter,
    in_flight: bool,
}

impl<T> Default for Reloadable<T> {
    fn default() -> Self {
        Self {
            state: LoadState::Pending,
            tickets: Counter::default(),
            in_flight: false,
        }
    }
}

impl<T> Reloadable<T> {
    /// Issue the ticket for a new fetch. The current contents stay visible
    /// until the fetch completes.
    pub fn begin(&mut self) -> Ticket {
        self.in_flight = true;
        self.tickets.next()
    }

    /// Apply a fetch result. Returns false if a newer fetch was issued
    /// since, in which case the result is dropped.
    pub fn apply(&mut self, ticket: Ticket, result: Result<Vec<T>, GatewayError>) -> bool {
        if !self.tickets.is_current(ticket) {
            return false;
        }

        self.state = match result {
            Ok(items) => LoadState::Ready(items),
            Err(err) => LoadState::Failed(err.to_string()),
        };
        self.in_flight = false;
        true
    }

    /// Whether the latest issued fetch has not completed yet
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Whether `ticket` belongs to the latest issued fetch
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.tickets.is_current(ticket)
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    /// Items of the last successful reload (empty while pending or failed)
    pub fn items(&self) -> &[T] {
        match &self.state {
            LoadState::Ready(items) => items,
            _ => &[],
        }
    }

    pub fn items_mut(&mut self) -> &mut [T] {
        match &mut self.state {
            LoadState::Ready(items) => items,
            _ => &mut [],
        }
    }
}
