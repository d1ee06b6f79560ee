//! Generation counters for "only the latest one counts" bookkeeping
//!
//! Timers in the browser build are held in single slots and cancelled when
//! replaced, but a callback can already be queued by the time its timer is
//! dropped. Every scheduled action therefore carries a [`Ticket`], and only
//! the ticket of the most recent schedule is honoured.

/// Handle to one scheduled action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct Generation {
    current: u64,
}

impl Generation {
    /// Start a new generation, invalidating every earlier ticket
    pub fn advance(&mut self) -> Ticket {
        self.current = self.current.wrapping_add(1);
        Ticket(self.current)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.current
    }

    pub fn invalidate(&mut self) {
        self.advance();
    }
}

/// A value waiting for its debounce delay to pass
#[derive(Debug)]
pub struct Debounce<T> {
    generation: Generation,
    pending: Option<T>,
}

impl<T> Default for Debounce<T> {
    fn default() -> Self {
        Self {
            generation: Generation::default(),
            pending: None,
        }
    }
}

impl<T> Debounce<T> {
    /// Replace whatever is pending with `value`
    pub fn schedule(&mut self, value: T) -> Ticket {
        self.pending = Some(value);
        self.generation.advance()
    }

    /// Take the pending value if `ticket` is still the latest schedule
    pub fn fire(&mut self, ticket: Ticket) -> Option<T> {
        if self.generation.is_current(ticket) {
            self.pending.take()
        } else {
            None
        }
    }
}
