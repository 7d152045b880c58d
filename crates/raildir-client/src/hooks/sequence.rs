//! Request sequencing for last-request-wins state updates.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one issued request of a hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Monotonic counter handing out [`Ticket`]s.
///
/// A result may be applied only while its ticket is still the latest one
/// issued; anything older has been superseded.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new ticket, superseding every earlier one.
    pub fn next(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Supersedes every ticket issued so far without issuing a new one to
    /// a caller.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }

    #[must_use]
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_ticket_is_current() {
        let sequence = RequestSequence::new();
        let a = sequence.next();
        let b = sequence.next();

        assert!(!sequence.is_latest(a));
        assert!(sequence.is_latest(b));
        assert!(a < b);
    }

    #[test]
    fn test_invalidate_supersedes_outstanding_ticket() {
        let sequence = RequestSequence::new();
        let ticket = sequence.next();
        sequence.invalidate();

        assert!(!sequence.is_latest(ticket));
    }
}
