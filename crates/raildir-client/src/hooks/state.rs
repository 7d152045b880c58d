//! Observable hook state guarded by a [`RequestSequence`].

use tokio::sync::watch;

use super::sequence::{RequestSequence, Ticket};

/// Progress of a hook's most recent operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// `data` / `loading` / `error` triple shared by the single-value hooks.
#[derive(Debug, Clone, PartialEq)]
pub struct Loadable<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Loadable<T> {
    /// Empty state, optionally already marked as loading.
    pub fn new(loading: bool) -> Self {
        Self {
            data: None,
            loading,
            error: None,
        }
    }

    #[must_use]
    pub fn status(&self) -> HookStatus {
        status(self.loading, self.error.is_some(), self.data.is_some())
    }
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self::new(false)
    }
}

pub(crate) fn status(loading: bool, failed: bool, has_data: bool) -> HookStatus {
    if loading {
        HookStatus::Loading
    } else if failed {
        HookStatus::Error
    } else if has_data {
        HookStatus::Success
    } else {
        HookStatus::Idle
    }
}

/// State cell of one hook instance.
///
/// Every mutation is published to subscribers. Results of an operation are
/// applied through [`HookState::settle`], which drops them unless the
/// operation is still the most recently started one.
#[derive(Debug)]
pub struct HookState<S> {
    tx: watch::Sender<S>,
    sequence: RequestSequence,
}

impl<S: Clone> HookState<S> {
    pub fn new(initial: S) -> Self {
        Self {
            tx: watch::Sender::new(initial),
            sequence: RequestSequence::new(),
        }
    }

    /// Starts an operation: applies `start` and issues its ticket.
    pub fn begin(&self, start: impl FnOnce(&mut S)) -> Ticket {
        let mut ticket = Ticket::default();
        self.tx.send_modify(|state| {
            ticket = self.sequence.next();
            start(state);
        });
        ticket
    }

    /// Applies `finish` if `ticket` is still the latest. Returns whether it
    /// was applied.
    pub fn settle(&self, ticket: Ticket, finish: impl FnOnce(&mut S)) -> bool {
        let applied = self.tx.send_if_modified(|state| {
            if !self.sequence.is_latest(ticket) {
                return false;
            }
            finish(state);
            true
        });
        if !applied {
            tracing::trace!(ticket = ticket.id(), "Discarding superseded result");
        }
        applied
    }

    /// Applies `reset` and supersedes every in-flight operation.
    pub fn reset(&self, reset: impl FnOnce(&mut S)) {
        self.tx.send_modify(|state| {
            self.sequence.invalidate();
            reset(state);
        });
    }

    /// Applies `update` unconditionally.
    pub fn update(&self, update: impl FnOnce(&mut S)) {
        self.tx.send_modify(update);
    }

    #[must_use]
    pub fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    /// Reads a projection of the current state without cloning all of it.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superseded_result_is_dropped() {
        let state = HookState::new(Loadable::<u32>::default());

        let first = state.begin(|s| s.loading = true);
        let second = state.begin(|s| s.loading = true);

        assert!(state.settle(second, |s| {
            s.loading = false;
            s.data = Some(2);
        }));
        assert!(!state.settle(first, |s| s.data = Some(1)));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.data, Some(2));
        assert_eq!(snapshot.status(), HookStatus::Success);
    }

    #[test]
    fn test_reset_drops_in_flight_result() {
        let state = HookState::new(Loadable::<u32>::default());
        let ticket = state.begin(|s| s.loading = true);

        state.reset(|s| *s = Loadable::default());

        assert!(!state.settle(ticket, |s| s.data = Some(1)));
        assert_eq!(state.snapshot().status(), HookStatus::Idle);
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let state = HookState::new(Loadable::<u32>::default());
        let mut rx = state.subscribe();

        state.begin(|s| s.loading = true);
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().loading);
    }

    #[test]
    fn test_error_status() {
        let mut loadable = Loadable::<u32>::new(true);
        assert_eq!(loadable.status(), HookStatus::Loading);

        loadable.loading = false;
        loadable.error = Some("boom".to_string());
        assert_eq!(loadable.status(), HookStatus::Error);
    }
}
