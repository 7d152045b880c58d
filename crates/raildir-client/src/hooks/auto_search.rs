//! Debounced search-as-you-type on top of [`ContactsSearch`].

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::AbortHandle;

use super::search::ContactsSearch;

#[derive(Default)]
struct Pending {
    generation: u64,
    timer: Option<AbortHandle>,
}

struct Inner {
    search: ContactsSearch,
    quiet: Duration,
    pending: Mutex<Pending>,
    last_searched: Mutex<Option<String>>,
}

/// Runs a name search once the input has been stable for the quiet period.
///
/// * Each new value cancels the pending timer and starts a fresh one.
/// * A value equal to the last one actually searched is not searched again.
/// * Nothing is searched while the underlying search is still loading.
/// * A blank value clears the results immediately without a request and
///   forgets the last searched value.
///
/// Constructing an `AutoSearch` never issues a request.
#[derive(Clone)]
pub struct AutoSearch {
    inner: Arc<Inner>,
}

impl AutoSearch {
    pub fn new(search: ContactsSearch, quiet: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                search,
                quiet,
                pending: Mutex::new(Pending::default()),
                last_searched: Mutex::new(None),
            }),
        }
    }

    /// The search whose state this instance drives.
    #[must_use]
    pub fn search(&self) -> &ContactsSearch {
        &self.inner.search
    }

    #[must_use]
    pub fn quiet_period(&self) -> Duration {
        self.inner.quiet
    }

    /// Feeds the current input value.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn set_value(&self, value: &str) {
        let value = value.trim().to_string();

        let generation = {
            let mut pending = self.inner.pending.lock();
            if let Some(timer) = pending.timer.take() {
                timer.abort();
            }
            pending.generation += 1;
            pending.generation
        };

        if value.is_empty() {
            *self.inner.last_searched.lock() = None;
            self.inner.search.clear_results();
            tracing::debug!("Search input cleared");
            return;
        }

        let quiet = self.inner.quiet;
        let inner = Arc::downgrade(&self.inner);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            if let Some(inner) = inner.upgrade() {
                inner.fire(generation, value);
            }
        });

        let mut pending = self.inner.pending.lock();
        if pending.generation == generation {
            pending.timer = Some(timer.abort_handle());
        }
    }

    /// Cancels the pending timer, if any.
    pub fn cancel(&self) {
        let mut pending = self.inner.pending.lock();
        pending.generation += 1;
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
    }

    /// The value most recently sent to the backend.
    #[must_use]
    pub fn last_searched(&self) -> Option<String> {
        self.inner.last_searched.lock().clone()
    }
}

impl Inner {
    fn fire(&self, generation: u64, value: String) {
        {
            let mut pending = self.pending.lock();
            if pending.generation != generation {
                return;
            }
            pending.timer = None;
        }

        {
            let mut last = self.last_searched.lock();
            if last.as_deref() == Some(value.as_str()) {
                tracing::trace!(%value, "Skipping repeated search");
                return;
            }
            if self.search.is_loading() {
                tracing::trace!(%value, "Skipping search while another is loading");
                return;
            }
            *last = Some(value.clone());
        }

        // The search runs detached from the timer so a later abort cannot
        // cut a request short.
        let search = self.search.clone();
        tokio::spawn(async move {
            search.search_by_name(&value, 1).await;
        });
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(timer) = self.pending.get_mut().timer.take() {
            timer.abort();
        }
    }
}
