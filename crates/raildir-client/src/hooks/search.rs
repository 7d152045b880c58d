//! Name and phone search.

use std::sync::Arc;

use raildir_types::{Contact, PageRequest, Paginated, PaginationMeta};
use tokio::sync::watch;

use super::state::{self, HookState, HookStatus};
use super::{api_message, SEARCH_FAILED};
use crate::error::Error;
use crate::services::ContactsService;
use crate::validation;

const CONTACT_NOT_FOUND: &str = "Contact not found";

/// Observable state of a [`ContactsSearch`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub contacts: Vec<Contact>,
    pub pagination: Option<PaginationMeta>,
    pub loading: bool,
    pub error: Option<String>,
}

impl SearchState {
    #[must_use]
    pub fn status(&self) -> HookStatus {
        state::status(self.loading, self.error.is_some(), self.pagination.is_some())
    }
}

/// Contact search by name or phone number.
///
/// Inputs are validated before any request; a validation failure becomes
/// the error message and nothing is sent. When searches overlap only the
/// most recently started one updates the state.
#[derive(Clone)]
pub struct ContactsSearch {
    service: ContactsService,
    page_size: u32,
    state: Arc<HookState<SearchState>>,
}

impl ContactsSearch {
    pub fn new(service: ContactsService, page_size: u32) -> Self {
        Self {
            service,
            page_size,
            state: Arc::new(HookState::new(SearchState::default())),
        }
    }

    /// Searches by name and shows page `page` of the results.
    pub async fn search_by_name(&self, query: &str, page: u32) {
        let ticket = self.state.begin(start);

        let result = match validation::validate_name_query(query) {
            Err(err) => Err(validation::message(&err)),
            Ok(query) => {
                tracing::debug!(%query, page, "Searching contacts by name");
                self.service
                    .search_by_name(query, PageRequest::new(page, self.page_size))
                    .await
                    .map_err(|err| api_message(&err, SEARCH_FAILED))
            }
        };

        self.state.settle(ticket, |state| finish(state, result));
    }

    /// Looks up the contact with `phone`. A miss reads "Contact not found".
    pub async fn search_by_phone(&self, phone: &str) {
        let ticket = self.state.begin(start);

        let result = match validation::validate_phone_query(phone) {
            Err(err) => Err(validation::message(&err)),
            Ok(phone) => {
                tracing::debug!("Searching contacts by phone");
                self.service
                    .search_by_phone(phone)
                    .await
                    .map_err(|err| phone_message(&err))
            }
        };

        self.state.settle(ticket, |state| finish(state, result));
    }

    /// Empties results, pagination and error. Searches still in flight are
    /// discarded when they complete.
    pub fn clear_results(&self) {
        self.state.reset(|state| *state = SearchState::default());
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.read(|state| state.loading)
    }

    #[must_use]
    pub fn snapshot(&self) -> SearchState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }
}

fn start(state: &mut SearchState) {
    state.loading = true;
    state.error = None;
}

fn finish(state: &mut SearchState, result: Result<Paginated<Contact>, String>) {
    state.loading = false;
    match result {
        Ok(page) => {
            state.contacts = page.data;
            state.pagination = Some(page.pagination);
        }
        Err(message) => {
            tracing::debug!(%message, "Contact search failed");
            state.error = Some(message);
            state.contacts.clear();
            state.pagination = None;
        }
    }
}

fn phone_message(err: &Error) -> String {
    match err.as_api() {
        Some(api) if api.is_not_found() => CONTACT_NOT_FOUND.to_string(),
        _ => api_message(err, SEARCH_FAILED),
    }
}
