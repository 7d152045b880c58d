//! Selection-driven contact filter.

use std::sync::Arc;

use raildir_types::{Contact, PageRequest, PaginationMeta, DEFAULT_PAGE};
use tokio::sync::watch;

use super::state::{self, HookState, HookStatus};
use super::{api_message, CONTACTS_FAILED};
use crate::services::{ContactsService, FilterMode};

/// Values picked in the three filter selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub blood_groups: Vec<String>,
    pub lobbies: Vec<String>,
    pub designations: Vec<String>,
}

impl FilterSelection {
    /// True when nothing `mode` sends is selected.
    #[must_use]
    pub fn is_empty_for(&self, mode: FilterMode) -> bool {
        mode.is_unfilled(&self.blood_groups, &self.lobbies, &self.designations)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub selection: FilterSelection,
    pub contacts: Vec<Contact>,
    pub pagination: Option<PaginationMeta>,
    pub loading: bool,
    pub error: Option<String>,
}

impl FilterState {
    #[must_use]
    pub fn status(&self) -> HookStatus {
        state::status(self.loading, self.error.is_some(), self.pagination.is_some())
    }
}

/// Filters contacts by blood group, lobby and designation.
///
/// The [`FilterMode`] picks the endpoint and the dimensions that are sent.
/// Changing the selection starts over at page 1. A selection with nothing
/// the mode uses clears the results without asking the backend.
#[derive(Clone)]
pub struct ContactFilter {
    service: ContactsService,
    mode: FilterMode,
    page_size: u32,
    state: Arc<HookState<FilterState>>,
}

impl ContactFilter {
    pub fn new(service: ContactsService, mode: FilterMode, page_size: u32) -> Self {
        Self {
            service,
            mode,
            page_size,
            state: Arc::new(HookState::new(FilterState::default())),
        }
    }

    #[must_use]
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Replaces the selection and shows the first page of matches.
    pub async fn select(&self, selection: FilterSelection) {
        if selection.is_empty_for(self.mode) {
            self.state.reset(|state| {
                *state = FilterState {
                    selection,
                    ..FilterState::default()
                };
            });
            return;
        }
        self.fetch(selection, DEFAULT_PAGE).await;
    }

    /// Shows `page` of the current selection.
    pub async fn set_page(&self, page: u32) {
        let selection = self.state.read(|state| state.selection.clone());
        if selection.is_empty_for(self.mode) {
            return;
        }
        self.fetch(selection, page).await;
    }

    async fn fetch(&self, selection: FilterSelection, page: u32) {
        let ticket = self.state.begin(|state| {
            state.selection = selection.clone();
            state.loading = true;
            state.error = None;
        });

        tracing::debug!(mode = ?self.mode, ?selection, page, "Filtering contacts");
        let result = self
            .service
            .filter_by(
                self.mode,
                &selection.blood_groups,
                &selection.lobbies,
                &selection.designations,
                PageRequest::new(page, self.page_size),
            )
            .await;

        self.state.settle(ticket, |state| {
            state.loading = false;
            match result {
                Ok(page) => {
                    state.contacts = page.data;
                    state.pagination = Some(page.pagination);
                }
                Err(err) => {
                    state.error = Some(api_message(&err, CONTACTS_FAILED));
                    state.contacts.clear();
                    state.pagination = None;
                }
            }
        });
    }

    #[must_use]
    pub fn snapshot(&self) -> FilterState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<FilterState> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::config::ClientConfig;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn filter_in(server: &MockServer, mode: FilterMode) -> ContactFilter {
        let client = ApiClient::new(&ClientConfig::new(server.uri())).unwrap();
        ContactFilter::new(ContactsService::new(client), mode, 50)
    }

    fn filter(server: &MockServer) -> ContactFilter {
        filter_in(server, FilterMode::Unified)
    }

    fn page_of(names: &[&str]) -> ResponseTemplate {
        let data: Vec<_> = names
            .iter()
            .map(|name| serde_json::json!({ "id": name, "name": name }))
            .collect();
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": data,
            "pagination": { "page": 1, "limit": 50, "total": names.len(), "totalPages": 1 }
        }))
    }

    fn lobby(name: &str) -> FilterSelection {
        FilterSelection {
            lobbies: vec![name.to_string()],
            ..FilterSelection::default()
        }
    }

    #[tokio::test]
    async fn test_empty_selection_clears_without_request() {
        let mock_server = MockServer::start().await;
        let filter = filter(&mock_server);

        filter.select(FilterSelection::default()).await;
        filter.set_page(3).await;

        assert_eq!(filter.snapshot(), FilterState::default());
        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_new_selection_starts_at_first_page() {
        let mock_server = MockServer::start().await;

        for (lobby_name, page) in [("BZA", "1"), ("BZA", "2"), ("GNT", "1")] {
            Mock::given(method("GET"))
                .and(path("/api/contacts/filter"))
                .and(query_param("lobby", lobby_name))
                .and(query_param("page", page))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "success": true,
                    "data": [],
                    "pagination": { "page": page.parse::<u32>().unwrap(), "limit": 50, "total": 60, "totalPages": 2 }
                })))
                .expect(1)
                .mount(&mock_server)
                .await;
        }

        let filter = filter(&mock_server);
        filter.select(lobby("BZA")).await;
        filter.set_page(2).await;
        assert_eq!(filter.snapshot().pagination.map(|p| p.page), Some(2));

        filter.select(lobby("GNT")).await;
        let state = filter.snapshot();
        assert_eq!(state.pagination.map(|p| p.page), Some(1));
        assert_eq!(state.selection, lobby("GNT"));
    }

    #[tokio::test]
    async fn test_blood_group_mode_uses_by_blood_group() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/contacts/by-blood-group"))
            .and(query_param("bloodGroup", "O+,B-"))
            .and(query_param("lobby", "BZA"))
            .respond_with(page_of(&["Ravi"]))
            .expect(1)
            .mount(&mock_server)
            .await;

        let filter = filter_in(&mock_server, FilterMode::BloodGroup);
        filter
            .select(FilterSelection {
                blood_groups: vec!["O+".to_string(), "B-".to_string()],
                lobbies: vec!["BZA".to_string()],
                designations: vec!["LP".to_string()],
            })
            .await;

        let state = filter.snapshot();
        assert_eq!(state.status(), HookStatus::Success);
        assert_eq!(state.contacts[0].name, "Ravi");

        let received = mock_server.received_requests().await.unwrap();
        assert!(!received[0].url.query_pairs().any(|(key, _)| key == "designation"));
    }

    #[tokio::test]
    async fn test_lobby_mode_uses_by_lobby() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/contacts/by-lobby"))
            .and(query_param("lobby", "GNT"))
            .and(query_param("designation", "LP,ALP"))
            .and(query_param("page", "2"))
            .respond_with(page_of(&["Kiran", "Sai"]))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/contacts/by-lobby"))
            .and(query_param("page", "1"))
            .respond_with(page_of(&["Kiran"]))
            .expect(1)
            .mount(&mock_server)
            .await;

        let filter = filter_in(&mock_server, FilterMode::Lobby);
        filter
            .select(FilterSelection {
                lobbies: vec!["GNT".to_string()],
                designations: vec!["LP".to_string(), "ALP".to_string()],
                ..FilterSelection::default()
            })
            .await;
        filter.set_page(2).await;

        assert_eq!(filter.snapshot().contacts.len(), 2);
    }

    #[tokio::test]
    async fn test_selection_outside_mode_clears_without_request() {
        let mock_server = MockServer::start().await;
        let filter = filter_in(&mock_server, FilterMode::Lobby);

        filter
            .select(FilterSelection {
                blood_groups: vec!["AB+".to_string()],
                ..FilterSelection::default()
            })
            .await;

        assert_eq!(filter.snapshot().status(), HookStatus::Idle);
        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }
}
