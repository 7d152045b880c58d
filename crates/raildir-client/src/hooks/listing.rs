//! Paginated listing of all contacts.

use std::sync::Arc;

use raildir_types::{Contact, PageRequest, PaginationMeta, DEFAULT_LIMIT, DEFAULT_PAGE};
use tokio::sync::watch;

use super::state::{self, HookState, HookStatus};
use super::{api_message, CONTACTS_FAILED};
use crate::services::ContactsService;

/// Initial settings of a [`ContactsListing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingOptions {
    pub page: u32,
    pub limit: u32,
    /// Fetch the first page on [`ContactsListing::mount`].
    pub auto_fetch: bool,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            auto_fetch: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingState {
    pub contacts: Vec<Contact>,
    pub pagination: Option<PaginationMeta>,
    /// Requested page.
    pub page: u32,
    /// Requested page size.
    pub limit: u32,
    pub loading: bool,
    pub error: Option<String>,
}

impl ListingState {
    #[must_use]
    pub fn status(&self) -> HookStatus {
        state::status(self.loading, self.error.is_some(), self.pagination.is_some())
    }
}

#[derive(Clone)]
pub struct ContactsListing {
    service: ContactsService,
    auto_fetch: bool,
    state: Arc<HookState<ListingState>>,
}

impl ContactsListing {
    /// Creates the listing. No request is made until [`Self::mount`] or
    /// [`Self::refetch`].
    pub fn new(service: ContactsService, options: ListingOptions) -> Self {
        Self {
            service,
            auto_fetch: options.auto_fetch,
            state: Arc::new(HookState::new(ListingState {
                contacts: Vec::new(),
                pagination: None,
                page: options.page,
                limit: options.limit,
                loading: options.auto_fetch,
                error: None,
            })),
        }
    }

    /// Performs the initial fetch when `auto_fetch` is set.
    pub async fn mount(&self) {
        if self.auto_fetch {
            self.refetch().await;
        }
    }

    /// Fetches the currently requested page.
    pub async fn refetch(&self) {
        let mut request = PageRequest::default();
        let ticket = self.state.begin(|state| {
            state.loading = true;
            state.error = None;
            request = PageRequest::new(state.page, state.limit);
        });

        tracing::debug!(page = request.page, limit = request.limit, "Fetching contacts");
        let result = self.service.get_all_contacts(request).await;

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

    /// Moves to `page` and fetches it.
    pub async fn set_page(&self, page: u32) {
        self.state.update(|state| state.page = page);
        self.refetch().await;
    }

    /// Changes the page size and refetches the current page.
    pub async fn set_limit(&self, limit: u32) {
        self.state.update(|state| state.limit = limit);
        self.refetch().await;
    }

    #[must_use]
    pub fn snapshot(&self) -> ListingState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListingState> {
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

    fn listing(server: &MockServer, options: ListingOptions) -> ContactsListing {
        let client = ApiClient::new(&ClientConfig::new(server.uri())).unwrap();
        ContactsListing::new(ContactsService::new(client), options)
    }

    fn page(page: u32, limit: u32, total: u64) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": [{ "id": format!("p{page}"), "name": "Someone" }],
            "pagination": {
                "page": page,
                "limit": limit,
                "total": total,
                "totalPages": total.div_ceil(u64::from(limit))
            }
        }))
    }

    #[tokio::test]
    async fn test_mount_fetches_first_page() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/contacts"))
            .and(query_param("page", "1"))
            .respond_with(page(1, 50, 120))
            .expect(1)
            .mount(&mock_server)
            .await;

        let listing = listing(&mock_server, ListingOptions::default());
        assert!(listing.snapshot().loading);

        listing.mount().await;

        let state = listing.snapshot();
        assert_eq!(state.status(), HookStatus::Success);
        assert_eq!(state.pagination.map(|p| p.total_pages), Some(3));
    }

    #[tokio::test]
    async fn test_mount_without_auto_fetch_is_idle() {
        let mock_server = MockServer::start().await;
        let listing = listing(
            &mock_server,
            ListingOptions {
                auto_fetch: false,
                ..ListingOptions::default()
            },
        );

        listing.mount().await;

        assert_eq!(listing.snapshot().status(), HookStatus::Idle);
        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_page_and_limit_refetch() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/contacts"))
            .and(query_param("page", "2"))
            .and(query_param("limit", "50"))
            .respond_with(page(2, 50, 120))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/contacts"))
            .and(query_param("page", "2"))
            .and(query_param("limit", "20"))
            .respond_with(page(2, 20, 120))
            .expect(1)
            .mount(&mock_server)
            .await;

        let listing = listing(&mock_server, ListingOptions::default());

        listing.set_page(2).await;
        assert_eq!(listing.snapshot().contacts[0].id, "p2");

        listing.set_limit(20).await;
        let state = listing.snapshot();
        assert_eq!(state.limit, 20);
        assert_eq!(state.pagination.map(|p| p.total_pages), Some(6));
    }

    #[tokio::test]
    async fn test_failure_clears_results() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/contacts"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let listing = listing(&mock_server, ListingOptions::default());
        listing.refetch().await;

        let state = listing.snapshot();
        assert_eq!(state.error.as_deref(), Some("HTTP error! status: 503"));
        assert!(state.contacts.is_empty());
        assert!(!state.loading);
    }
}
