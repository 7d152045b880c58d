//! Site visit counter.

use std::sync::Arc;

use tokio::sync::watch;

use super::api_message;
use super::state::{HookState, Loadable};
use crate::services::AnalyticsService;

const FETCH_FAILED: &str = "Failed to fetch visit count. Please try again.";
const INCREMENT_FAILED: &str = "Failed to increment visit count. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitCounterOptions {
    /// Record a visit on mount and show the resulting value.
    pub auto_increment: bool,
    /// Read the counter on mount when not incrementing.
    pub auto_fetch: bool,
}

impl Default for VisitCounterOptions {
    fn default() -> Self {
        Self {
            auto_increment: true,
            auto_fetch: true,
        }
    }
}

/// Shows the site visit counter and optionally records a visit.
///
/// Mounting issues at most one request: an increment when
/// `auto_increment` is set (its response already carries the new value),
/// otherwise a read when `auto_fetch` is set.
#[derive(Clone)]
pub struct VisitCounter {
    service: AnalyticsService,
    options: VisitCounterOptions,
    state: Arc<HookState<Loadable<u64>>>,
}

impl VisitCounter {
    pub fn new(service: AnalyticsService, options: VisitCounterOptions) -> Self {
        let loading = options.auto_increment || options.auto_fetch;
        Self {
            service,
            options,
            state: Arc::new(HookState::new(Loadable::new(loading))),
        }
    }

    pub async fn mount(&self) {
        if self.options.auto_increment {
            self.increment().await;
        } else if self.options.auto_fetch {
            self.refetch().await;
        }
    }

    /// Records one visit and shows the new value.
    ///
    /// A failure keeps the last known value.
    pub async fn increment(&self) {
        let ticket = self.state.begin(|state| state.loading = true);

        let result = self.service.increment_visit_count().await;

        self.state.settle(ticket, |state| {
            state.loading = false;
            match result {
                Ok(count) => {
                    tracing::debug!(count, "Visit recorded");
                    state.data = Some(count);
                    state.error = None;
                }
                Err(err) => state.error = Some(api_message(&err, INCREMENT_FAILED)),
            }
        });
    }

    /// Reads the counter without recording a visit.
    pub async fn refetch(&self) {
        let ticket = self.state.begin(|state| {
            state.loading = true;
            state.error = None;
        });

        let result = self.service.get_visit_count().await;

        self.state.settle(ticket, |state| {
            state.loading = false;
            match result {
                Ok(count) => state.data = Some(count),
                Err(err) => {
                    state.error = Some(api_message(&err, FETCH_FAILED));
                    state.data = None;
                }
            }
        });
    }

    #[must_use]
    pub fn snapshot(&self) -> Loadable<u64> {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Loadable<u64>> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::config::ClientConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn counter(server: &MockServer, options: VisitCounterOptions) -> VisitCounter {
        let client = ApiClient::new(&ClientConfig::new(server.uri())).unwrap();
        VisitCounter::new(AnalyticsService::new(client), options)
    }

    fn count_body(count: u64) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "data": { "visitCount": count }
        }))
    }

    #[tokio::test]
    async fn test_default_mount_makes_one_post() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/analytics/visits"))
            .respond_with(count_body(501))
            .expect(1)
            .mount(&mock_server)
            .await;

        let counter = counter(&mock_server, VisitCounterOptions::default());
        counter.mount().await;

        let received = mock_server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].method.as_str(), "POST");

        let state = counter.snapshot();
        assert_eq!(state.data, Some(501));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_fetch_only_mount_reads() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/analytics/visits"))
            .respond_with(count_body(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let counter = counter(
            &mock_server,
            VisitCounterOptions {
                auto_increment: false,
                auto_fetch: true,
            },
        );
        counter.mount().await;

        assert_eq!(counter.snapshot().data, Some(500));
    }

    #[tokio::test]
    async fn test_increment_failure_clears_loading_and_keeps_value() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/analytics/visits"))
            .respond_with(count_body(500))
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/analytics/visits"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "success": false,
                "message": "Counter locked"
            })))
            .mount(&mock_server)
            .await;

        let counter = counter(&mock_server, VisitCounterOptions::default());
        assert!(counter.snapshot().loading);

        counter.refetch().await;
        counter.increment().await;

        let state = counter.snapshot();
        assert!(!state.loading);
        assert_eq!(state.data, Some(500));
        assert_eq!(state.error.as_deref(), Some("Counter locked"));
    }

    #[tokio::test]
    async fn test_mount_without_options_is_idle() {
        let mock_server = MockServer::start().await;
        let counter = counter(
            &mock_server,
            VisitCounterOptions {
                auto_increment: false,
                auto_fetch: false,
            },
        );

        counter.mount().await;

        assert!(!counter.snapshot().loading);
        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }
}
