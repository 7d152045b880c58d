//! One-shot fetch containers for counts, enumerations, documents and
//! analytics views.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use raildir_types::{
    AnalyticsOverview, Distribution, Document, GrowthData, RecentContacts, VisitHistory,
};
use serde::Serialize;
use tokio::sync::watch;

use super::api_message;
use super::state::{HookState, Loadable};
use crate::error::Result;
use crate::services::{
    AnalyticsService, ContactsService, DocumentsService, DEFAULT_GROWTH_DAYS, DEFAULT_HISTORY_DAYS,
    DEFAULT_RECENT_LIMIT,
};

type Fetch<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T>> + Send + Sync>;

/// Everything the analytics page shows, loaded together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsDashboard {
    pub overview: AnalyticsOverview,
    pub blood_groups: Distribution,
    pub lobbies: Distribution,
    pub designations: Distribution,
    pub growth: GrowthData,
    pub recent: RecentContacts,
    pub visits: VisitHistory,
}

/// A value fetched on demand.
///
/// On failure the data is dropped and the error holds the backend message
/// for API errors or the resource's fallback text otherwise.
pub struct Resource<T> {
    fetch: Fetch<T>,
    fallback: &'static str,
    auto_fetch: bool,
    state: Arc<HookState<Loadable<T>>>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            fetch: Arc::clone(&self.fetch),
            fallback: self.fallback,
            auto_fetch: self.auto_fetch,
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Resource<T> {
    /// Wraps `fetch`. `fallback` is the message used for failures that
    /// carry no backend message.
    pub fn new<F, Fut>(fallback: &'static str, auto_fetch: bool, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            fetch: Arc::new(move || fetch().boxed()),
            fallback,
            auto_fetch,
            state: Arc::new(HookState::new(Loadable::new(auto_fetch))),
        }
    }

    /// Performs the initial fetch when `auto_fetch` is set.
    pub async fn mount(&self) {
        if self.auto_fetch {
            self.refetch().await;
        }
    }

    pub async fn refetch(&self) {
        let ticket = self.state.begin(|state| {
            state.loading = true;
            state.error = None;
        });

        let result = (self.fetch)().await;

        self.state.settle(ticket, |state| {
            state.loading = false;
            match result {
                Ok(data) => state.data = Some(data),
                Err(err) => {
                    tracing::debug!(error = %err, "Resource fetch failed");
                    state.error = Some(api_message(&err, self.fallback));
                    state.data = None;
                }
            }
        });
    }

    #[must_use]
    pub fn snapshot(&self) -> Loadable<T> {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Loadable<T>> {
        self.state.subscribe()
    }
}

impl Resource<u64> {
    pub fn contacts_count(service: ContactsService) -> Self {
        Self::new(
            "Failed to fetch contacts count. Please try again.",
            true,
            move || {
                let service = service.clone();
                async move { service.get_contacts_count().await }
            },
        )
    }

    pub fn documents_count(service: DocumentsService) -> Self {
        Self::new(
            "Failed to fetch documents count. Please try again.",
            true,
            move || {
                let service = service.clone();
                async move { service.get_documents_count().await }
            },
        )
    }
}

impl Resource<Vec<String>> {
    pub fn blood_groups(service: ContactsService) -> Self {
        Self::new(
            "Failed to fetch blood groups. Please try again.",
            true,
            move || {
                let service = service.clone();
                async move { service.get_blood_groups().await }
            },
        )
    }

    pub fn lobbies(service: ContactsService) -> Self {
        Self::new(
            "Failed to fetch lobbies. Please try again.",
            true,
            move || {
                let service = service.clone();
                async move { service.get_lobbies().await }
            },
        )
    }

    pub fn designations(service: ContactsService) -> Self {
        Self::new(
            "Failed to fetch designations. Please try again.",
            true,
            move || {
                let service = service.clone();
                async move { service.get_designations().await }
            },
        )
    }
}

impl Resource<Vec<Document>> {
    pub fn documents(service: DocumentsService) -> Self {
        Self::new(
            "Failed to fetch documents. Please try again.",
            true,
            move || {
                let service = service.clone();
                async move { service.get_documents().await }
            },
        )
    }
}

impl Resource<AnalyticsDashboard> {
    /// Loads every dashboard view concurrently; any failure fails the whole.
    pub fn analytics_dashboard(service: AnalyticsService) -> Self {
        Self::new(
            "Failed to fetch analytics. Please try again.",
            true,
            move || {
                let service = service.clone();
                async move {
                    let (overview, blood_groups, lobbies, designations, growth, recent, visits) =
                        tokio::try_join!(
                            service.get_overview(),
                            service.get_blood_group_distribution(),
                            service.get_lobby_distribution(),
                            service.get_designation_distribution(),
                            service.get_growth(DEFAULT_GROWTH_DAYS),
                            service.get_recent_contacts(DEFAULT_RECENT_LIMIT),
                            service.get_visit_history(DEFAULT_HISTORY_DAYS),
                        )?;
                    Ok(AnalyticsDashboard {
                        overview,
                        blood_groups,
                        lobbies,
                        designations,
                        growth,
                        recent,
                        visits,
                    })
                }
            },
        )
    }
}

impl Resource<VisitHistory> {
    pub fn visit_history(service: AnalyticsService, days: u32) -> Self {
        Self::new(
            "Failed to fetch visit history. Please try again.",
            true,
            move || {
                let service = service.clone();
                async move { service.get_visit_history(days).await }
            },
        )
    }
}
