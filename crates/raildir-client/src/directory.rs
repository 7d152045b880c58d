//! # Directory
//!
//! Composition root: builds the transport once, hands a clone to every
//! service and creates hooks wired to those services.

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::hooks::{
    AnalyticsDashboard, AutoSearch, ContactFilter, ContactsListing, ContactsSearch,
    ListingOptions, Resource, VisitCounter, VisitCounterOptions,
};
use crate::services::{AnalyticsService, ContactsService, DocumentsService, FilterMode};
use raildir_types::{Document, VisitHistory};

/// Services for one directory backend plus factories for the hooks that
/// use them.
///
/// # Examples
///
/// ```rust,ignore
/// use raildir_client::{ClientConfig, Directory};
///
/// let directory = Directory::new(ClientConfig::from_env()?)?;
/// let search = directory.contacts_search();
/// search.search_by_name("Ravi", 1).await;
/// println!("{:?}", search.snapshot().contacts);
/// ```
#[derive(Clone)]
pub struct Directory {
    config: ClientConfig,
    contacts: ContactsService,
    analytics: AnalyticsService,
    documents: DocumentsService,
}

impl Directory {
    /// Creates the services for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = ApiClient::new(&config)?;
        tracing::info!(base_url = %client.base_url(), "Directory client ready");

        Ok(Self {
            contacts: ContactsService::new(client.clone()),
            analytics: AnalyticsService::new(client.clone()),
            documents: DocumentsService::new(client, &config),
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn contacts(&self) -> &ContactsService {
        &self.contacts
    }

    #[must_use]
    pub fn analytics(&self) -> &AnalyticsService {
        &self.analytics
    }

    #[must_use]
    pub fn documents(&self) -> &DocumentsService {
        &self.documents
    }

    pub fn contacts_search(&self) -> ContactsSearch {
        ContactsSearch::new(self.contacts.clone(), self.config.page_size)
    }

    /// Debounced name search using the configured quiet period.
    pub fn auto_search(&self) -> AutoSearch {
        AutoSearch::new(self.contacts_search(), self.config.search_debounce())
    }

    pub fn contacts_listing(&self, options: ListingOptions) -> ContactsListing {
        ContactsListing::new(self.contacts.clone(), options)
    }

    /// Filter sending its selection to the endpoint of `mode`.
    pub fn contact_filter(&self, mode: FilterMode) -> ContactFilter {
        ContactFilter::new(self.contacts.clone(), mode, self.config.page_size)
    }

    pub fn contacts_count(&self) -> Resource<u64> {
        Resource::contacts_count(self.contacts.clone())
    }

    pub fn blood_groups(&self) -> Resource<Vec<String>> {
        Resource::blood_groups(self.contacts.clone())
    }

    pub fn lobbies(&self) -> Resource<Vec<String>> {
        Resource::lobbies(self.contacts.clone())
    }

    pub fn designations(&self) -> Resource<Vec<String>> {
        Resource::designations(self.contacts.clone())
    }

    pub fn document_list(&self) -> Resource<Vec<Document>> {
        Resource::documents(self.documents.clone())
    }

    pub fn documents_count(&self) -> Resource<u64> {
        Resource::documents_count(self.documents.clone())
    }

    pub fn analytics_dashboard(&self) -> Resource<AnalyticsDashboard> {
        Resource::analytics_dashboard(self.analytics.clone())
    }

    pub fn visit_history(&self, days: u32) -> Resource<VisitHistory> {
        Resource::visit_history(self.analytics.clone(), days)
    }

    pub fn visit_counter(&self, options: VisitCounterOptions) -> VisitCounter {
        VisitCounter::new(self.analytics.clone(), options)
    }
}
