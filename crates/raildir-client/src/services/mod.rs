//! # Services
//!
//! One service per resource family. Each service owns a clone of the shared
//! [`ApiClient`](crate::api::ApiClient), turns a domain intent into a single
//! transport call and normalizes the response shape. Services never recover
//! from errors; that is left to the hooks.

mod analytics;
mod contacts;
mod documents;

pub use analytics::{
    AnalyticsService, DEFAULT_GROWTH_DAYS, DEFAULT_HISTORY_DAYS, DEFAULT_RECENT_LIMIT,
};
pub use contacts::{ContactsService, FilterMode};
pub use documents::{filter_by_title, normalize_document, DocumentsService};
