//! # Hooks
//!
//! Per-feature state containers that sit between the services and a front
//! end. Each hook owns its state, publishes every change over a
//! [`tokio::sync::watch`] channel and applies results only for the most
//! recently started operation. Failures never escape a hook: they are
//! turned into a single user-facing message stored in the state.
//!
//! | Hook | Drives |
//! |---|---|
//! | [`ContactsSearch`] | name and phone search |
//! | [`AutoSearch`] | debounced name search while typing |
//! | [`ContactsListing`] | paginated contact list |
//! | [`ContactFilter`] | blood group / lobby / designation filter |
//! | [`Resource`] | any one-shot fetch (counts, enumerations, analytics, documents) |
//! | [`VisitCounter`] | site visit counter |

mod auto_search;
mod filter;
mod listing;
mod resource;
mod search;
mod sequence;
mod state;
mod visits;

pub use auto_search::AutoSearch;
pub use filter::{ContactFilter, FilterSelection, FilterState};
pub use listing::{ContactsListing, ListingOptions, ListingState};
pub use resource::{AnalyticsDashboard, Resource};
pub use search::{ContactsSearch, SearchState};
pub use sequence::{RequestSequence, Ticket};
pub use state::{HookState, HookStatus, Loadable};
pub use visits::{VisitCounter, VisitCounterOptions};

use crate::error::Error;

pub(crate) const SEARCH_FAILED: &str = "Failed to search contacts. Please try again.";
pub(crate) const CONTACTS_FAILED: &str = "Failed to fetch contacts. Please try again.";

/// Message shown for `err`: the backend's message for API errors, otherwise
/// `fallback`.
pub(crate) fn api_message(err: &Error, fallback: &str) -> String {
    match err {
        Error::Api(api) => api.message().to_string(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    #[test]
    fn test_api_message_mapping() {
        let api: Error = ApiError::new("Database unavailable", 500, None).into();
        assert_eq!(api_message(&api, SEARCH_FAILED), "Database unavailable");

        let timeout: Error = ApiError::timeout().into();
        assert_eq!(api_message(&timeout, SEARCH_FAILED), "Request timeout");

        let other = Error::InvalidResponse("expected value".to_string());
        assert_eq!(api_message(&other, CONTACTS_FAILED), CONTACTS_FAILED);
    }
}
