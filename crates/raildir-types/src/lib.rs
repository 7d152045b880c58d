//! Common types used throughout `raildir`.
//!
//! These are transport-level DTOs for the division's contacts directory API.
//! Nothing here is persisted by the client; values are fetched, copied into
//! hook state and replaced wholesale on the next fetch.

mod analytics;
mod contact;
mod document;
mod envelope;
mod pagination;

pub use analytics::{
    AnalyticsOverview, DailyGrowth, Distribution, DistributionItem, GrowthData, RecentContact,
    RecentContacts, VisitCount, VisitHistory, VisitHistoryItem,
};
pub use contact::{Contact, ContactInput};
pub use document::Document;
pub use envelope::{CountEnvelope, DataEnvelope, ErrorBody, MaybeEnveloped};
pub use pagination::{PageRequest, Paginated, PaginationMeta, DEFAULT_LIMIT, DEFAULT_PAGE};
