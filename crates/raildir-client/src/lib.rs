//! # Raildir Client
//!
//! Client core for the division's contacts directory.
//!
//! ## Layers
//!
//! - [`api`]: HTTP transport with header injection, timeout and uniform
//!   error translation
//! - [`services`]: one service per resource family (contacts, analytics,
//!   documents)
//! - [`hooks`]: observable state containers with race suppression and
//!   debounced search
//! - [`Directory`]: composition root wiring the three together
//!
//! ## Example
//!
//! ```rust,ignore
//! use raildir_client::{ClientConfig, Directory, ListingOptions};
//!
//! let directory = Directory::new(ClientConfig::from_env()?)?;
//! let listing = directory.contacts_listing(ListingOptions::default());
//! listing.mount().await;
//!
//! for contact in listing.snapshot().contacts {
//!     println!("{}", contact.name);
//! }
//! ```

pub mod api;
pub mod config;
mod directory;
mod error;
pub mod hooks;
pub mod preferences;
pub mod services;
pub mod validation;

pub use api::{ApiClient, ApiError, ApiRequest};
pub use config::{ClientConfig, Secret};
pub use directory::Directory;
pub use error::{Error, Result};
pub use hooks::{
    AnalyticsDashboard, AutoSearch, ContactFilter, ContactsListing, ContactsSearch,
    FilterSelection, HookStatus, ListingOptions, Loadable, Resource, VisitCounter,
    VisitCounterOptions,
};
pub use preferences::{Preferences, Theme, ThemeSink, ThemeToggle, ToggleEvent, ToggleOrigin};
pub use services::{AnalyticsService, ContactsService, DocumentsService, FilterMode};

pub use raildir_types as types;
