// SPDX-License-Identifier: AGPL-3.0
// EduToyRent Core - Shared logic for all frontends
//
// This crate provides:
// - Toy, AppSettings and AppError types
// - CatalogClient for the remote toy catalog
// - SavedItemsStore for the locally persisted saved list
// - Catalog, saved-list and feedback filters
// - SettingsStore for persistent settings
// - AppState bundling the above for a frontend
//
// Screens and rendering live in the frontend crates.

pub mod catalog;
pub mod filter;
pub mod logging;
pub mod saved;
pub mod selection;
pub mod session;
pub mod settings;
pub mod storage;
pub mod types;

// Re-export commonly used items
pub use catalog::CatalogClient;
pub use filter::{company_badges, company_count, filter_saved, filter_toys, RatingFilter};
pub use saved::{Persisting, SavedItemsStore, SAVED_ITEMS_KEY};
pub use selection::Selection;
pub use session::AppState;
pub use settings::SettingsStore;
pub use storage::{FileKeyValueStore, KeyValueStorage, MemoryKeyValueStore};
pub use types::{
    AppError, AppSettings, CompanyFilter, FeedbackEntry, Toy, ToyId, KNOWN_COMPANIES,
};
