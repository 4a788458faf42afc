// SPDX-License-Identifier: AGPL-3.0
// EduToyRent Core - Application state
//
// One explicitly built bundle of everything a screen needs. Frontends hold
// it by handle instead of reaching for globals.

use crate::catalog::CatalogClient;
use crate::saved::SavedItemsStore;
use crate::settings::SettingsStore;
use crate::storage::{FileKeyValueStore, KeyValueStorage};
use crate::types::{AppError, AppSettings};
use std::sync::Arc;

/// Application state shared by all screens
pub struct AppState {
    pub settings: SettingsStore,
    pub catalog: CatalogClient,
    pub saved: Arc<SavedItemsStore>,
}

impl AppState {
    /// Create application state from the platform config and data directories
    pub async fn new() -> Result<Self, AppError> {
        let settings = SettingsStore::new()?;

        let storage: Arc<dyn KeyValueStorage> = match settings.get().storage_file {
            Some(path) => Arc::new(FileKeyValueStore::open(path)),
            None => Arc::new(FileKeyValueStore::new()?),
        };

        Self::from_parts(settings, storage).await
    }

    /// Create application state around an existing settings store and storage backend
    pub async fn from_parts(
        settings: SettingsStore,
        storage: Arc<dyn KeyValueStorage>,
    ) -> Result<Self, AppError> {
        let catalog = CatalogClient::new(&settings.get())?;
        let saved = Arc::new(SavedItemsStore::load(storage).await);

        tracing::info!(
            "Application state ready, catalog at {}, settings in {:?}",
            catalog.base_url(),
            settings.path()
        );
        Ok(Self {
            settings,
            catalog,
            saved,
        })
    }

    /// Persist new settings and rebuild the catalog client from them
    pub fn apply_settings(&mut self, new_settings: AppSettings) -> Result<(), AppError> {
        let catalog = CatalogClient::new(&new_settings)?;
        self.settings.update(new_settings)?;
        self.catalog = catalog;
        Ok(())
    }
}
