// SPDX-License-Identifier: AGPL-3.0
// EduToyRent Core - Saved items storage
//
// The saved list lives in memory and is written through to the injected
// key-value storage after every toggle. Writes run on a single writer task
// in mutation order, so the last toggle is always the last write.

use crate::storage::KeyValueStorage;
use crate::types::{AppError, ToyId};
use async_channel::{Receiver, Sender};
use std::sync::{Arc, PoisonError, RwLock};

/// Storage key holding the JSON array of saved ids
pub const SAVED_ITEMS_KEY: &str = "savedItems";

/// A full snapshot of the saved list waiting to be written
#[derive(Debug)]
struct WriteRequest {
    snapshot: Vec<ToyId>,
    reply: Sender<Result<(), AppError>>,
}

/// Completion of the write scheduled by a toggle.
///
/// Dropping it leaves the write running in the background.
#[derive(Debug)]
pub struct Persisting {
    now_saved: bool,
    reply: Receiver<Result<(), AppError>>,
}

impl Persisting {
    /// Membership of the toggled id after the toggle
    pub fn now_saved(&self) -> bool {
        self.now_saved
    }

    /// Wait until the write for this toggle has been attempted
    pub async fn wait(self) -> Result<(), AppError> {
        self.reply
            .recv()
            .await
            .map_err(|_| AppError::Storage("Saved items writer stopped".to_string()))?
    }
}

/// Saved items store with write-through persistence
pub struct SavedItemsStore {
    saved: RwLock<Vec<ToyId>>,
    write_tx: Sender<WriteRequest>,
}

impl SavedItemsStore {
    /// Load the saved list from storage and start the writer task.
    ///
    /// A missing or unreadable list starts the session empty.
    pub async fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let saved = match Self::read_persisted(storage.clone()).await {
            Ok(saved) => {
                tracing::info!("Loaded {} saved items", saved.len());
                saved
            }
            Err(e) => {
                tracing::warn!("Failed to load saved items, starting empty: {}", e);
                Vec::new()
            }
        };

        let (write_tx, write_rx) = async_channel::unbounded::<WriteRequest>();
        tokio::spawn(Self::run_writer(storage, write_rx));

        Self {
            saved: RwLock::new(saved),
            write_tx,
        }
    }

    async fn read_persisted(storage: Arc<dyn KeyValueStorage>) -> Result<Vec<ToyId>, AppError> {
        let raw = tokio::task::spawn_blocking(move || storage.get_item(SAVED_ITEMS_KEY))
            .await
            .map_err(|e| AppError::Storage(format!("Storage task failed: {}", e)))??;

        let Some(raw) = raw else {
            return Ok(Vec::new());
        };

        let ids: Vec<ToyId> = serde_json::from_str(&raw)
            .map_err(|e| AppError::Serialization(format!("Failed to parse saved items: {}", e)))?;

        let mut saved: Vec<ToyId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !saved.contains(&id) {
                saved.push(id);
            }
        }
        Ok(saved)
    }

    async fn run_writer(storage: Arc<dyn KeyValueStorage>, write_rx: Receiver<WriteRequest>) {
        while let Ok(request) = write_rx.recv().await {
            let count = request.snapshot.len();
            let result = Self::write_snapshot(storage.clone(), request.snapshot).await;

            match &result {
                Ok(()) => tracing::debug!("Persisted {} saved items", count),
                Err(e) => tracing::error!("Failed to persist saved items: {}", e),
            }

            let _ = request.reply.try_send(result);
        }
        tracing::debug!("Saved items writer stopped");
    }

    async fn write_snapshot(
        storage: Arc<dyn KeyValueStorage>,
        snapshot: Vec<ToyId>,
    ) -> Result<(), AppError> {
        let content = serde_json::to_string(&snapshot)
            .map_err(|e| AppError::Serialization(format!("Failed to serialize saved items: {}", e)))?;

        tokio::task::spawn_blocking(move || storage.set_item(SAVED_ITEMS_KEY, &content))
            .await
            .map_err(|e| AppError::Storage(format!("Storage task failed: {}", e)))?
    }

    /// Check whether a toy is in the saved list
    pub fn is_saved(&self, id: &ToyId) -> bool {
        self.saved
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    /// Save the toy if it is not saved, otherwise remove it.
    ///
    /// The in-memory list changes immediately; the returned handle resolves
    /// once the new list has been written.
    pub fn toggle(&self, id: &ToyId) -> Persisting {
        let (reply_tx, reply_rx) = async_channel::bounded(1);

        let now_saved = {
            let mut saved = self.saved.write().unwrap_or_else(PoisonError::into_inner);
            let now_saved = match saved.iter().position(|s| s == id) {
                Some(pos) => {
                    saved.remove(pos);
                    false
                }
                None => {
                    saved.push(id.clone());
                    true
                }
            };

            // Enqueued under the lock so write order matches mutation order
            let request = WriteRequest {
                snapshot: saved.clone(),
                reply: reply_tx,
            };
            if let Err(e) = self.write_tx.try_send(request) {
                tracing::error!("Could not schedule saved items write: {}", e);
            }

            now_saved
        };

        tracing::debug!("Toggled toy {}, saved: {}", id, now_saved);
        Persisting {
            now_saved,
            reply: reply_rx,
        }
    }

    /// Saved ids in the order they were saved
    pub fn saved_ids(&self) -> Vec<ToyId> {
        self.saved
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.saved.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;
    use std::sync::Mutex;

    /// Storage that records every write and can be told to fail
    #[derive(Default)]
    struct RecordingStorage {
        initial: Option<String>,
        fail_reads: bool,
        fail_writes: bool,
        writes: Mutex<Vec<String>>,
    }

    impl KeyValueStorage for RecordingStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, AppError> {
            if self.fail_reads {
                return Err(AppError::Storage("disk unavailable".to_string()));
            }
            Ok(self.initial.clone())
        }

        fn set_item(&self, _key: &str, value: &str) -> Result<(), AppError> {
            if self.fail_writes {
                return Err(AppError::Storage("disk full".to_string()));
            }
            self.writes.lock().unwrap().push(value.to_string());
            Ok(())
        }
    }

    fn persisted(storage: &MemoryKeyValueStore) -> Vec<ToyId> {
        let raw = storage.get_item(SAVED_ITEMS_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_toggle_saves_then_removes() {
        let storage = Arc::new(MemoryKeyValueStore::new());
        let store = SavedItemsStore::load(storage.clone()).await;
        let id = ToyId::from(5u64);

        let persisting = store.toggle(&id);
        assert!(persisting.now_saved());
        assert!(store.is_saved(&id));
        persisting.wait().await.unwrap();
        assert_eq!(persisted(&storage), vec![id.clone()]);

        let persisting = store.toggle(&id);
        assert!(!persisting.now_saved());
        assert!(!store.is_saved(&id));
        persisting.wait().await.unwrap();
        assert!(persisted(&storage).is_empty());
    }

    #[tokio::test]
    async fn test_double_toggle_restores_membership() {
        let storage = Arc::new(MemoryKeyValueStore::new());
        let store = SavedItemsStore::load(storage).await;
        store.toggle(&ToyId::from(2u64));

        for n in 1..=4u64 {
            let id = ToyId::from(n);
            let before = store.is_saved(&id);
            store.toggle(&id);
            store.toggle(&id);
            assert_eq!(store.is_saved(&id), before);
        }
    }

    #[tokio::test]
    async fn test_reload_reproduces_saved_set() {
        let storage = Arc::new(MemoryKeyValueStore::new());
        let store = SavedItemsStore::load(storage.clone()).await;
        store.toggle(&ToyId::from(1u64));
        store.toggle(&ToyId::from(9u64));
        store.toggle(&ToyId::from("abc")).wait().await.unwrap();

        let reloaded = SavedItemsStore::load(storage).await;
        assert_eq!(reloaded.saved_ids(), store.saved_ids());
        assert_eq!(reloaded.len(), 3);
    }

    #[tokio::test]
    async fn test_load_collapses_duplicates() {
        let storage = Arc::new(RecordingStorage {
            initial: Some(r#"["1", 2, "1"]"#.to_string()),
            ..Default::default()
        });
        let store = SavedItemsStore::load(storage).await;
        assert_eq!(store.saved_ids(), vec![ToyId::from(1u64), ToyId::from(2u64)]);
    }

    #[tokio::test]
    async fn test_corrupt_data_loads_empty() {
        let storage = Arc::new(RecordingStorage {
            initial: Some("{not a list".to_string()),
            ..Default::default()
        });
        let store = SavedItemsStore::load(storage).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_failed_load_starts_empty() {
        let storage = Arc::new(RecordingStorage {
            fail_reads: true,
            ..Default::default()
        });
        let store = SavedItemsStore::load(storage.clone()).await;
        assert!(store.is_empty());

        store.toggle(&ToyId::from(3u64)).wait().await.unwrap();
        assert_eq!(storage.writes.lock().unwrap().as_slice(), ["[\"3\"]"]);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_memory_state() {
        let storage = Arc::new(RecordingStorage {
            fail_writes: true,
            ..Default::default()
        });
        let store = SavedItemsStore::load(storage).await;
        let id = ToyId::from(8u64);

        let result = store.toggle(&id).wait().await;
        assert!(matches!(result, Err(AppError::Storage(_))));
        assert!(store.is_saved(&id));
    }

    #[tokio::test]
    async fn test_back_to_back_toggles_write_in_order() {
        let storage = Arc::new(RecordingStorage::default());
        let store = SavedItemsStore::load(storage.clone()).await;

        // Earlier handles are dropped; waiting on the last covers all writes
        store.toggle(&ToyId::from(1u64));
        store.toggle(&ToyId::from(2u64));
        store.toggle(&ToyId::from(1u64)).wait().await.unwrap();

        let writes = storage.writes.lock().unwrap().clone();
        assert_eq!(writes, vec!["[\"1\"]", "[\"1\",\"2\"]", "[\"2\"]"]);
    }
}
