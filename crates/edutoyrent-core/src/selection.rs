// SPDX-License-Identifier: AGPL-3.0
// EduToyRent Core - Multi-select on the saved list

use crate::saved::{Persisting, SavedItemsStore};
use crate::types::{Toy, ToyId};

/// Toys picked for bulk removal from the saved list
#[derive(Debug, Clone, Default)]
pub struct Selection {
    active: bool,
    selected: Vec<ToyId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether multi-select mode is on
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enter multi-select mode starting with `id` (long press)
    pub fn begin(&mut self, id: &ToyId) {
        self.active = true;
        self.toggle(id);
    }

    /// Add or drop one toy from the selection
    pub fn toggle(&mut self, id: &ToyId) {
        match self.selected.iter().position(|s| s == id) {
            Some(pos) => {
                self.selected.remove(pos);
            }
            None => self.selected.push(id.clone()),
        }
    }

    /// Replace the selection with every visible toy
    pub fn select_all<'a>(&mut self, visible: impl IntoIterator<Item = &'a Toy>) {
        self.selected = visible.into_iter().map(|toy| toy.id.clone()).collect();
    }

    /// Leave multi-select mode and clear the selection
    pub fn cancel(&mut self) {
        self.active = false;
        self.selected.clear();
    }

    pub fn contains(&self, id: &ToyId) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Unsave every selected toy, then leave multi-select mode.
    ///
    /// Returns the handle of the last write; writes complete in order, so
    /// waiting on it covers the whole removal.
    pub fn remove_from(&mut self, store: &SavedItemsStore) -> Option<Persisting> {
        let mut last = None;
        let mut removed = 0;
        for id in &self.selected {
            if store.is_saved(id) {
                last = Some(store.toggle(id));
                removed += 1;
            }
        }

        tracing::info!("Removed {} toys from the saved list", removed);
        self.cancel();
        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter_saved;
    use crate::storage::{KeyValueStorage, MemoryKeyValueStore};
    use crate::saved::SAVED_ITEMS_KEY;
    use std::sync::Arc;

    fn toy(id: u64, name: &str) -> Toy {
        Toy {
            id: ToyId::from(id),
            toy_name: name.to_string(),
            company: "Bandai".to_string(),
            price: 15.0,
            limited_time_deal: 0.0,
            toy_description: String::new(),
            image: String::new(),
            sold_out: false,
            comments: Vec::new(),
        }
    }

    #[test]
    fn test_begin_and_toggle() {
        let mut selection = Selection::new();
        assert!(!selection.is_active());

        selection.begin(&ToyId::from(1u64));
        assert!(selection.is_active());
        assert!(selection.contains(&ToyId::from(1u64)));

        selection.toggle(&ToyId::from(2u64));
        selection.toggle(&ToyId::from(1u64));
        assert_eq!(selection.len(), 1);
        assert!(selection.contains(&ToyId::from(2u64)));
    }

    #[test]
    fn test_select_all_and_cancel() {
        let toys = vec![toy(1, "Robot"), toy(2, "Doll")];
        let mut selection = Selection::new();
        selection.begin(&ToyId::from(1u64));
        selection.select_all(&toys);
        assert_eq!(selection.len(), 2);

        selection.cancel();
        assert!(!selection.is_active());
        assert!(selection.is_empty());
    }

    #[tokio::test]
    async fn test_remove_selected_from_saved() {
        let storage = Arc::new(MemoryKeyValueStore::new());
        let store = SavedItemsStore::load(storage.clone()).await;
        let toys = vec![toy(1, "Robot"), toy(2, "Doll"), toy(3, "Gundam")];
        for t in &toys {
            store.toggle(&t.id);
        }

        let mut selection = Selection::new();
        selection.begin(&ToyId::from(1u64));
        selection.toggle(&ToyId::from(3u64));

        let persisting = selection.remove_from(&store).unwrap();
        persisting.wait().await.unwrap();

        assert!(!selection.is_active());
        assert_eq!(store.saved_ids(), vec![ToyId::from(2u64)]);
        assert_eq!(
            storage.get_item(SAVED_ITEMS_KEY).unwrap().as_deref(),
            Some("[\"2\"]")
        );
        assert_eq!(filter_saved(&toys, &store, "").len(), 1);
    }

    #[tokio::test]
    async fn test_remove_skips_unsaved_ids() {
        let store = SavedItemsStore::load(Arc::new(MemoryKeyValueStore::new())).await;
        let mut selection = Selection::new();
        selection.begin(&ToyId::from(7u64));

        assert!(selection.remove_from(&store).is_none());
        assert!(!store.is_saved(&ToyId::from(7u64)));
    }
}
