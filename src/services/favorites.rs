use crate::{
    db::{KeyValueStore, StoreKey},
    error::AppResult,
    models::{ComparisonMode, FavoriteEntry, FavoritesSnapshot, LaptopId},
};

/// Number of selected favorites needed for side-by-side comparison
pub const MIN_COMPARISON_SIZE: usize = 2;

/// Saved laptops and the comparison selection
///
/// Entries stay in the order they were favorited. Comparison is
/// all-or-nothing: whenever the manager leaves `Comparing`, every selected
/// flag is cleared, so a partial comparison set is never exposed.
///
/// Operations on identifiers the manager does not know are no-ops. Mutating
/// operations return whether anything changed.
#[derive(Debug, Clone, Default)]
pub struct FavoritesManager {
    entries: Vec<FavoriteEntry>,
    mode: ComparisonMode,
}

impl FavoritesManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves a laptop; favoriting twice keeps a single entry
    pub fn favorite(&mut self, id: LaptopId) -> bool {
        if self.contains(&id) {
            return false;
        }
        tracing::debug!(laptop_id = %id, "Favorite added");
        self.entries.push(FavoriteEntry::new(id));
        true
    }

    /// Removes a laptop whether or not it is selected
    ///
    /// Dropping below two selected entries while comparing ends the
    /// comparison.
    pub fn unfavorite(&mut self, id: &LaptopId) -> bool {
        let Some(position) = self.position(id) else {
            return false;
        };
        self.entries.remove(position);
        tracing::debug!(laptop_id = %id, "Favorite removed");

        if self.mode == ComparisonMode::Comparing && self.selected_count() < MIN_COMPARISON_SIZE {
            self.leave_comparison();
        }
        true
    }

    /// Flips the selection flag and recomputes the mode
    pub fn toggle_select(&mut self, id: &LaptopId) -> bool {
        let Some(position) = self.position(id) else {
            return false;
        };
        let entry = &mut self.entries[position];
        entry.selected = !entry.selected;

        if self.selected_count() >= MIN_COMPARISON_SIZE {
            if self.mode == ComparisonMode::Idle {
                tracing::debug!(selected = self.selected_count(), "Comparison started");
            }
            self.mode = ComparisonMode::Comparing;
        } else if self.mode == ComparisonMode::Comparing {
            self.leave_comparison();
        }
        true
    }

    /// Ends the comparison and clears every selection, regardless of count
    pub fn exit_comparison(&mut self) -> bool {
        let changed = self.mode == ComparisonMode::Comparing || self.selected_count() > 0;
        self.leave_comparison();
        changed
    }

    /// Selects the two earliest favorites and starts comparing
    ///
    /// Only applies while idle with at least two favorites.
    pub fn select_default_pair(&mut self) -> bool {
        if self.mode != ComparisonMode::Idle || self.entries.len() < MIN_COMPARISON_SIZE {
            return false;
        }
        for (position, entry) in self.entries.iter_mut().enumerate() {
            entry.selected = position < MIN_COMPARISON_SIZE;
        }
        self.mode = ComparisonMode::Comparing;
        tracing::debug!("Comparison started with default pair");
        true
    }

    pub fn mode(&self) -> ComparisonMode {
        self.mode
    }

    pub fn is_comparing(&self) -> bool {
        self.mode == ComparisonMode::Comparing
    }

    /// All favorites in favoriting order
    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &LaptopId) -> bool {
        self.position(id).is_some()
    }

    pub fn is_selected(&self, id: &LaptopId) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.id == *id && entry.selected)
    }

    /// Selected entries in favoriting order, whatever the mode
    pub fn selected(&self) -> Vec<&FavoriteEntry> {
        self.entries.iter().filter(|entry| entry.selected).collect()
    }

    pub fn selected_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.selected).count()
    }

    /// Entries being compared, in favoriting order; empty unless comparing
    pub fn comparison(&self) -> Vec<&FavoriteEntry> {
        if self.is_comparing() {
            self.selected()
        } else {
            Vec::new()
        }
    }

    pub fn snapshot(&self) -> FavoritesSnapshot {
        FavoritesSnapshot {
            entries: self.entries.clone(),
        }
    }

    /// Rebuilds a manager from a snapshot
    ///
    /// Duplicate ids keep their first occurrence. A snapshot with a single
    /// selected entry comes back idle with no selection.
    pub fn restore(snapshot: FavoritesSnapshot) -> Self {
        let mut manager = Self::new();
        for entry in snapshot.entries {
            if !manager.contains(&entry.id) {
                manager.entries.push(entry);
            }
        }

        if manager.selected_count() >= MIN_COMPARISON_SIZE {
            manager.mode = ComparisonMode::Comparing;
        } else {
            manager.leave_comparison();
        }
        manager
    }

    /// Writes the current state to a key-value store
    pub fn save(&self, store: &dyn KeyValueStore, key: &StoreKey) -> AppResult<()> {
        let value = serde_json::to_string(&self.snapshot())?;
        store.set(&key.to_string(), &value)
    }

    /// Reads state from a key-value store; a missing key yields an empty manager
    pub fn load(store: &dyn KeyValueStore, key: &StoreKey) -> AppResult<Self> {
        match store.get(&key.to_string())? {
            Some(value) => {
                let snapshot: FavoritesSnapshot = serde_json::from_str(&value)?;
                let manager = Self::restore(snapshot);
                tracing::info!(
                    key = %key,
                    favorites = manager.len(),
                    mode = ?manager.mode,
                    "Favorites loaded"
                );
                Ok(manager)
            }
            None => Ok(Self::new()),
        }
    }

    fn position(&self, id: &LaptopId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == *id)
    }

    fn leave_comparison(&mut self) {
        if self.mode == ComparisonMode::Comparing {
            tracing::debug!("Comparison ended");
        }
        self.mode = ComparisonMode::Idle;
        for entry in &mut self.entries {
            entry.selected = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, MockKeyValueStore};
    use crate::error::AppError;
    use uuid::Uuid;

    fn id(value: &str) -> LaptopId {
        LaptopId::from(value)
    }

    fn with_favorites(ids: &[&str]) -> FavoritesManager {
        let mut manager = FavoritesManager::new();
        for value in ids {
            manager.favorite(id(value));
        }
        manager
    }

    fn selected_ids(manager: &FavoritesManager) -> Vec<&str> {
        manager.comparison().into_iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_favorite_is_idempotent() {
        let mut manager = FavoritesManager::new();
        assert!(manager.favorite(id("a")));
        assert!(!manager.favorite(id("a")));
        assert_eq!(manager.len(), 1);
        assert!(!manager.entries()[0].selected);
    }

    #[test]
    fn test_two_selections_start_comparison() {
        let mut manager = with_favorites(&["a", "b", "c"]);
        manager.toggle_select(&id("a"));
        assert_eq!(manager.mode(), ComparisonMode::Idle);
        assert!(manager.comparison().is_empty());

        manager.toggle_select(&id("b"));
        assert_eq!(manager.mode(), ComparisonMode::Comparing);
    }

    #[test]
    fn test_comparison_keeps_favoriting_order() {
        let mut manager = with_favorites(&["a", "b", "c"]);
        manager.toggle_select(&id("c"));
        manager.toggle_select(&id("a"));
        assert_eq!(manager.mode(), ComparisonMode::Comparing);
        assert_eq!(selected_ids(&manager), vec!["a", "c"]);
    }

    #[test]
    fn test_deselect_to_one_clears_remaining() {
        let mut manager = with_favorites(&["a", "b"]);
        manager.toggle_select(&id("a"));
        manager.toggle_select(&id("b"));
        manager.toggle_select(&id("b"));

        assert_eq!(manager.mode(), ComparisonMode::Idle);
        assert!(!manager.is_selected(&id("a")));
        assert_eq!(manager.selected_count(), 0);
    }

    #[test]
    fn test_three_to_two_stays_comparing() {
        let mut manager = with_favorites(&["a", "b", "c"]);
        for value in ["a", "b", "c"] {
            manager.toggle_select(&id(value));
        }
        manager.toggle_select(&id("b"));
        assert_eq!(manager.mode(), ComparisonMode::Comparing);
        assert_eq!(selected_ids(&manager), vec!["a", "c"]);
    }

    #[test]
    fn test_unfavorite_selected_ends_comparison() {
        let mut manager = with_favorites(&["a", "b", "c"]);
        manager.toggle_select(&id("a"));
        manager.toggle_select(&id("b"));

        assert!(manager.unfavorite(&id("b")));
        assert_eq!(manager.mode(), ComparisonMode::Idle);
        assert!(!manager.is_selected(&id("a")));
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_unfavorite_unselected_keeps_comparison() {
        let mut manager = with_favorites(&["a", "b", "c"]);
        manager.toggle_select(&id("a"));
        manager.toggle_select(&id("b"));

        manager.unfavorite(&id("c"));
        assert_eq!(manager.mode(), ComparisonMode::Comparing);
        assert_eq!(selected_ids(&manager), vec!["a", "b"]);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut manager = with_favorites(&["a"]);
        assert!(!manager.unfavorite(&id("zzz")));
        assert!(!manager.toggle_select(&id("zzz")));
        manager.unfavorite(&id("a"));
        assert!(!manager.unfavorite(&id("a")));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_exit_comparison_clears_everything() {
        let mut manager = with_favorites(&["a", "b", "c"]);
        for value in ["a", "b", "c"] {
            manager.toggle_select(&id(value));
        }
        assert!(manager.exit_comparison());
        assert_eq!(manager.mode(), ComparisonMode::Idle);
        assert_eq!(manager.selected_count(), 0);
        assert!(!manager.exit_comparison());
    }

    #[test]
    fn test_exit_comparison_clears_single_selection() {
        let mut manager = with_favorites(&["a", "b"]);
        manager.toggle_select(&id("b"));
        assert!(manager.exit_comparison());
        assert_eq!(manager.selected_count(), 0);
    }

    #[test]
    fn test_select_default_pair() {
        let mut manager = with_favorites(&["a"]);
        assert!(!manager.select_default_pair());

        manager.favorite(id("b"));
        manager.favorite(id("c"));
        manager.toggle_select(&id("c"));
        assert!(manager.select_default_pair());
        assert_eq!(manager.mode(), ComparisonMode::Comparing);
        assert_eq!(selected_ids(&manager), vec!["a", "b"]);

        // Already comparing
        assert!(!manager.select_default_pair());
    }

    #[test]
    fn test_restore_rederives_mode() {
        let mut manager = with_favorites(&["a", "b", "c"]);
        manager.toggle_select(&id("a"));
        manager.toggle_select(&id("c"));

        let restored = FavoritesManager::restore(manager.snapshot());
        assert_eq!(restored.mode(), ComparisonMode::Comparing);
        assert_eq!(selected_ids(&restored), vec!["a", "c"]);

        let mut lone = manager.snapshot();
        lone.entries[2].selected = false;
        lone.entries.push(lone.entries[0].clone());
        let restored = FavoritesManager::restore(lone);
        assert_eq!(restored.mode(), ComparisonMode::Idle);
        assert_eq!(restored.selected_count(), 0);
        assert_eq!(restored.len(), 3);
    }

    #[test]
    fn test_save_and_load_round_trip_through_memory_store() {
        let store = MemoryStore::new();
        let key = StoreKey::Favorites(Uuid::new_v4());

        let mut manager = with_favorites(&["a", "b"]);
        manager.select_default_pair();
        manager.save(&store, &key).unwrap();

        let loaded = FavoritesManager::load(&store, &key).unwrap();
        assert!(loaded.is_comparing());
        assert_eq!(loaded.entries(), manager.entries());
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let mut store = MockKeyValueStore::new();
        store.expect_get().times(1).returning(|_| Ok(None));

        let manager = FavoritesManager::load(&store, &StoreKey::Favorites(Uuid::new_v4())).unwrap();
        assert!(manager.is_empty());
        assert_eq!(manager.mode(), ComparisonMode::Idle);
    }

    #[test]
    fn test_load_corrupt_value_is_error() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .returning(|_| Ok(Some("not json".to_string())));

        let result = FavoritesManager::load(&store, &StoreKey::Favorites(Uuid::new_v4()));
        assert!(matches!(result, Err(AppError::Serialization(_))));
    }

    #[test]
    fn test_save_writes_under_key() {
        let session = Uuid::new_v4();
        let expected_key = format!("favorites:{}", session);

        let mut store = MockKeyValueStore::new();
        store
            .expect_set()
            .withf(move |key, value| *key == expected_key && value.contains("\"a\""))
            .times(1)
            .returning(|_, _| Ok(()));

        let manager = with_favorites(&["a"]);
        manager.save(&store, &StoreKey::Favorites(session)).unwrap();
    }
}
