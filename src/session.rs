use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{KeyValueStore, StoreKey},
    error::AppResult,
    models::{LaptopId, LaptopRecord, PreferenceProfile, ScoredCandidate},
    services::{CatalogStore, ComparisonTable, FavoritesManager, RankedCatalog, ResultFilter, ScoringEngine},
};

/// One user's view of the advisor
///
/// Holds the inputs (catalog snapshot, profile, filter), the ranking derived
/// from them, and the favorites state machine. Changing the profile
/// re-scores the catalog; changing the filter only re-filters the cached
/// ranking.
pub struct AdvisorSession {
    id: Uuid,
    catalog: Arc<CatalogStore>,
    engine: ScoringEngine,
    profile: PreferenceProfile,
    filter: ResultFilter,
    ranked: RankedCatalog,
    rank_passes: u64,
    favorites: FavoritesManager,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl AdvisorSession {
    /// Creates a session with the default profile and no persistence
    pub fn new(catalog: Arc<CatalogStore>, engine: ScoringEngine) -> Self {
        let profile = PreferenceProfile::default();
        let ranked = RankedCatalog::build(&engine, &profile, &catalog);

        Self {
            id: Uuid::new_v4(),
            catalog,
            engine,
            profile,
            filter: ResultFilter::default(),
            ranked,
            rank_passes: 1,
            favorites: FavoritesManager::new(),
            store: None,
        }
    }

    /// Resumes a session, loading its favorites from the store
    ///
    /// Favorites that are no longer in the catalog are kept; they are
    /// skipped when building the comparison table.
    pub fn resume(
        id: Uuid,
        catalog: Arc<CatalogStore>,
        engine: ScoringEngine,
        store: Arc<dyn KeyValueStore>,
    ) -> AppResult<Self> {
        let favorites = FavoritesManager::load(store.as_ref(), &StoreKey::Favorites(id))?;

        let mut session = Self::new(catalog, engine);
        session.id = id;
        session.favorites = favorites;
        session.store = Some(store);

        tracing::info!(
            session_id = %id,
            favorites = session.favorites.len(),
            "Session resumed"
        );

        Ok(session)
    }

    /// Attaches a store; subsequent favorites changes are persisted
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn profile(&self) -> &PreferenceProfile {
        &self.profile
    }

    /// Replaces the profile and re-scores the catalog
    pub fn set_profile(&mut self, profile: PreferenceProfile) {
        self.profile = profile;
        self.ranked = RankedCatalog::build(&self.engine, &self.profile, &self.catalog);
        self.rank_passes += 1;

        tracing::info!(
            session_id = %self.id,
            purpose = %self.profile.purpose,
            budget = self.profile.budget,
            "Preferences updated"
        );
    }

    /// Number of times the catalog has been scored in this session
    ///
    /// Diagnostic counter: only profile changes increment it, so callers can
    /// confirm that search and brand changes reuse the cached ranking.
    pub fn rank_passes(&self) -> u64 {
        self.rank_passes
    }

    pub fn filter(&self) -> &ResultFilter {
        &self.filter
    }

    /// Replaces search text and brand filter; does not re-score
    pub fn set_filter(&mut self, filter: ResultFilter) {
        self.filter = filter;
    }

    /// Clears search text and brand filter
    pub fn reset_filter(&mut self) {
        self.filter = ResultFilter::default();
    }

    pub fn ranking(&self) -> &RankedCatalog {
        &self.ranked
    }

    /// Ranked candidates passing the current filter
    pub fn results(&self) -> Vec<&ScoredCandidate> {
        let results = self.ranked.filter(&self.filter);
        if results.is_empty() && !self.filter.is_reset() {
            tracing::debug!(
                session_id = %self.id,
                search = %self.filter.search,
                "No laptops match the current filter"
            );
        }
        results
    }

    pub fn details(&self, id: &LaptopId) -> AppResult<&LaptopRecord> {
        self.catalog.details(id)
    }

    pub fn favorites(&self) -> &FavoritesManager {
        &self.favorites
    }

    /// Saves a laptop; ids missing from the catalog are ignored
    pub fn favorite(&mut self, id: LaptopId) -> bool {
        if !self.catalog.contains(&id) {
            tracing::warn!(session_id = %self.id, laptop_id = %id, "Ignoring favorite for unknown laptop");
            return false;
        }
        let changed = self.favorites.favorite(id);
        self.persist_if(changed)
    }

    pub fn unfavorite(&mut self, id: &LaptopId) -> bool {
        let changed = self.favorites.unfavorite(id);
        self.persist_if(changed)
    }

    pub fn toggle_select(&mut self, id: &LaptopId) -> bool {
        let changed = self.favorites.toggle_select(id);
        self.persist_if(changed)
    }

    pub fn exit_comparison(&mut self) -> bool {
        let changed = self.favorites.exit_comparison();
        self.persist_if(changed)
    }

    pub fn select_default_pair(&mut self) -> bool {
        let changed = self.favorites.select_default_pair();
        self.persist_if(changed)
    }

    pub fn comparison_table(&self) -> ComparisonTable {
        ComparisonTable::build(&self.catalog, &self.favorites)
    }

    /// Persists favorites after a change; failures are logged, not undone
    fn persist_if(&self, changed: bool) -> bool {
        if !changed {
            return false;
        }
        if let Some(store) = &self.store {
            if let Err(e) = self.favorites.save(store.as_ref(), &StoreKey::Favorites(self.id)) {
                tracing::error!(session_id = %self.id, error = %e, "Failed to persist favorites");
            }
        }
        true
    }
}
