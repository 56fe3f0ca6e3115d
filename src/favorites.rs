use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use log::{error, warn};

use crate::storage::KeyValueStore;

/// Storage key the serialized id list lives under.
pub const FAVORITES_KEY: &str = "recipes:favorites";

/// Authoritative in-memory set of favorited recipe ids, written through to a
/// durable store on every mutation.
///
/// Ids keep their insertion order and appear at most once. The in-memory set
/// is the source of truth for the running process; persistence is best-effort
/// and failures are logged, never surfaced to callers.
pub struct Favorites {
    store: Arc<dyn KeyValueStore>,
    ids: Mutex<Vec<u64>>,
    // Serializes mutation+persist pairs so the store always ends up holding
    // the latest in-memory state (full-set writes, last write wins).
    write_gate: tokio::sync::Mutex<()>,
    ready: AtomicBool,
}

impl Favorites {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Favorites {
            store,
            ids: Mutex::new(Vec::new()),
            write_gate: tokio::sync::Mutex::new(()),
            ready: AtomicBool::new(false),
        }
    }

    /// Load the persisted id list. Call once at startup, before favorite
    /// state is shown to the user.
    ///
    /// A missing key yields an empty set. A malformed or unreadable value is
    /// logged and also falls back to an empty set; this never fails.
    pub async fn initialize(&self) {
        let loaded = match self.store.get(FAVORITES_KEY).await {
            Ok(Some(body)) => match serde_json::from_str::<Vec<u64>>(&body) {
                Ok(ids) => ids,
                Err(e) => {
                    error!("Discarding malformed favorites value: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                error!("Failed to load favorites: {}", e);
                Vec::new()
            }
        };

        let mut deduped = Vec::with_capacity(loaded.len());
        for id in loaded {
            if !deduped.contains(&id) {
                deduped.push(id);
            }
        }
        *self.ids.lock().unwrap() = deduped;
        self.ready.store(true, Ordering::Release);
    }

    /// True once `initialize` has completed and favorite state is authoritative.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Mark a recipe as favorite. Adding an id that is already present is a
    /// no-op and issues no write.
    pub async fn add(&self, id: u64) {
        let _gate = self.write_gate.lock().await;
        let snapshot = {
            let mut ids = self.ids.lock().unwrap();
            if ids.contains(&id) {
                return;
            }
            ids.push(id);
            ids.clone()
        };
        self.persist(&snapshot).await;
    }

    /// Unmark a recipe. Removing an absent id is a no-op and issues no write.
    pub async fn remove(&self, id: u64) {
        let _gate = self.write_gate.lock().await;
        let snapshot = {
            let mut ids = self.ids.lock().unwrap();
            let before = ids.len();
            ids.retain(|fav| *fav != id);
            if ids.len() == before {
                return;
            }
            ids.clone()
        };
        self.persist(&snapshot).await;
    }

    /// Pure read of in-memory state; no I/O.
    pub fn is_favorite(&self, id: u64) -> bool {
        self.ids.lock().unwrap().contains(&id)
    }

    /// Snapshot of the favorited ids in insertion order.
    pub fn ids(&self) -> Vec<u64> {
        self.ids.lock().unwrap().clone()
    }

    async fn persist(&self, ids: &[u64]) {
        if !self.is_ready() {
            warn!("Persisting favorites before initialize() completed");
        }
        let body = match serde_json::to_string(ids) {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to serialize favorites: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(FAVORITES_KEY, &body).await {
            // In-memory state stays authoritative; durability is best-effort.
            error!("Failed to persist favorites: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn seeded(value: &str) -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new().seed(FAVORITES_KEY, value))
    }

    #[tokio::test]
    async fn net_effect_of_add_remove_sequence_wins() {
        let favorites = Favorites::new(Arc::new(MemoryStore::new()));
        favorites.initialize().await;

        favorites.add(5).await;
        favorites.add(5).await;
        favorites.remove(9).await;
        favorites.add(9).await;
        favorites.remove(5).await;

        assert!(!favorites.is_favorite(5));
        assert!(favorites.is_favorite(9));
        assert_eq!(favorites.ids(), vec![9]);
    }

    #[tokio::test]
    async fn initialize_reads_preseeded_set() {
        let favorites = Favorites::new(seeded("[3,7,9]"));
        assert!(!favorites.is_ready());
        favorites.initialize().await;

        assert!(favorites.is_ready());
        assert!(favorites.is_favorite(7));
        assert!(!favorites.is_favorite(1));
    }

    #[tokio::test]
    async fn add_round_trips_through_store() {
        let store = Arc::new(MemoryStore::new());

        let favorites = Favorites::new(store.clone());
        favorites.initialize().await;
        favorites.add(5).await;

        let reopened = Favorites::new(store);
        reopened.initialize().await;
        assert!(reopened.is_favorite(5));
    }

    #[tokio::test]
    async fn malformed_persisted_value_falls_back_to_empty() {
        let favorites = Favorites::new(seeded("{\"oops\": true}"));
        favorites.initialize().await;

        assert!(favorites.is_ready());
        assert!(favorites.ids().is_empty());
    }

    #[tokio::test]
    async fn redundant_add_issues_no_write() {
        let store = Arc::new(MemoryStore::new().seed(FAVORITES_KEY, "[4]"));
        let favorites = Favorites::new(store.clone());
        favorites.initialize().await;

        favorites.add(4).await;
        // The stored value was never rewritten, so it still has the seed's exact form.
        assert_eq!(store.get(FAVORITES_KEY).await.unwrap().as_deref(), Some("[4]"));
    }

    #[tokio::test]
    async fn duplicate_ids_in_store_are_collapsed_on_load() {
        let favorites = Favorites::new(seeded("[2,2,8,2]"));
        favorites.initialize().await;
        assert_eq!(favorites.ids(), vec![2, 8]);
    }
}
