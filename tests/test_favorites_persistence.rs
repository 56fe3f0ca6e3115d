use std::sync::Arc;

use recipe_browse::{Favorites, FileStore, FAVORITES_KEY};

#[tokio::test]
async fn favorites_survive_a_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favorites.json");

    {
        let favorites = Favorites::new(Arc::new(FileStore::new(&path)));
        favorites.initialize().await;
        favorites.add(5).await;
        favorites.add(12).await;
        favorites.remove(5).await;
    }

    // Fresh process: same file, new manager.
    let favorites = Favorites::new(Arc::new(FileStore::new(&path)));
    favorites.initialize().await;
    assert!(favorites.is_favorite(12));
    assert!(!favorites.is_favorite(5));
    assert_eq!(favorites.ids(), vec![12]);
}

#[tokio::test]
async fn corrupt_favorites_file_initializes_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favorites.json");
    std::fs::write(&path, "]]]garbage").unwrap();

    let favorites = Favorites::new(Arc::new(FileStore::new(&path)));
    favorites.initialize().await;

    assert!(favorites.is_ready());
    assert!(favorites.ids().is_empty());

    // The manager keeps working and repairs the file on the next write.
    favorites.add(3).await;
    let reopened = Favorites::new(Arc::new(FileStore::new(&path)));
    reopened.initialize().await;
    assert_eq!(reopened.ids(), vec![3]);
}

#[tokio::test]
async fn persisted_value_is_a_plain_id_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favorites.json");

    let store = Arc::new(FileStore::new(&path));
    let favorites = Favorites::new(store.clone());
    favorites.initialize().await;
    favorites.add(3).await;
    favorites.add(7).await;

    use recipe_browse::KeyValueStore;
    let raw = store.get(FAVORITES_KEY).await.unwrap().unwrap();
    let ids: Vec<u64> = serde_json::from_str(&raw).unwrap();
    assert_eq!(ids, vec![3, 7]);
}
