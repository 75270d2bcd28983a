//! In-memory application stores. Clones share the same data.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::model::{Item, ItemKind, NewItem, Profile};

/// Contact details per username.
#[derive(Clone, Default)]
pub struct ProfileStore {
    profiles: Arc<RwLock<HashMap<String, Profile>>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn save(&self, username: &str, profile: Profile) {
        self.profiles
            .write()
            .await
            .insert(username.to_string(), profile);
    }

    pub async fn get(&self, username: &str) -> Option<Profile> {
        self.profiles.read().await.get(username).cloned()
    }

    pub async fn remove(&self, username: &str) -> Option<Profile> {
        self.profiles.write().await.remove(username)
    }
}

/// Lost and found reports, ordered by id.
#[derive(Clone)]
pub struct ItemStore {
    items: Arc<RwLock<BTreeMap<u64, Item>>>,
    next_id: Arc<AtomicU64>,
}

impl Default for ItemStore {
    fn default() -> Self {
        Self {
            items: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, kind: ItemKind, new_item: NewItem, reporter: &str) -> Item {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let item = new_item.into_item(id, kind, reporter);
        self.items.write().await.insert(id, item.clone());
        item
    }

    pub async fn get(&self, kind: ItemKind, id: u64) -> Option<Item> {
        self.items
            .read()
            .await
            .get(&id)
            .filter(|item| item.kind == kind)
            .cloned()
    }

    pub async fn list(&self, kind: ItemKind) -> Vec<Item> {
        self.items
            .read()
            .await
            .values()
            .filter(|item| item.kind == kind)
            .cloned()
            .collect()
    }

    pub async fn list_by_reporter(&self, kind: ItemKind, reporter: &str) -> Vec<Item> {
        self.items
            .read()
            .await
            .values()
            .filter(|item| item.kind == kind && item.reporter == reporter)
            .cloned()
            .collect()
    }

    pub async fn remove(&self, kind: ItemKind, id: u64) -> Option<Item> {
        let mut items = self.items.write().await;
        match items.get(&id) {
            Some(item) if item.kind == kind => items.remove(&id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn umbrella() -> NewItem {
        NewItem {
            name: "Umbrella".to_string(),
            ..NewItem::default()
        }
    }

    #[tokio::test]
    async fn test_items_are_partitioned_by_kind() {
        let store = ItemStore::new();
        let lost = store.create(ItemKind::Lost, umbrella(), "sam").await;
        let found = store.create(ItemKind::Found, umbrella(), "kim").await;

        assert_ne!(lost.id, found.id);
        assert_eq!(store.list(ItemKind::Lost).await, vec![lost.clone()]);
        assert_eq!(store.get(ItemKind::Found, lost.id).await, None);
        assert_eq!(store.remove(ItemKind::Found, lost.id).await, None);
        assert_eq!(store.remove(ItemKind::Lost, lost.id).await, Some(lost));
        assert!(store.list(ItemKind::Lost).await.is_empty());
    }

    #[tokio::test]
    async fn test_list_by_reporter() {
        let store = ItemStore::new();
        store.create(ItemKind::Lost, umbrella(), "sam").await;
        store.create(ItemKind::Lost, umbrella(), "kim").await;

        let mine = store.list_by_reporter(ItemKind::Lost, "sam").await;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].reporter, "sam");
    }

    #[tokio::test]
    async fn test_profiles() {
        let store = ProfileStore::new();
        let profile = Profile {
            email: "sam@example.com".to_string(),
            personal_name: "Sam".to_string(),
        };
        store.save("sam", profile.clone()).await;
        assert_eq!(store.get("sam").await, Some(profile));
        assert!(store.remove("sam").await.is_some());
        assert_eq!(store.get("sam").await, None);
    }
}
