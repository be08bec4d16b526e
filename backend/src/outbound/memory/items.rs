//! In-memory `ItemRepository`.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{ItemRepository, ItemRepositoryError};
use crate::domain::{Item, ItemId, ItemPatch, OwnedResource, UserId};

use super::lock_store;

/// Items in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryItemRepository {
    items: Mutex<Vec<Item>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn is_target(item: &Item, id: &ItemId, owner: &UserId) -> bool {
    item.id() == id && item.owner() == owner
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn insert(&self, item: &Item) -> Result<(), ItemRepositoryError> {
        let mut items = lock_store(&self.items, ItemRepositoryError::query)?;
        if items.iter().any(|existing| existing.id() == item.id()) {
            return Err(ItemRepositoryError::query("duplicate item id"));
        }
        items.push(item.clone());
        Ok(())
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Item>, ItemRepositoryError> {
        let items = lock_store(&self.items, ItemRepositoryError::query)?;
        let mut owned: Vec<Item> = items
            .iter()
            .rev()
            .filter(|item| item.owner() == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(owned)
    }

    async fn find_owned(
        &self,
        id: &ItemId,
        owner: &UserId,
    ) -> Result<Option<Item>, ItemRepositoryError> {
        let items = lock_store(&self.items, ItemRepositoryError::query)?;
        Ok(items.iter().find(|item| is_target(item, id, owner)).cloned())
    }

    async fn update_owned(
        &self,
        id: &ItemId,
        owner: &UserId,
        patch: &ItemPatch,
    ) -> Result<Option<Item>, ItemRepositoryError> {
        let mut items = lock_store(&self.items, ItemRepositoryError::query)?;
        Ok(items
            .iter_mut()
            .find(|item| is_target(item, id, owner))
            .map(|item| {
                *item = item.patched(patch);
                item.clone()
            }))
    }

    async fn delete_owned(&self, id: &ItemId, owner: &UserId) -> Result<bool, ItemRepositoryError> {
        let mut items = lock_store(&self.items, ItemRepositoryError::query)?;
        let before = items.len();
        items.retain(|item| !is_target(item, id, owner));
        Ok(items.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Description, ImageUrl, ItemDetails, Location, Price, Title};
    use crate::test_support::fixture_timestamp;
    use chrono::TimeDelta;
    use rstest::rstest;

    fn details(title: &str) -> ItemDetails {
        ItemDetails {
            title: Title::new(title).expect("title"),
            description: Description::new("Barely used").expect("description"),
            price: Price::parse("250").expect("price"),
            location: Location::new("mumbai").expect("location"),
            category: Category::Tools,
            image: ImageUrl::new("https://images.example.com/drill.png").expect("image"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn listing_is_newest_first_and_owner_scoped() {
        let repo = InMemoryItemRepository::new();
        let owner = UserId::random();
        let older = Item::list(ItemId::random(), owner, details("Drill"), fixture_timestamp());
        let newer = Item::list(
            ItemId::random(),
            owner,
            details("Saw"),
            fixture_timestamp() + TimeDelta::minutes(5),
        );
        let foreign = Item::list(
            ItemId::random(),
            UserId::random(),
            details("Ladder"),
            fixture_timestamp(),
        );
        for item in [&older, &newer, &foreign] {
            repo.insert(item).await.expect("insert");
        }

        let listed = repo.list_by_owner(&owner).await.expect("list");

        assert_eq!(listed, vec![newer, older]);
    }

    #[rstest]
    #[tokio::test]
    async fn mutations_require_matching_owner() {
        let repo = InMemoryItemRepository::new();
        let owner = UserId::random();
        let item = Item::list(ItemId::random(), owner, details("Drill"), fixture_timestamp());
        repo.insert(&item).await.expect("insert");
        let stranger = UserId::random();
        let patch = ItemPatch {
            title: Some(Title::new("Stolen").expect("title")),
            ..ItemPatch::default()
        };

        assert!(
            repo.update_owned(item.id(), &stranger, &patch)
                .await
                .expect("update")
                .is_none()
        );
        assert!(!repo.delete_owned(item.id(), &stranger).await.expect("delete"));
        assert!(repo.delete_owned(item.id(), &owner).await.expect("delete"));
    }
}
