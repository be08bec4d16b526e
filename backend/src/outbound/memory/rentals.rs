//! In-memory `RentalRepository`.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{RentalRepository, RentalRepositoryError};
use crate::domain::{OwnedResource, Rental, RentalId, UserId};

use super::lock_store;

/// Rentals in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryRentalRepository {
    rentals: Mutex<Vec<Rental>>,
}

impl InMemoryRentalRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RentalRepository for InMemoryRentalRepository {
    async fn insert(&self, rental: &Rental) -> Result<(), RentalRepositoryError> {
        let mut rentals = lock_store(&self.rentals, RentalRepositoryError::query)?;
        if rentals.iter().any(|existing| existing.id() == rental.id()) {
            return Err(RentalRepositoryError::query("duplicate rental id"));
        }
        rentals.push(rental.clone());
        Ok(())
    }

    async fn list_by_requester(
        &self,
        requester: &UserId,
    ) -> Result<Vec<Rental>, RentalRepositoryError> {
        let rentals = lock_store(&self.rentals, RentalRepositoryError::query)?;
        let mut owned: Vec<Rental> = rentals
            .iter()
            .rev()
            .filter(|rental| rental.owner() == requester)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(owned)
    }

    async fn delete_owned(
        &self,
        id: &RentalId,
        requester: &UserId,
    ) -> Result<bool, RentalRepositoryError> {
        let mut rentals = lock_store(&self.rentals, RentalRepositoryError::query)?;
        let before = rentals.len();
        rentals.retain(|rental| !(rental.id() == id && rental.owner() == requester));
        Ok(rentals.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CatalogueItemRef, Price, RentalSnapshot, SnapshotText};
    use crate::test_support::fixture_timestamp;
    use rstest::rstest;

    fn rental(requester: UserId) -> Rental {
        Rental::request(
            RentalId::random(),
            requester,
            CatalogueItemRef::new(3).expect("ref"),
            RentalSnapshot {
                title: SnapshotText::new("Sony A7 III", "title").expect("title"),
                price: Price::parse("900").expect("price"),
                image: SnapshotText::new("a7.png", "image").expect("image"),
                location: SnapshotText::new("delhi", "location").expect("location"),
                description: None,
            },
            fixture_timestamp(),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn cancel_succeeds_once() {
        let repo = InMemoryRentalRepository::new();
        let requester = UserId::random();
        let rental = rental(requester);
        repo.insert(&rental).await.expect("insert");

        assert!(repo.delete_owned(rental.id(), &requester).await.expect("first"));
        assert!(!repo.delete_owned(rental.id(), &requester).await.expect("second"));
    }

    #[rstest]
    #[tokio::test]
    async fn list_only_returns_callers_rentals() {
        let repo = InMemoryRentalRepository::new();
        let mine = rental(UserId::random());
        let theirs = rental(UserId::random());
        repo.insert(&mine).await.expect("insert");
        repo.insert(&theirs).await.expect("insert");

        let listed = repo.list_by_requester(mine.requester()).await.expect("list");

        assert_eq!(listed, vec![mine]);
    }
}
