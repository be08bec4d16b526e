//! PostgreSQL-backed `ItemRepository` implementation using Diesel ORM.
//!
//! Single-item statements always filter on `id` and `owner_id` together, so
//! a foreign item is indistinguishable from a missing one.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{ItemRepository, ItemRepositoryError};
use crate::domain::{
    Category, Description, ImageUrl, Item, ItemDetails, ItemDraft, ItemId, ItemPatch,
    ItemStatus, ListingValidationError, Location, OwnedResource, Price, Title, UserId,
};

use super::diesel_error_mapping::map_basic_diesel_error;
use super::models::{ItemChangeset, ItemRow, NewItemRow};
use super::pool::{DbPool, PoolError};
use super::schema::items;

/// Diesel-backed implementation of the [`ItemRepository`] port.
#[derive(Clone)]
pub struct DieselItemRepository {
    pool: DbPool,
}

impl DieselItemRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ItemRepositoryError {
    ItemRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> ItemRepositoryError {
    map_basic_diesel_error(
        error,
        ItemRepositoryError::query,
        ItemRepositoryError::connection,
    )
}

fn row_to_item(row: ItemRow) -> Result<Item, ItemRepositoryError> {
    let id = row.id;
    let build = || -> Result<Item, ListingValidationError> {
        let details = ItemDetails {
            title: Title::new(&row.title)?,
            description: Description::new(&row.description)?,
            price: Price::new(row.price)?,
            location: Location::new(&row.location)?,
            category: Category::from_str(&row.category)?,
            image: ImageUrl::new(&row.image_url)?,
        };
        Ok(Item::from(ItemDraft {
            id: ItemId::from_uuid(row.id),
            owner: UserId::from_uuid(row.owner_id),
            details,
            status: ItemStatus::from_str(&row.status)?,
            created_at: row.created_at,
        }))
    };
    build().map_err(|err| {
        warn!(item_id = %id, error = %err, "stored item row failed validation");
        ItemRepositoryError::query("stored item row is invalid")
    })
}

fn rows_to_items(rows: Vec<ItemRow>) -> Result<Vec<Item>, ItemRepositoryError> {
    rows.into_iter().map(row_to_item).collect()
}

#[async_trait]
impl ItemRepository for DieselItemRepository {
    async fn insert(&self, item: &Item) -> Result<(), ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let details = item.details();
        let row = NewItemRow {
            id: *item.id().as_uuid(),
            owner_id: *item.owner().as_uuid(),
            title: details.title.as_ref(),
            description: details.description.as_ref(),
            price: details.price.amount(),
            location: details.location.as_ref(),
            category: details.category.as_str(),
            image_url: details.image.as_str(),
            status: item.status().as_str(),
            created_at: item.created_at(),
        };
        diesel::insert_into(items::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ItemRow> = items::table
            .filter(items::owner_id.eq(*owner.as_uuid()))
            .order((items::created_at.desc(), items::id.desc()))
            .select(ItemRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_items(rows)
    }

    async fn find_owned(
        &self,
        id: &ItemId,
        owner: &UserId,
    ) -> Result<Option<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ItemRow> = items::table
            .filter(items::id.eq(*id.as_uuid()))
            .filter(items::owner_id.eq(*owner.as_uuid()))
            .select(ItemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_item).transpose()
    }

    async fn update_owned(
        &self,
        id: &ItemId,
        owner: &UserId,
        patch: &ItemPatch,
    ) -> Result<Option<Item>, ItemRepositoryError> {
        if patch.is_empty() {
            return self.find_owned(id, owner).await;
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = ItemChangeset {
            title: patch.title.as_ref().map(Title::as_ref),
            description: patch.description.as_ref().map(Description::as_ref),
            price: patch.price.as_ref().map(Price::amount),
            location: patch.location.as_ref().map(Location::as_ref),
            category: patch.category.map(Category::as_str),
            image_url: patch.image.as_ref().map(ImageUrl::as_str),
        };
        let row: Option<ItemRow> = diesel::update(
            items::table
                .filter(items::id.eq(*id.as_uuid()))
                .filter(items::owner_id.eq(*owner.as_uuid())),
        )
        .set(&changeset)
        .returning(ItemRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        row.map(row_to_item).transpose()
    }

    async fn delete_owned(&self, id: &ItemId, owner: &UserId) -> Result<bool, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            items::table
                .filter(items::id.eq(*id.as_uuid()))
                .filter(items::owner_id.eq(*owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn row(category: &str, price: Decimal) -> ItemRow {
        ItemRow {
            id: uuid::Uuid::new_v4(),
            owner_id: uuid::Uuid::new_v4(),
            title: "Trek Marlin 5".to_owned(),
            description: "Hardtail, size M".to_owned(),
            price,
            location: "pune".to_owned(),
            category: category.to_owned(),
            image_url: "https://images.example.com/marlin.jpg".to_owned(),
            status: "available".to_owned(),
            created_at: chrono::Utc::now(),
        }
    }

    #[rstest]
    fn valid_rows_become_items() {
        let source = row("sports", Decimal::new(1500, 2));
        let owner = source.owner_id;

        let item = row_to_item(source).expect("valid row");

        assert_eq!(item.owner().as_uuid(), &owner);
        assert_eq!(item.details().category, Category::Sports);
        assert_eq!(item.status(), ItemStatus::Available);
    }

    #[rstest]
    #[case("https://img.example.com/drill.jpg".to_owned())]
    #[case(format!("https://img.example.com/{}", "é".repeat(330)))]
    fn accepted_image_urls_read_back(#[case] raw: String) {
        let image = ImageUrl::new(&raw).expect("accepted on write");
        let mut source = row("tools", Decimal::new(30000, 2));
        source.image_url = image.as_str().to_owned();

        let item = row_to_item(source).expect("stored url revalidates");

        assert_eq!(item.details().image, image);
    }

    #[rstest]
    #[case(row("boats", Decimal::new(1500, 2)))]
    #[case(row("sports", Decimal::ZERO))]
    fn invalid_rows_are_query_errors(#[case] source: ItemRow) {
        let error = row_to_item(source).expect_err("invalid row");
        assert!(matches!(error, ItemRepositoryError::Query { .. }));
    }
}
