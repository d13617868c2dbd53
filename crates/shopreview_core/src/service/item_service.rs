//! Item use-case service.

use crate::model::item::{Item, ItemId, NewItem};
use crate::model::view::ItemDict;
use crate::repo::item_repo::{ItemRepository, SqliteItemRepository};
use crate::repo::review_repo::{ReviewRepository, SqliteReviewRepository};
use crate::repo::{EntityKind, ListQuery, RepoError, RepoResult};
use rusqlite::Connection;

/// Use-case service wrapper for item operations.
pub struct ItemService<I, R> {
    items: I,
    reviews: R,
}

impl<'conn> ItemService<SqliteItemRepository<'conn>, SqliteReviewRepository<'conn>> {
    /// Builds the service over SQLite repositories sharing one connection.
    pub fn sqlite(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self::new(
            SqliteItemRepository::try_new(conn)?,
            SqliteReviewRepository::try_new(conn)?,
        ))
    }
}

impl<I, R> ItemService<I, R>
where
    I: ItemRepository,
    R: ReviewRepository,
{
    pub fn new(items: I, reviews: R) -> Self {
        Self { items, reviews }
    }

    /// Inserts an item and returns it with its storage-assigned id.
    ///
    /// Fails with `RepoError::Validation` for a non-finite price.
    pub fn create_item(&self, name: Option<String>, price: Option<f64>) -> RepoResult<Item> {
        let draft = NewItem { name, price };
        let id = self.items.create_item(&draft)?;
        Ok(draft.into_item(id))
    }

    pub fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        self.items.get_item(id)
    }

    pub fn list_items(&self, query: &ListQuery) -> RepoResult<Vec<Item>> {
        self.items.list_items(query)
    }

    /// Re-saves a mutated item record.
    pub fn update_item(&self, item: &Item) -> RepoResult<()> {
        self.items.update_item(item)
    }

    /// Replaces the item's price and returns the saved record.
    pub fn reprice_item(&self, id: ItemId, price: Option<f64>) -> RepoResult<Item> {
        let mut item = self.items.get_item(id)?.ok_or(RepoError::NotFound {
            entity: EntityKind::Item,
            id,
        })?;
        item.price = price;
        self.items.update_item(&item)?;
        Ok(item)
    }

    /// Deletes the item together with all of its reviews.
    ///
    /// Returns the number of reviews removed by the cascade.
    pub fn delete_item(&self, id: ItemId) -> RepoResult<usize> {
        self.items.delete_item(id)
    }

    /// Returns `{id, name, price, reviews}` for the item, or `None` if absent.
    pub fn item_dict(&self, id: ItemId) -> RepoResult<Option<ItemDict>> {
        let Some(item) = self.items.get_item(id)? else {
            return Ok(None);
        };
        let reviews = self.reviews.list_reviews_for_item(id)?;
        Ok(Some(item.to_dict(&reviews)))
    }
}
