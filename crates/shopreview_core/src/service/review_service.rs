//! Review use-case service.
//!
//! # Responsibility
//! - Provide review CRUD entry points and independent re-association of
//!   either side of the edge.
//! - Build `ReviewDict`, resolving the customer and item one level deep.
//!
//! # Invariants
//! - A set foreign key that resolves to nothing is reported as
//!   `RepoError::InvalidData`, never silently rendered as `null`.

use crate::model::customer::{Customer, CustomerId};
use crate::model::item::{Item, ItemId};
use crate::model::review::{NewReview, Review, ReviewId};
use crate::model::view::ReviewDict;
use crate::repo::customer_repo::{CustomerRepository, SqliteCustomerRepository};
use crate::repo::item_repo::{ItemRepository, SqliteItemRepository};
use crate::repo::review_repo::{ReviewRepository, SqliteReviewRepository};
use crate::repo::{EntityKind, ListQuery, RepoError, RepoResult};
use rusqlite::Connection;

/// Use-case service wrapper for review operations.
pub struct ReviewService<R, C, I> {
    reviews: R,
    customers: C,
    items: I,
}

impl<'conn>
    ReviewService<
        SqliteReviewRepository<'conn>,
        SqliteCustomerRepository<'conn>,
        SqliteItemRepository<'conn>,
    >
{
    /// Builds the service over SQLite repositories sharing one connection.
    pub fn sqlite(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self::new(
            SqliteReviewRepository::try_new(conn)?,
            SqliteCustomerRepository::try_new(conn)?,
            SqliteItemRepository::try_new(conn)?,
        ))
    }
}

impl<R, C, I> ReviewService<R, C, I>
where
    R: ReviewRepository,
    C: CustomerRepository,
    I: ItemRepository,
{
    pub fn new(reviews: R, customers: C, items: I) -> Self {
        Self {
            reviews,
            customers,
            items,
        }
    }

    /// Inserts a review and returns it with its storage-assigned id.
    ///
    /// Fails with `RepoError::ForeignKeyViolation` when a set id does not
    /// reference an existing customer or item.
    pub fn create_review(
        &self,
        comment: Option<String>,
        customer_id: Option<CustomerId>,
        item_id: Option<ItemId>,
    ) -> RepoResult<Review> {
        let draft = NewReview {
            comment,
            customer_id,
            item_id,
        };
        let id = self.reviews.create_review(&draft)?;
        Ok(draft.into_review(id))
    }

    pub fn get_review(&self, id: ReviewId) -> RepoResult<Option<Review>> {
        self.reviews.get_review(id)
    }

    pub fn list_reviews(&self, query: &ListQuery) -> RepoResult<Vec<Review>> {
        self.reviews.list_reviews(query)
    }

    pub fn list_reviews_for_customer(&self, customer_id: CustomerId) -> RepoResult<Vec<Review>> {
        self.reviews.list_reviews_for_customer(customer_id)
    }

    pub fn list_reviews_for_item(&self, item_id: ItemId) -> RepoResult<Vec<Review>> {
        self.reviews.list_reviews_for_item(item_id)
    }

    /// Re-saves a mutated review record (comment and both associations).
    pub fn update_review(&self, review: &Review) -> RepoResult<()> {
        self.reviews.update_review(review)
    }

    /// Points the review at another customer, or detaches it with `None`.
    pub fn set_customer(
        &self,
        id: ReviewId,
        customer_id: Option<CustomerId>,
    ) -> RepoResult<Review> {
        let mut review = self.require_review(id)?;
        review.customer_id = customer_id;
        self.reviews.update_review(&review)?;
        Ok(review)
    }

    /// Points the review at another item, or detaches it with `None`.
    pub fn set_item(&self, id: ReviewId, item_id: Option<ItemId>) -> RepoResult<Review> {
        let mut review = self.require_review(id)?;
        review.item_id = item_id;
        self.reviews.update_review(&review)?;
        Ok(review)
    }

    pub fn delete_review(&self, id: ReviewId) -> RepoResult<()> {
        self.reviews.delete_review(id)
    }

    /// Resolves the customer the review belongs to, if any.
    pub fn review_customer(&self, review: &Review) -> RepoResult<Option<Customer>> {
        let Some(customer_id) = review.customer_id else {
            return Ok(None);
        };
        self.customers
            .get_customer(customer_id)?
            .map(Some)
            .ok_or_else(|| dangling(review.id, EntityKind::Customer, customer_id))
    }

    /// Resolves the item the review is about, if any.
    pub fn review_item(&self, review: &Review) -> RepoResult<Option<Item>> {
        let Some(item_id) = review.item_id else {
            return Ok(None);
        };
        self.items
            .get_item(item_id)?
            .map(Some)
            .ok_or_else(|| dangling(review.id, EntityKind::Item, item_id))
    }

    /// Returns `{id, comment, customer, item}` for the review, or `None` if
    /// absent.
    pub fn review_dict(&self, id: ReviewId) -> RepoResult<Option<ReviewDict>> {
        let Some(review) = self.reviews.get_review(id)? else {
            return Ok(None);
        };
        let customer = self.review_customer(&review)?;
        let item = self.review_item(&review)?;
        Ok(Some(review.to_dict(customer.as_ref(), item.as_ref())))
    }

    fn require_review(&self, id: ReviewId) -> RepoResult<Review> {
        self.reviews.get_review(id)?.ok_or(RepoError::NotFound {
            entity: EntityKind::Review,
            id,
        })
    }
}

fn dangling(review_id: ReviewId, entity: EntityKind, id: i64) -> RepoError {
    RepoError::InvalidData(format!("review {review_id} references missing {entity} {id}"))
}
