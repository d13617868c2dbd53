//! Review repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist reviews and their two nullable foreign keys.
//! - Answer both reverse traversals (reviews of a customer, reviews of an
//!   item) from the single stored edge.
//!
//! # Invariants
//! - Every review sequence is ordered by `id ASC`.
//! - Writes referencing a missing customer or item fail with
//!   `RepoError::ForeignKeyViolation`; nothing is inserted or changed.

use crate::model::customer::CustomerId;
use crate::model::item::ItemId;
use crate::model::review::{NewReview, Review, ReviewId};
use crate::repo::{ensure_connection_ready, EntityKind, ListQuery, RepoError, RepoResult};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const REVIEW_SELECT_SQL: &str = "SELECT id, comment, customer_id, item_id FROM reviews";

/// Repository interface for review CRUD and traversal queries.
pub trait ReviewRepository {
    fn create_review(&self, review: &NewReview) -> RepoResult<ReviewId>;
    fn update_review(&self, review: &Review) -> RepoResult<()>;
    fn get_review(&self, id: ReviewId) -> RepoResult<Option<Review>>;
    fn list_reviews(&self, query: &ListQuery) -> RepoResult<Vec<Review>>;
    fn list_reviews_for_customer(&self, customer_id: CustomerId) -> RepoResult<Vec<Review>>;
    fn list_reviews_for_item(&self, item_id: ItemId) -> RepoResult<Vec<Review>>;
    fn delete_review(&self, id: ReviewId) -> RepoResult<()>;
}

/// SQLite-backed review repository.
#[derive(Clone, Copy)]
pub struct SqliteReviewRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReviewRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_reviews(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Review>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut reviews = Vec::new();
        while let Some(row) = rows.next()? {
            reviews.push(parse_review_row(row)?);
        }
        Ok(reviews)
    }
}

impl ReviewRepository for SqliteReviewRepository<'_> {
    fn create_review(&self, review: &NewReview) -> RepoResult<ReviewId> {
        self.conn.execute(
            "INSERT INTO reviews (comment, customer_id, item_id) VALUES (?1, ?2, ?3);",
            params![review.comment.as_deref(), review.customer_id, review.item_id],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(
            "event=review_create module=repo status=ok review_id={id} has_customer={} has_item={}",
            review.customer_id.is_some(),
            review.item_id.is_some()
        );
        Ok(id)
    }

    fn update_review(&self, review: &Review) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE reviews
             SET
                comment = ?1,
                customer_id = ?2,
                item_id = ?3
             WHERE id = ?4;",
            params![
                review.comment.as_deref(),
                review.customer_id,
                review.item_id,
                review.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Review,
                id: review.id,
            });
        }

        Ok(())
    }

    fn get_review(&self, id: ReviewId) -> RepoResult<Option<Review>> {
        let review = self
            .conn
            .query_row(
                &format!("{REVIEW_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_review_row,
            )
            .optional()?;
        Ok(review)
    }

    fn list_reviews(&self, query: &ListQuery) -> RepoResult<Vec<Review>> {
        let mut sql = format!("{REVIEW_SELECT_SQL} ORDER BY id ASC");
        let mut bind_values: Vec<Value> = Vec::new();
        query.push_pagination(&mut sql, &mut bind_values);
        self.query_reviews(&sql, bind_values)
    }

    fn list_reviews_for_customer(&self, customer_id: CustomerId) -> RepoResult<Vec<Review>> {
        self.query_reviews(
            &format!("{REVIEW_SELECT_SQL} WHERE customer_id = ? ORDER BY id ASC"),
            vec![Value::Integer(customer_id)],
        )
    }

    fn list_reviews_for_item(&self, item_id: ItemId) -> RepoResult<Vec<Review>> {
        self.query_reviews(
            &format!("{REVIEW_SELECT_SQL} WHERE item_id = ? ORDER BY id ASC"),
            vec![Value::Integer(item_id)],
        )
    }

    fn delete_review(&self, id: ReviewId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM reviews WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Review,
                id,
            });
        }

        debug!("event=review_delete module=repo status=ok review_id={id}");
        Ok(())
    }
}

fn parse_review_row(row: &Row<'_>) -> rusqlite::Result<Review> {
    Ok(Review {
        id: row.get("id")?,
        comment: row.get("comment")?,
        customer_id: row.get("customer_id")?,
        item_id: row.get("item_id")?,
    })
}
