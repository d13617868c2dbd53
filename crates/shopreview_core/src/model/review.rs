//! Review record: the join between one customer and one item.
//!
//! # Invariants
//! - `customer_id`/`item_id` are nullable foreign keys; when set they must
//!   reference existing rows (enforced by storage at write time).
//! - Either side can be re-pointed or detached without touching the other.

use crate::model::customer::CustomerId;
use crate::model::item::ItemId;
use serde::{Deserialize, Serialize};

/// Storage-assigned review identity.
pub type ReviewId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub comment: Option<String>,
    pub customer_id: Option<CustomerId>,
    pub item_id: Option<ItemId>,
}

/// Insert payload for a review that has no identity yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewReview {
    pub comment: Option<String>,
    pub customer_id: Option<CustomerId>,
    pub item_id: Option<ItemId>,
}

impl NewReview {
    pub fn new(
        comment: impl Into<String>,
        customer_id: Option<CustomerId>,
        item_id: Option<ItemId>,
    ) -> Self {
        Self {
            comment: Some(comment.into()),
            customer_id,
            item_id,
        }
    }

    /// Binds this payload to the identity storage assigned to it.
    pub fn into_review(self, id: ReviewId) -> Review {
        Review {
            id,
            comment: self.comment,
            customer_id: self.customer_id,
            item_id: self.item_id,
        }
    }
}
