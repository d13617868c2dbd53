//! Flat serialization shapes for API callers.
//!
//! # Responsibility
//! - Map records into plain, `serde`-serializable mappings.
//!
//! # Invariants
//! - `CustomerDict` and `ItemDict` embed only flat review summaries (ids and
//!   comment), never nested customers or items.
//! - `ReviewDict` nests exactly one level into its customer and item; a
//!   missing association serializes as `null`.
//! - Review sequences keep the order of the input slice (repositories return
//!   them by ascending id).

use crate::model::customer::{Customer, CustomerId};
use crate::model::item::{Item, ItemId};
use crate::model::review::{Review, ReviewId};
use serde::Serialize;

/// `{id, name, reviews: [{id, comment, item_id}]}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerDict {
    pub id: CustomerId,
    pub name: Option<String>,
    pub reviews: Vec<CustomerReviewEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerReviewEntry {
    pub id: ReviewId,
    pub comment: Option<String>,
    pub item_id: Option<ItemId>,
}

/// `{id, name, price, reviews: [{id, comment, customer_id}]}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDict {
    pub id: ItemId,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub reviews: Vec<ItemReviewEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReviewEntry {
    pub id: ReviewId,
    pub comment: Option<String>,
    pub customer_id: Option<CustomerId>,
}

/// `{id, comment, customer: {id, name} | null, item: {id, name, price} | null}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewDict {
    pub id: ReviewId,
    pub comment: Option<String>,
    pub customer: Option<ReviewCustomer>,
    pub item: Option<ReviewItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewCustomer {
    pub id: CustomerId,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewItem {
    pub id: ItemId,
    pub name: Option<String>,
    pub price: Option<f64>,
}

impl Customer {
    /// Builds the customer view from the reviews it owns.
    ///
    /// Reviews pointing at another customer are skipped.
    pub fn to_dict(&self, reviews: &[Review]) -> CustomerDict {
        CustomerDict {
            id: self.id,
            name: self.name.clone(),
            reviews: reviews
                .iter()
                .filter(|review| review.customer_id == Some(self.id))
                .map(|review| CustomerReviewEntry {
                    id: review.id,
                    comment: review.comment.clone(),
                    item_id: review.item_id,
                })
                .collect(),
        }
    }
}

impl Item {
    /// Builds the item view from the reviews it owns.
    ///
    /// Reviews pointing at another item are skipped.
    pub fn to_dict(&self, reviews: &[Review]) -> ItemDict {
        ItemDict {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            reviews: reviews
                .iter()
                .filter(|review| review.item_id == Some(self.id))
                .map(|review| ItemReviewEntry {
                    id: review.id,
                    comment: review.comment.clone(),
                    customer_id: review.customer_id,
                })
                .collect(),
        }
    }
}

impl Review {
    /// Builds the review view from its resolved associations.
    ///
    /// An association whose id differs from the matching foreign key is
    /// rendered as `null`, the same way the customer and item views skip
    /// reviews that point elsewhere.
    pub fn to_dict(&self, customer: Option<&Customer>, item: Option<&Item>) -> ReviewDict {
        let customer = customer.filter(|customer| self.customer_id == Some(customer.id));
        let item = item.filter(|item| self.item_id == Some(item.id));

        ReviewDict {
            id: self.id,
            comment: self.comment.clone(),
            customer: customer.map(|customer| ReviewCustomer {
                id: customer.id,
                name: customer.name.clone(),
            }),
            item: item.map(|item| ReviewItem {
                id: item.id,
                name: item.name.clone(),
                price: item.price,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::customer::Customer;
    use crate::model::item::Item;
    use crate::model::review::Review;
    use serde_json::json;

    fn review(id: i64, customer_id: Option<i64>, item_id: Option<i64>) -> Review {
        Review {
            id,
            comment: Some(format!("comment {id}")),
            customer_id,
            item_id,
        }
    }

    #[test]
    fn customer_dict_lists_flat_review_summaries() {
        let customer = Customer {
            id: 1,
            name: Some("Alice".to_string()),
        };
        let reviews = [review(3, Some(1), Some(7)), review(4, Some(1), None)];

        let value = serde_json::to_value(customer.to_dict(&reviews)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1,
                "name": "Alice",
                "reviews": [
                    {"id": 3, "comment": "comment 3", "item_id": 7},
                    {"id": 4, "comment": "comment 4", "item_id": null},
                ],
            })
        );
    }

    #[test]
    fn item_dict_skips_reviews_of_other_items() {
        let item = Item {
            id: 7,
            name: None,
            price: Some(2.5),
        };
        let reviews = [review(3, Some(1), Some(7)), review(5, Some(2), Some(8))];

        let dict = item.to_dict(&reviews);
        assert_eq!(dict.reviews.len(), 1);
        assert_eq!(dict.reviews[0].id, 3);
        assert_eq!(dict.reviews[0].customer_id, Some(1));
    }

    #[test]
    fn review_dict_serializes_missing_associations_as_null() {
        let value = serde_json::to_value(review(9, None, None).to_dict(None, None)).unwrap();
        assert_eq!(
            value,
            json!({"id": 9, "comment": "comment 9", "customer": null, "item": null})
        );
    }

    #[test]
    fn review_dict_drops_associations_that_contradict_foreign_keys() {
        let alice = Customer {
            id: 1,
            name: Some("Alice".to_string()),
        };
        let bob = Customer {
            id: 2,
            name: Some("Bob".to_string()),
        };
        let widget = Item {
            id: 7,
            name: Some("Widget".to_string()),
            price: Some(9.99),
        };

        let linked = review(3, Some(1), Some(7));
        let dict = linked.to_dict(Some(&bob), Some(&widget));
        assert!(dict.customer.is_none());
        assert_eq!(dict.item.map(|item| item.id), Some(7));

        let detached = review(4, None, None);
        let dict = detached.to_dict(Some(&alice), Some(&widget));
        assert!(dict.customer.is_none());
        assert!(dict.item.is_none());

        let dict = linked.to_dict(Some(&alice), Some(&widget));
        assert_eq!(dict.customer.map(|customer| customer.id), Some(1));
    }
}
