//! Customer use-case service.
//!
//! # Responsibility
//! - Provide customer CRUD entry points.
//! - Build `CustomerDict` and the derived `items` view from owned reviews.
//!
//! # Invariants
//! - `customer_items` is a read-time traversal of the customer's reviews,
//!   de-duplicated by item id in first-review order; reviews without an item
//!   contribute nothing.

use crate::model::customer::{Customer, CustomerId, NewCustomer};
use crate::model::item::Item;
use crate::model::view::CustomerDict;
use crate::repo::customer_repo::{CustomerRepository, SqliteCustomerRepository};
use crate::repo::item_repo::{ItemRepository, SqliteItemRepository};
use crate::repo::review_repo::{ReviewRepository, SqliteReviewRepository};
use crate::repo::{EntityKind, ListQuery, RepoError, RepoResult};
use rusqlite::Connection;
use std::collections::HashSet;

/// Use-case service wrapper for customer operations.
pub struct CustomerService<C, I, R> {
    customers: C,
    items: I,
    reviews: R,
}

impl<'conn>
    CustomerService<
        SqliteCustomerRepository<'conn>,
        SqliteItemRepository<'conn>,
        SqliteReviewRepository<'conn>,
    >
{
    /// Builds the service over SQLite repositories sharing one connection.
    pub fn sqlite(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self::new(
            SqliteCustomerRepository::try_new(conn)?,
            SqliteItemRepository::try_new(conn)?,
            SqliteReviewRepository::try_new(conn)?,
        ))
    }
}

impl<C, I, R> CustomerService<C, I, R>
where
    C: CustomerRepository,
    I: ItemRepository,
    R: ReviewRepository,
{
    pub fn new(customers: C, items: I, reviews: R) -> Self {
        Self {
            customers,
            items,
            reviews,
        }
    }

    /// Inserts a customer and returns it with its storage-assigned id.
    pub fn create_customer(&self, name: Option<String>) -> RepoResult<Customer> {
        let draft = NewCustomer { name };
        let id = self.customers.create_customer(&draft)?;
        Ok(draft.into_customer(id))
    }

    pub fn get_customer(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        self.customers.get_customer(id)
    }

    pub fn list_customers(&self, query: &ListQuery) -> RepoResult<Vec<Customer>> {
        self.customers.list_customers(query)
    }

    /// Re-saves a mutated customer record.
    pub fn update_customer(&self, customer: &Customer) -> RepoResult<()> {
        self.customers.update_customer(customer)
    }

    /// Replaces the customer's name and returns the saved record.
    pub fn rename_customer(&self, id: CustomerId, name: Option<String>) -> RepoResult<Customer> {
        let mut customer = self.require_customer(id)?;
        customer.name = name;
        self.customers.update_customer(&customer)?;
        Ok(customer)
    }

    /// Deletes the customer together with all of its reviews.
    ///
    /// Returns the number of reviews removed by the cascade.
    pub fn delete_customer(&self, id: CustomerId) -> RepoResult<usize> {
        self.customers.delete_customer(id)
    }

    /// Returns `{id, name, reviews}` for the customer, or `None` if absent.
    pub fn customer_dict(&self, id: CustomerId) -> RepoResult<Option<CustomerDict>> {
        let Some(customer) = self.customers.get_customer(id)? else {
            return Ok(None);
        };
        let reviews = self.reviews.list_reviews_for_customer(id)?;
        Ok(Some(customer.to_dict(&reviews)))
    }

    /// Returns the distinct items the customer reviewed, or `None` if the
    /// customer is absent.
    pub fn customer_items(&self, id: CustomerId) -> RepoResult<Option<Vec<Item>>> {
        if self.customers.get_customer(id)?.is_none() {
            return Ok(None);
        }

        let mut seen = HashSet::new();
        let mut items = Vec::new();
        for review in self.reviews.list_reviews_for_customer(id)? {
            let Some(item_id) = review.item_id else {
                continue;
            };
            if !seen.insert(item_id) {
                continue;
            }
            let item = self.items.get_item(item_id)?.ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "review {} references missing item {item_id}",
                    review.id
                ))
            })?;
            items.push(item);
        }

        Ok(Some(items))
    }

    fn require_customer(&self, id: CustomerId) -> RepoResult<Customer> {
        self.customers
            .get_customer(id)?
            .ok_or(RepoError::NotFound {
                entity: EntityKind::Customer,
                id,
            })
    }
}
