//! Core data model for customers, items and their reviews.
//! This crate owns the schema, the relationship rules and the serialization
//! views handed to API layers.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::customer::{Customer, CustomerId, NewCustomer};
pub use model::item::{Item, ItemId, ItemValidationError, NewItem};
pub use model::review::{NewReview, Review, ReviewId};
pub use model::view::{
    CustomerDict, CustomerReviewEntry, ItemDict, ItemReviewEntry, ReviewCustomer, ReviewDict,
    ReviewItem,
};
pub use repo::customer_repo::{CustomerRepository, SqliteCustomerRepository};
pub use repo::item_repo::{ItemRepository, SqliteItemRepository};
pub use repo::review_repo::{ReviewRepository, SqliteReviewRepository};
pub use repo::{EntityKind, ListQuery, RepoError, RepoResult};
pub use service::customer_service::CustomerService;
pub use service::item_service::ItemService;
pub use service::review_service::ReviewService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
