//! Domain model for customers, items and the reviews joining them.
//!
//! # Responsibility
//! - Define the plain records persisted by the repository layer.
//! - Define the flat serialization shapes (`*Dict`) handed to API callers.
//!
//! # Invariants
//! - Identities are integers assigned by storage on insert.
//! - The customer/item <-> review edge lives only in `Review`'s foreign keys;
//!   both traversal directions are derived by queries.

pub mod customer;
pub mod item;
pub mod review;
pub mod view;
