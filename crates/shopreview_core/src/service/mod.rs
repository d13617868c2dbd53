//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Resolve relationships and build the `*Dict` views callers serialize.
//!
//! # Invariants
//! - Services never bypass repository validation/persistence contracts.
//! - Derived relationship views are recomputed on every read.

pub mod customer_service;
pub mod item_service;
pub mod review_service;
