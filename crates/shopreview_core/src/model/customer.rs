//! Customer record.

use serde::{Deserialize, Serialize};

/// Storage-assigned customer identity.
pub type CustomerId = i64;

/// A person who writes reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: Option<String>,
}

/// Insert payload for a customer that has no identity yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: Option<String>,
}

impl NewCustomer {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Binds this payload to the identity storage assigned to it.
    pub fn into_customer(self, id: CustomerId) -> Customer {
        Customer {
            id,
            name: self.name,
        }
    }
}
