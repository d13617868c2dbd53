//! Item record and price validation.
//!
//! # Invariants
//! - `price`, when set, is a finite number. SQLite stores NaN as NULL, so a
//!   non-finite price would not survive a write/read cycle.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned item identity.
pub type ItemId = i64;

/// A product that can be reviewed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: Option<String>,
    /// Monetary value as a plain float.
    pub price: Option<f64>,
}

/// Insert payload for an item that has no identity yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewItem {
    pub name: Option<String>,
    pub price: Option<f64>,
}

/// Rejected item field values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemValidationError {
    NonFinitePrice(f64),
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFinitePrice(value) => write!(f, "item price must be finite, got {value}"),
        }
    }
}

impl Error for ItemValidationError {}

impl Item {
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        validate_price(self.price)
    }
}

impl NewItem {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price),
        }
    }

    pub fn validate(&self) -> Result<(), ItemValidationError> {
        validate_price(self.price)
    }

    /// Binds this payload to the identity storage assigned to it.
    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            name: self.name,
            price: self.price,
        }
    }
}

fn validate_price(price: Option<f64>) -> Result<(), ItemValidationError> {
    match price {
        Some(value) if !value.is_finite() => Err(ItemValidationError::NonFinitePrice(value)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{Item, ItemValidationError, NewItem};

    #[test]
    fn finite_and_missing_prices_are_valid() {
        assert!(NewItem::new("Widget", 9.99).validate().is_ok());
        assert!(NewItem::default().validate().is_ok());
    }

    #[test]
    fn non_finite_price_is_rejected() {
        let item = Item {
            id: 1,
            name: None,
            price: Some(f64::INFINITY),
        };
        assert!(matches!(
            item.validate(),
            Err(ItemValidationError::NonFinitePrice(value)) if value.is_infinite()
        ));

        let draft = NewItem {
            name: None,
            price: Some(f64::NAN),
        };
        assert!(draft.validate().is_err());
    }
}
