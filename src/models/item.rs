//! Inventory item model
//!
//! Every item belongs to exactly one category. The category reference is
//! re-checked by the item service before each write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, ItemId};
use super::money::Money;

/// A stocked inventory item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier
    pub id: ItemId,

    /// Item name (not unique)
    pub name: String,

    /// Owning category
    pub category_id: CategoryId,

    /// Units on hand
    pub quantity: u32,

    /// Unit price
    pub price: Money,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Create a new item
    pub fn new(
        name: impl Into<String>,
        category_id: CategoryId,
        quantity: u32,
        price: Money,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ItemId::new(),
            name: name.into(),
            category_id,
            quantity,
            price,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the on-hand quantity is below the given threshold
    pub fn is_low_stock(&self, threshold: u32) -> bool {
        self.quantity < threshold
    }

    /// Validate the item
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.name.trim().is_empty() {
            return Err(ItemValidationError::EmptyName);
        }

        if self.price.is_negative() {
            return Err(ItemValidationError::NegativePrice);
        }
        if self.price > Money::MAX {
            return Err(ItemValidationError::PriceTooLarge);
        }

        Ok(())
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (qty {})", self.name, self.quantity)
    }
}

/// Validation errors for items
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyName,
    NegativePrice,
    PriceTooLarge,
}

impl fmt::Display for ItemValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Item name is required"),
            Self::NegativePrice => write!(f, "Price must be non-negative"),
            Self::PriceTooLarge => {
                write!(f, "price must not exceed {}", Money::MAX.to_plain_string())
            }
        }
    }
}

impl std::error::Error for ItemValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_stock_is_strictly_below_threshold() {
        let category = CategoryId::new();
        let mouse = Item::new("Mouse", category, 3, Money::from_cents(1999));
        let laptop = Item::new("Laptop", category, 10, Money::from_cents(99999));

        assert!(mouse.is_low_stock(10));
        assert!(!laptop.is_low_stock(10));
        assert!(laptop.is_low_stock(11));
        assert!(!mouse.is_low_stock(0));
    }

    #[test]
    fn test_item_validation() {
        let mut item = Item::new("Hammer", CategoryId::new(), 3, Money::from_cents(2499));
        assert!(item.validate().is_ok());

        item.price = Money::from_cents(-1);
        assert_eq!(item.validate(), Err(ItemValidationError::NegativePrice));

        item.name = String::new();
        assert_eq!(item.validate(), Err(ItemValidationError::EmptyName));
    }
}
