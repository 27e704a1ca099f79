//! Financial transaction model
//!
//! Transactions are immutable once recorded: there is no update path, only
//! create (gated by the financial tracking setting) and delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{ItemId, TransactionId};
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!(
                "Invalid transaction type '{}': expected income or expense",
                other
            )),
        }
    }
}

/// An income or expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Income or expense
    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Non-negative amount; the sign comes from `kind`
    pub amount: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Item this transaction relates to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<ItemId>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(kind: TransactionKind, amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            kind,
            amount,
            description: None,
            item_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_item(mut self, item_id: ItemId) -> Self {
        self.item_id = Some(item_id);
        self
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_negative() {
            return Err(TransactionValidationError::NegativeAmount);
        }
        if self.amount > Money::MAX {
            return Err(TransactionValidationError::AmountTooLarge);
        }
        Ok(())
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NegativeAmount,
    AmountTooLarge,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount => write!(f, "Amount must be non-negative"),
            Self::AmountTooLarge => {
                write!(f, "amount must not exceed {}", Money::MAX.to_plain_string())
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("income".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert_eq!(" Expense ".parse::<TransactionKind>(), Ok(TransactionKind::Expense));
        assert!("refund".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_builder() {
        let item = ItemId::new();
        let txn = Transaction::new(TransactionKind::Income, Money::from_cents(99999))
            .with_description("Sold 1 Laptop")
            .with_item(item);

        assert!(txn.is_income());
        assert!(!txn.is_expense());
        assert_eq!(txn.description.as_deref(), Some("Sold 1 Laptop"));
        assert_eq!(txn.item_id, Some(item));
    }

    #[test]
    fn test_serialized_kind_field_is_type() {
        let txn = Transaction::new(TransactionKind::Expense, Money::from_cents(500));
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "expense");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let txn = Transaction::new(TransactionKind::Expense, Money::from_cents(-1));
        assert_eq!(
            txn.validate(),
            Err(TransactionValidationError::NegativeAmount)
        );

        let huge = Transaction::new(TransactionKind::Income, Money::from_cents(i64::MAX));
        assert_eq!(
            huge.validate(),
            Err(TransactionValidationError::AmountTooLarge)
        );
        assert!(Transaction::new(TransactionKind::Income, Money::MAX)
            .validate()
            .is_ok());
    }
}
