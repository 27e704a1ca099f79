//! Transaction service
//!
//! Recording a transaction is gated by the financial tracking setting; the
//! gate is consulted before anything else. Reading and deleting history is
//! never gated.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{StockbookError, StockbookResult};
use crate::models::{ItemId, Money, Transaction, TransactionId, TransactionKind};
use crate::storage::Storage;

use super::settings::SettingsService;

/// Listing limit when the caller gives none
pub const DEFAULT_TRANSACTION_LIMIT: usize = 100;

/// Fields of a new transaction
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: Money,
    pub description: Option<String>,
    pub item_id: Option<ItemId>,
}

/// Listing filter
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub limit: usize,
}

impl Default for TransactionFilter {
    fn default() -> Self {
        Self {
            kind: None,
            limit: DEFAULT_TRANSACTION_LIMIT,
        }
    }
}

/// Service for income and expense records
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a transaction. Fails Forbidden while the financial gate is closed.
    pub fn create(&self, input: NewTransaction) -> StockbookResult<Transaction> {
        SettingsService::new(self.storage).ensure_financial_enabled()?;

        let mut txn = Transaction::new(input.kind, input.amount);
        txn.description = input
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        txn.item_id = input.item_id;

        txn.validate()
            .map_err(|e| StockbookError::Validation(e.to_string()))?;

        if let Some(item_id) = txn.item_id {
            if self.storage.items.get(item_id)?.is_none() {
                return Err(StockbookError::item_not_found(item_id.to_string()));
            }
        }

        self.storage.transactions.insert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            txn.description.clone(),
            &txn,
        );

        info!(id = %txn.id, kind = %txn.kind, amount = %txn.amount, "transaction recorded");
        Ok(txn)
    }

    /// Transactions newest first, optionally of one kind, at most `limit`
    pub fn list(&self, filter: &TransactionFilter) -> StockbookResult<Vec<Transaction>> {
        Ok(self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .filter(|t| filter.kind.map_or(true, |kind| t.kind == kind))
            .take(filter.limit)
            .collect())
    }

    pub fn get(&self, id: TransactionId) -> StockbookResult<Transaction> {
        self.storage
            .transactions
            .get(id)?
            .ok_or_else(|| StockbookError::transaction_not_found(id.to_string()))
    }

    /// Delete a transaction
    pub fn delete(&self, id: TransactionId) -> StockbookResult<Transaction> {
        let txn = self
            .storage
            .transactions
            .delete(id)?
            .ok_or_else(|| StockbookError::transaction_not_found(id.to_string()))?;
        self.storage.transactions.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_string(),
            txn.description.clone(),
            &txn,
        );

        info!(id = %txn.id, "transaction deleted");
        Ok(txn)
    }
}
