//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json. There is no
//! update path: a recorded transaction is only ever read or deleted.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::StockbookError;
use crate::models::{Transaction, TransactionId};

use super::file_io::{lock_error, read_json, write_json_atomic};

/// Serializable transaction data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk
    pub fn load(&self) -> Result<(), StockbookError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        data.clear();
        for txn in file_data.transactions {
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    /// Save transactions to disk
    pub fn save(&self) -> Result<(), StockbookError> {
        let file_data = TransactionData {
            transactions: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, StockbookError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// Get all transactions, newest first
    pub fn get_all(&self) -> Result<Vec<Transaction>, StockbookError> {
        let data = self.data.read().map_err(lock_error)?;

        let mut txns: Vec<_> = data.values().cloned().collect();
        txns.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        Ok(txns)
    }

    /// Get the `limit` most recent transactions
    pub fn get_recent(&self, limit: usize) -> Result<Vec<Transaction>, StockbookError> {
        let mut txns = self.get_all()?;
        txns.truncate(limit);
        Ok(txns)
    }

    /// Insert a new transaction
    pub fn insert(&self, txn: Transaction) -> Result<(), StockbookError> {
        let mut data = self.data.write().map_err(lock_error)?;
        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete a transaction, returning the removed record
    pub fn delete(&self, id: TransactionId) -> Result<Option<Transaction>, StockbookError> {
        let mut data = self.data.write().map_err(lock_error)?;
        Ok(data.remove(&id))
    }

    /// Remove every record (used by sample-data seeding)
    pub fn clear(&self) -> Result<(), StockbookError> {
        self.data.write().map_err(lock_error)?.clear();
        Ok(())
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, StockbookError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}
