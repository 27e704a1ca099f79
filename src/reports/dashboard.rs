//! Dashboard report
//!
//! A full rescan of current state on every call: counts, low-stock items,
//! income/expense totals and per-category item counts. Nothing is cached.

use crate::error::{StockbookError, StockbookResult};
use crate::models::{Money, Transaction, TransactionKind};
use crate::services::{
    CategoryService, CategoryWithCount, ItemFilter, ItemService, ItemWithCategory, SettingsService,
};
use crate::storage::Storage;

/// Number of transactions in the recent list
pub const RECENT_TRANSACTION_LIMIT: usize = 30;

/// Income and expense totals over the full history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinancialSummary {
    /// Whether the financial gate is open; all totals are zero when it is not
    pub enabled: bool,
    pub total_income: Money,
    pub total_expenses: Money,
    /// `total_income - total_expenses`
    pub net_profit: Money,
}

impl FinancialSummary {
    /// Summary with the gate closed
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            total_income: Money::zero(),
            total_expenses: Money::zero(),
            net_profit: Money::zero(),
        }
    }

    /// Sum every transaction by kind
    pub fn from_transactions(transactions: &[Transaction]) -> StockbookResult<Self> {
        let overflow = || StockbookError::Overflow("financial totals".into());
        let sum = |kind: TransactionKind| {
            Money::checked_sum(
                transactions
                    .iter()
                    .filter(|t| t.kind == kind)
                    .map(|t| t.amount),
            )
            .ok_or_else(overflow)
        };
        let total_income = sum(TransactionKind::Income)?;
        let total_expenses = sum(TransactionKind::Expense)?;
        let net_profit = total_income
            .checked_sub(total_expenses)
            .ok_or_else(overflow)?;

        Ok(Self {
            enabled: true,
            total_income,
            total_expenses,
            net_profit,
        })
    }
}

/// Dashboard analytics
#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub total_items: usize,
    pub total_categories: usize,
    /// Threshold the low-stock list was computed against
    pub low_stock_threshold: u32,
    /// Items with `quantity < low_stock_threshold`
    pub low_stock_items: Vec<ItemWithCategory>,
    pub financial: FinancialSummary,
    /// Categories sorted by name with item counts
    pub categories: Vec<CategoryWithCount>,
    /// Latest transactions, newest first
    pub recent_transactions: Vec<Transaction>,
}

impl DashboardReport {
    /// Compute the dashboard from current store state
    pub fn generate(storage: &Storage) -> StockbookResult<Self> {
        let config = SettingsService::new(storage).config()?;

        let low_stock_items = ItemService::new(storage)
            .list(&ItemFilter::default())?
            .into_iter()
            .filter(|entry| entry.item.is_low_stock(config.low_stock_threshold))
            .collect();

        let financial = if config.financial_tracking_enabled {
            FinancialSummary::from_transactions(&storage.transactions.get_all()?)?
        } else {
            FinancialSummary::disabled()
        };

        Ok(Self {
            total_items: storage.items.count()?,
            total_categories: storage.categories.count()?,
            low_stock_threshold: config.low_stock_threshold,
            low_stock_items,
            financial,
            categories: CategoryService::new(storage).list()?,
            recent_transactions: storage.transactions.get_recent(RECENT_TRANSACTION_LIMIT)?,
        })
    }
}
