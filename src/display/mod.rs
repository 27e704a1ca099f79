//! Display formatting for terminal output
//!
//! Listings render as tables via `tabled`; details and the dashboard are
//! laid out by hand.

pub mod category;
pub mod dashboard;
pub mod item;
pub mod transaction;

pub use category::{category_table, format_category_details};
pub use dashboard::format_dashboard;
pub use item::{format_item_details, item_table};
pub use transaction::transaction_table;

use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Render rows as a table, or `empty` when there are none
pub(crate) fn render_table<T: Tabled>(rows: Vec<T>, empty: &str) -> String {
    if rows.is_empty() {
        return format!("{}\n", empty);
    }
    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

/// Shorten `s` to `max` characters, marking the cut with an ellipsis
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
