//! Dashboard formatting

use crate::reports::DashboardReport;

const WIDTH: usize = 50;

/// Bar of `width` cells filled in proportion to `value / max_value`
fn format_bar(value: usize, max_value: usize, width: usize) -> String {
    if max_value == 0 || value == 0 {
        return " ".repeat(width);
    }
    let filled = ((value as f64 / max_value as f64) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn separator() -> String {
    "─".repeat(WIDTH)
}

/// Format the dashboard report
pub fn format_dashboard(report: &DashboardReport, currency_symbol: &str) -> String {
    let mut output = String::new();

    output.push_str("Dashboard\n");
    output.push_str(&"═".repeat(WIDTH));
    output.push('\n');
    output.push_str(&format!("Items:       {}\n", report.total_items));
    output.push_str(&format!("Categories:  {}\n", report.total_categories));
    output.push('\n');

    output.push_str(&format!(
        "Low stock (< {})\n",
        report.low_stock_threshold
    ));
    output.push_str(&separator());
    output.push('\n');
    if report.low_stock_items.is_empty() {
        output.push_str("  (none)\n");
    }
    for entry in &report.low_stock_items {
        output.push_str(&format!(
            "  {:<24} {:>5}  {}\n",
            entry.item.name,
            entry.item.quantity,
            entry.category_name()
        ));
    }
    output.push('\n');

    output.push_str("Financials\n");
    output.push_str(&separator());
    output.push('\n');
    if report.financial.enabled {
        let f = &report.financial;
        output.push_str(&format!(
            "  Income:     {:>14}\n",
            f.total_income.format_with_symbol(currency_symbol)
        ));
        output.push_str(&format!(
            "  Expenses:   {:>14}\n",
            f.total_expenses.format_with_symbol(currency_symbol)
        ));
        output.push_str(&format!(
            "  Net profit: {:>14}\n",
            f.net_profit.format_with_symbol(currency_symbol)
        ));
    } else {
        output.push_str("  Financial tracking is disabled\n");
    }
    output.push('\n');

    output.push_str("Items per category\n");
    output.push_str(&separator());
    output.push('\n');
    let max_count = report
        .categories
        .iter()
        .map(|c| c.item_count)
        .max()
        .unwrap_or(0);
    for entry in &report.categories {
        output.push_str(&format!(
            "  {:<16} {} {}\n",
            entry.category.name,
            format_bar(entry.item_count, max_count, 20),
            entry.item_count
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::FinancialSummary;

    fn empty_report(financial: FinancialSummary) -> DashboardReport {
        DashboardReport {
            total_items: 0,
            total_categories: 0,
            low_stock_threshold: 10,
            low_stock_items: Vec::new(),
            financial,
            categories: Vec::new(),
            recent_transactions: Vec::new(),
        }
    }

    #[test]
    fn test_format_bar() {
        let bar = format_bar(2, 4, 10);
        assert_eq!(bar.chars().filter(|c| *c == '█').count(), 5);
        assert_eq!(format_bar(0, 4, 3), "   ");
    }

    #[test]
    fn test_disabled_financials() {
        let output = format_dashboard(&empty_report(FinancialSummary::disabled()), "$");
        assert!(output.contains("Financial tracking is disabled"));
        assert!(output.contains("Low stock (< 10)"));
    }

    #[test]
    fn test_enabled_financials() {
        let summary = FinancialSummary::from_transactions(&[]).unwrap();
        let output = format_dashboard(&empty_report(summary), "€");
        assert!(output.contains("Net profit:"));
        assert!(output.contains("€0.00"));
    }
}
