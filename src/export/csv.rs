//! CSV export
//!
//! One labelled section per populated collection with a fixed header row.
//! Only the transaction description is quoted; other fields are written as-is.

use chrono::{DateTime, SecondsFormat, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::ExportData;
use crate::error::{StockbookError, StockbookResult};

const ITEM_HEADER: [&str; 6] = ["ID", "Name", "Category", "Quantity", "Price", "Created At"];
const CATEGORY_HEADER: [&str; 3] = ["ID", "Name", "Created At"];
const TRANSACTION_HEADER: [&str; 5] = ["ID", "Type", "Amount", "Description", "Created At"];

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Render one section: label line, header row, then the records
fn render_section(label: &str, header: &[&str], rows: Vec<Vec<String>>) -> StockbookResult<String> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        // Descriptions arrive already quoted; every other field is written bare
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let export_err = |e: csv::Error| StockbookError::Export(e.to_string());

    writer.write_record([label]).map_err(export_err)?;
    writer.write_record(header).map_err(export_err)?;
    for row in rows {
        writer.write_record(&row).map_err(export_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| StockbookError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| StockbookError::Export(e.to_string()))
}

/// Render an export as CSV text
pub fn render_csv(data: &ExportData) -> StockbookResult<String> {
    let mut sections = Vec::new();

    if let Some(items) = &data.items {
        let rows = items
            .iter()
            .map(|item| {
                vec![
                    item.id.to_full_string(),
                    item.name.clone(),
                    item.category.clone(),
                    item.quantity.to_string(),
                    item.price.to_plain_string(),
                    timestamp(&item.created_at),
                ]
            })
            .collect();
        sections.push(render_section("Items", &ITEM_HEADER, rows)?);
    }

    if let Some(categories) = &data.categories {
        let rows = categories
            .iter()
            .map(|cat| {
                vec![
                    cat.id.to_full_string(),
                    cat.name.clone(),
                    timestamp(&cat.created_at),
                ]
            })
            .collect();
        sections.push(render_section("Categories", &CATEGORY_HEADER, rows)?);
    }

    if let Some(transactions) = &data.transactions {
        let rows = transactions
            .iter()
            .map(|txn| {
                vec![
                    txn.id.to_full_string(),
                    txn.kind.as_str().to_string(),
                    txn.amount.to_plain_string(),
                    quoted(txn.description.as_deref().unwrap_or_default()),
                    timestamp(&txn.created_at),
                ]
            })
            .collect();
        sections.push(render_section("Transactions", &TRANSACTION_HEADER, rows)?);
    }

    Ok(sections.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{ExportCategory, ExportItem, ExportTransaction};
    use crate::models::{CategoryId, ItemId, Money, TransactionId, TransactionKind};
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn transaction(description: Option<&str>) -> ExportTransaction {
        ExportTransaction {
            id: TransactionId::new(),
            kind: TransactionKind::Income,
            amount: Money::from_cents(50000),
            description: description.map(String::from),
            created_at: at(),
        }
    }

    #[test]
    fn test_transaction_section() {
        let txn = transaction(Some("Bulk sale"));
        let data = ExportData {
            transactions: Some(vec![txn.clone()]),
            ..Default::default()
        };

        let csv = render_csv(&data).unwrap();
        let expected = format!(
            "Transactions\nID,Type,Amount,Description,Created At\n{},income,500.00,\"Bulk sale\",2024-03-01T12:00:00.000Z\n",
            txn.id.to_full_string()
        );
        assert_eq!(csv, expected);
    }

    #[test]
    fn test_missing_description_is_empty_quotes() {
        let data = ExportData {
            transactions: Some(vec![transaction(None)]),
            ..Default::default()
        };
        let csv = render_csv(&data).unwrap();
        assert!(csv.contains(",500.00,\"\","));
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let data = ExportData {
            transactions: Some(vec![transaction(Some("12\" pipe"))]),
            ..Default::default()
        };
        let csv = render_csv(&data).unwrap();
        assert!(csv.contains("\"12\"\" pipe\""));
    }

    #[test]
    fn test_sections_separated_by_blank_line() {
        let category_id = CategoryId::new();
        let data = ExportData {
            items: Some(vec![ExportItem {
                id: ItemId::new(),
                name: "Hammer".into(),
                category: "Tools".into(),
                quantity: 3,
                price: Money::from_cents(2499),
                created_at: at(),
            }]),
            categories: Some(vec![ExportCategory {
                id: category_id,
                name: "Tools".into(),
                created_at: at(),
            }]),
            transactions: None,
        };

        let csv = render_csv(&data).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Items");
        assert_eq!(lines[1], "ID,Name,Category,Quantity,Price,Created At");
        assert!(lines[2].ends_with(",Hammer,Tools,3,24.99,2024-03-01T12:00:00.000Z"));
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Categories");
        assert_eq!(
            lines[6],
            format!("{},Tools,2024-03-01T12:00:00.000Z", category_id.to_full_string())
        );
        assert!(!csv.contains("Transactions"));
    }

    #[test]
    fn test_empty_export() {
        assert_eq!(render_csv(&ExportData::default()).unwrap(), "");
    }
}
