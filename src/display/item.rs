//! Item display formatting

use tabled::Tabled;

use super::{render_table, truncate};
use crate::services::ItemWithCategory;

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Item")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Price")]
    price: String,
}

/// Format items as a table, flagging those under `low_stock_threshold`
pub fn item_table(items: &[ItemWithCategory], low_stock_threshold: u32) -> String {
    let rows = items
        .iter()
        .map(|entry| {
            let flag = if entry.item.is_low_stock(low_stock_threshold) {
                " (low)"
            } else {
                ""
            };
            ItemRow {
                id: entry.item.id.to_string(),
                name: format!("{}{}", truncate(&entry.item.name, 30), flag),
                category: entry.category_name().to_string(),
                quantity: entry.item.quantity,
                price: entry.item.price.to_string(),
            }
        })
        .collect();
    render_table(rows, "No items found.")
}

pub fn format_item_details(entry: &ItemWithCategory) -> String {
    let item = &entry.item;
    let mut output = String::new();

    output.push_str(&format!("Item: {}\n", item.name));
    output.push_str(&format!("  ID:       {}\n", item.id.to_full_string()));
    output.push_str(&format!("  Category: {}\n", entry.category_name()));
    output.push_str(&format!("  Quantity: {}\n", item.quantity));
    output.push_str(&format!("  Price:    {}\n", item.price));
    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        item.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        item.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Item, Money};

    fn entry(name: &str, quantity: u32) -> ItemWithCategory {
        let category = Category::new("Electronics");
        ItemWithCategory {
            item: Item::new(name, category.id, quantity, Money::from_cents(2999)),
            category: Some(category),
        }
    }

    #[test]
    fn test_low_stock_flag() {
        let output = item_table(&[entry("Mouse", 3), entry("Laptop", 15)], 10);
        assert!(output.contains("Mouse (low)"));
        assert!(!output.contains("Laptop (low)"));
        assert!(output.contains("$29.99"));
    }

    #[test]
    fn test_details() {
        let output = format_item_details(&entry("Mouse", 3));
        assert!(output.starts_with("Item: Mouse\n"));
        assert!(output.contains("Category: Electronics"));
    }
}
