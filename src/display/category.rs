//! Category display formatting

use tabled::Tabled;

use super::render_table;
use crate::services::CategoryWithCount;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Items")]
    items: usize,
}

/// Format categories with their item counts
pub fn category_table(categories: &[CategoryWithCount]) -> String {
    let rows = categories
        .iter()
        .map(|entry| CategoryRow {
            id: entry.category.id.to_string(),
            name: entry.category.name.clone(),
            items: entry.item_count,
        })
        .collect();
    render_table(rows, "No categories found.")
}

/// Format category details
pub fn format_category_details(entry: &CategoryWithCount) -> String {
    let category = &entry.category;
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", category.name));
    output.push_str(&format!("  ID:       {}\n", category.id.to_full_string()));
    output.push_str(&format!("  Items:    {}\n", entry.item_count));
    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        category.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        category.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[test]
    fn test_table_lists_counts() {
        let output = category_table(&[CategoryWithCount {
            category: Category::new("Tools"),
            item_count: 4,
        }]);
        assert!(output.contains("Category"));
        assert!(output.contains("Tools"));
        assert!(output.contains('4'));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(category_table(&[]), "No categories found.\n");
    }
}
