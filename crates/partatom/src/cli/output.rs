//! Output formatting utilities for CLI commands.

use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};

/// Print a table with headers and rows.
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.to_vec());
    for row in rows {
        table.add_row(row);
    }
    println!("{table}");
}

/// Truncate long cell values so tables stay readable.
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let cut: String = value.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
