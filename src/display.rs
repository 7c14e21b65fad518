use crate::types::{MergedRow, MergedTable, NA_MARKER};

/// Width reserved for each metric column in the preview.
const COL_WIDTH: usize = 22;

/// How many metric columns fit on a preview line.
const MAX_PREVIEW_COLS: usize = 4;

/// Display a preview of the merged table before it is persisted.
pub fn display_merged_table(table: &MergedTable) {
    if table.rows.is_empty() {
        println!("No data to display");
        return;
    }

    let shown = table.columns.len().min(MAX_PREVIEW_COLS);
    let line_width = 10 + (COL_WIDTH + 1) * shown.max(1);

    println!("\n{}", "=".repeat(line_width));
    println!("{:^width$}", "MERGED TABLE PREVIEW", width = line_width);
    println!("{}", "=".repeat(line_width));

    // Header
    print!("{:<10}", "Date");
    for column in table.columns.iter().take(shown) {
        print!(" {:>width$}", truncate(column, COL_WIDTH), width = COL_WIDTH);
    }
    if table.columns.len() > shown {
        print!("  (+{} more)", table.columns.len() - shown);
    }
    println!();
    println!("{}", "-".repeat(line_width));

    // First 10 rows
    for row in table.rows.iter().take(10) {
        print_row(row, shown);
    }

    // Last 10 rows if we have more than 20
    if table.rows.len() > 20 {
        println!("{:<10} ...", "");
        for row in table.rows.iter().rev().take(10).rev() {
            print_row(row, shown);
        }
    } else if table.rows.len() > 10 {
        for row in table.rows.iter().skip(10) {
            print_row(row, shown);
        }
    }

    println!("{}", "=".repeat(line_width));
    println!("Total rows: {}, columns: {}", table.rows.len(), table.columns.len());

    let total_cells = table.rows.len() * table.columns.len();
    let populated: usize = table
        .rows
        .iter()
        .map(|row| row.cells.iter().filter(|c| c.is_some()).count())
        .sum();
    if total_cells > 0 {
        println!(
            "Populated cells: {}/{} ({:.1}%)",
            populated,
            total_cells,
            100.0 * populated as f64 / total_cells as f64
        );
    }
    println!("{}", "=".repeat(line_width));
}

fn print_row(row: &MergedRow, shown: usize) {
    print!("{:<10}", row.label);
    for cell in row.cells.iter().take(shown) {
        let text = match cell {
            Some(value) => {
                // Adaptive precision: index levels get decimals, large
                // absolute figures stay whole
                if value.abs() < 1_000.0 {
                    format!("{:.1}", value)
                } else {
                    format!("{:.0}", value)
                }
            }
            None => NA_MARKER.to_string(),
        };
        print!(" {:>width$}", text, width = COL_WIDTH);
    }
    println!();
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let head: String = text.chars().take(max.saturating_sub(2)).collect();
    format!("{}..", head)
}
