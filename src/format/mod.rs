//! Bordered ASCII table rendering for `SELECT` result sets and
//! `DESCRIBE`, grounded in the original engine's `table_print_formatted`.

use crate::catalog::Table;
use crate::types::{format as format_value, Value};

/// Render a result set as a bordered table: column width is
/// `max(len(column_name), max over rows of len(format(cell)))`, left
/// aligned, followed by a row-count line.
pub fn render_rows(columns: &[String], rows: &[Vec<Value>]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(format_value).collect())
        .collect();
    render_table(columns, &cells)
}

/// Render `DESCRIBE <table>`: the four fixed columns `Field, Type, Null,
/// Key` over the table's column definitions.
pub fn render_describe(table: &Table) -> String {
    let columns = vec![
        "Field".to_string(),
        "Type".to_string(),
        "Null".to_string(),
        "Key".to_string(),
    ];
    let cells: Vec<Vec<String>> = table
        .columns
        .iter()
        .map(|column| {
            vec![
                column.name.clone(),
                column.data_type.to_string(),
                if column.allows_null { "YES" } else { "NO" }.to_string(),
                if column.is_primary_key { "PRI" } else { "" }.to_string(),
            ]
        })
        .collect();
    render_table(&columns, &cells)
}

fn render_table(columns: &[String], cells: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = border_line(&widths);
    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    out.push_str(&row_line(columns, &widths));
    out.push('\n');
    out.push_str(&border);
    out.push('\n');
    for row in cells {
        out.push_str(&row_line(row, &widths));
        out.push('\n');
    }
    out.push_str(&border);
    out.push('\n');
    out.push_str(&format!(
        "{} row{} in total\n",
        cells.len(),
        if cells.len() == 1 { "" } else { "s" }
    ));
    out
}

fn border_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line
}

fn row_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(width - cell.chars().count()));
        line.push_str(" |");
    }
    line
}
