//! File exports of the current projection.

use anyhow::{Context, Result};
use std::path::Path;

use crate::models::Expense;
use crate::ui::table::ExpenseTable;

/// Writes `records` as CSV and returns how many rows went out.
pub(crate) fn write_csv(path: &Path, records: &[Expense]) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    wtr.write_record(["id", "title", "amount", "category", "date"])?;
    for e in records {
        wtr.write_record([
            e.id.to_string(),
            e.title.clone(),
            e.amount.to_string(),
            e.category.clone(),
            e.date_str(),
        ])
        .context("Failed to write CSV record")?;
    }
    wtr.flush().context("Failed to flush CSV file")?;

    tracing::info!(count = records.len(), path = %path.display(), "exported CSV");
    Ok(records.len())
}

pub(crate) fn write_html(path: &Path, table: &ExpenseTable) -> Result<usize> {
    let document = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>Expenses</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        table.to_html()
    );
    std::fs::write(path, document)
        .with_context(|| format!("Failed to write HTML file: {}", path.display()))?;

    tracing::info!(count = table.len(), path = %path.display(), "exported HTML");
    Ok(table.len())
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
