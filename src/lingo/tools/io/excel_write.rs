use std::path::Path;

use rust_xlsxwriter::{Table, TableColumn, Workbook};

use crate::lingo::tools::error::Result;
use crate::lingo::tools::io::fs::write_atomic;
use crate::lingo::tools::table::SheetTable;

/// Longest sheet name Excel accepts.
const MAX_SHEET_NAME: usize = 31;

/// Writes the table as the only sheet of a new workbook at `path`.
///
/// Every cell is written as a string. Data rows are wrapped in an Excel table
/// with an autofilter so reviewers can filter for blank translations.
pub fn write_sheet(path: &Path, table: &SheetTable) -> Result<()> {
    let mut workbook_writer = Workbook::new();
    let worksheet = workbook_writer.add_worksheet();
    let sheet_name = sanitize_sheet_name(&table.sheet_name);
    worksheet.set_name(&sheet_name)?;

    for (col_idx, header) in table.columns.iter().enumerate() {
        worksheet.write_string(0, col_idx as u16, header)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            worksheet.write_string((row_idx + 1) as u32, col_idx as u16, cell)?;
        }
    }

    // Excel tables need at least one data row.
    if !table.rows.is_empty() && !table.columns.is_empty() {
        let columns: Vec<TableColumn> = table
            .columns
            .iter()
            .map(|header| TableColumn::new().set_header(header))
            .collect();
        let mut excel_table = Table::new();
        excel_table.set_autofilter(true).set_columns(&columns);

        let col_end = (table.columns.len() as u16).saturating_sub(1);
        let row_end = table.rows.len() as u32;
        worksheet.add_table(0, 0, row_end, col_end, &excel_table)?;
    }
    worksheet.autofit();

    let buffer = workbook_writer.save_to_buffer()?;
    write_atomic(path, &buffer)
}

/// Replaces characters Excel forbids in sheet names and trims the name to
/// the allowed length.
pub fn sanitize_sheet_name(raw: &str) -> String {
    let invalid = [':', '\\', '/', '?', '*', '[', ']', '\'', '"'];
    let mut sanitized: String = raw
        .chars()
        .map(|ch| {
            if invalid.contains(&ch) || ch.is_control() {
                '_'
            } else {
                ch
            }
        })
        .collect();

    sanitized = sanitized.trim().to_string();
    if sanitized.is_empty() {
        sanitized = "Sheet".to_string();
    }

    if sanitized.chars().count() > MAX_SHEET_NAME {
        sanitized = sanitized.chars().take(MAX_SHEET_NAME).collect();
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_forbidden_characters() {
        assert_eq!(sanitize_sheet_name("a/b:c"), "a_b_c");
        assert_eq!(sanitize_sheet_name("   "), "Sheet");
        assert_eq!(sanitize_sheet_name("translation"), "translation");
    }

    #[test]
    fn truncates_long_names_on_character_boundaries() {
        let long = "dịch".repeat(10);
        let sanitized = sanitize_sheet_name(&long);
        assert_eq!(sanitized.chars().count(), MAX_SHEET_NAME);
        assert!(long.starts_with(&sanitized));
    }
}
