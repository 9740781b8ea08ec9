use std::collections::BTreeSet;

use crate::lingo::tools::error::{Result, ToolError};
use crate::lingo::tools::model::{FlatMap, TreeValue};

/// Header of the column holding key paths.
pub const KEY_COLUMN: &str = "key";
/// Header of the value column in single-document sheets.
pub const VALUE_COLUMN: &str = "value";
/// Sheet name used for single-document workbooks.
pub const DEFAULT_SHEET: &str = "Sheet1";

/// A table that will be materialised as an Excel sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub sheet_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    /// Creates a table with a header and no rows.
    pub fn new(sheet_name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Index of the column with the given header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| ToolError::SchemaMismatch {
                sheet: self.sheet_name.clone(),
                column: name.to_string(),
            })
    }
}

/// Lays out a flat map as `key`/`<value_column>` rows sorted by key.
pub fn to_rows(map: &FlatMap, value_column: &str, sheet_name: &str) -> Result<SheetTable> {
    to_rows_multi(&[(value_column, map)], sheet_name)
}

/// Lays out several flat maps side by side, one value column each.
///
/// The key column holds the union of all keys in ascending ordinal order. A
/// map lacking a key gets a blank cell on that row.
pub fn to_rows_multi(columns: &[(&str, &FlatMap)], sheet_name: &str) -> Result<SheetTable> {
    let mut header = Vec::with_capacity(columns.len() + 1);
    header.push(KEY_COLUMN.to_string());
    header.extend(columns.iter().map(|(name, _)| name.to_string()));

    let keys: BTreeSet<&str> = columns
        .iter()
        .flat_map(|(_, map)| map.keys().map(String::as_str))
        .collect();

    let mut table = SheetTable::new(sheet_name, header);
    table.rows.reserve(keys.len());
    for key in keys {
        let mut cells = Vec::with_capacity(columns.len() + 1);
        cells.push(key.to_string());
        for (_, map) in columns {
            let cell = match map.get(key) {
                Some(value) => leaf_to_cell(value)?,
                None => String::new(),
            };
            cells.push(cell);
        }
        table.rows.push(cells);
    }

    Ok(table)
}

/// Reads `key`/`<value_column>` rows back into a flat map.
pub fn from_rows(table: &SheetTable, value_column: &str) -> Result<FlatMap> {
    let mut maps = from_rows_multi(table, &[value_column])?;
    Ok(maps.pop().unwrap_or_default())
}

/// Reads one flat map per requested value column.
///
/// Rows are visited sorted by key. Blank cells become empty strings, never
/// missing entries. Rows whose key cell is empty are skipped, while keys made
/// of whitespace are kept as written. When a key repeats the later row wins.
pub fn from_rows_multi(table: &SheetTable, value_columns: &[&str]) -> Result<Vec<FlatMap>> {
    let key_index = table.require_column(KEY_COLUMN)?;
    let value_indices = value_columns
        .iter()
        .map(|column| table.require_column(column))
        .collect::<Result<Vec<_>>>()?;

    let mut rows: Vec<&Vec<String>> = table
        .rows
        .iter()
        .filter(|row| !cell(row, key_index).is_empty())
        .collect();
    rows.sort_by(|lhs, rhs| cell(lhs, key_index).cmp(cell(rhs, key_index)));

    let mut maps = vec![FlatMap::with_capacity(rows.len()); value_indices.len()];
    for row in rows {
        let key = cell(row, key_index);
        for (map, index) in maps.iter_mut().zip(&value_indices) {
            map.insert(key.to_string(), TreeValue::string(cell(row, *index)));
        }
    }

    Ok(maps)
}

/// Text stored in a spreadsheet cell for a flattened leaf.
///
/// Scalars use their plain text; sequences and empty mappings are written as
/// compact JSON.
pub fn leaf_to_cell(value: &TreeValue) -> Result<String> {
    match value {
        TreeValue::Scalar(scalar) => Ok(scalar.to_text()),
        other => Ok(serde_json::to_string(other)?),
    }
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or_default()
}
