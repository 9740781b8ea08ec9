//! Side-by-side translation sheets.
//!
//! Two language trees are flattened independently and aligned on their key
//! paths, so a reviewer sees one row per message with a column per language.
//! A key missing from one tree shows up as a blank cell in that language's
//! column.

use tracing::debug;

use crate::lingo::tools::error::{Result, ToolError};
use crate::lingo::tools::flatten::{self, FlattenOptions, UnflattenOptions};
use crate::lingo::tools::model::TreeValue;
use crate::lingo::tools::table::{self, KEY_COLUMN, SheetTable};

/// Sheet name used when the caller does not supply one.
pub const DEFAULT_SHEET: &str = "translation";
/// Column header of the first language.
pub const FIRST_LABEL: &str = "eng";
/// Column header of the second language.
pub const SECOND_LABEL: &str = "vi";

/// Column headers naming the two languages of a translation sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub first: String,
    pub second: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            first: FIRST_LABEL.to_string(),
            second: SECOND_LABEL.to_string(),
        }
    }
}

impl Labels {
    /// Checks that the labels can share a header with the key column.
    pub fn validate(&self) -> Result<()> {
        for label in [&self.first, &self.second] {
            if label == KEY_COLUMN {
                return Err(ToolError::DuplicateColumn(label.clone()));
            }
        }
        if self.first == self.second {
            return Err(ToolError::DuplicateColumn(self.first.clone()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BilingualOptions {
    pub labels: Labels,
    pub sheet_name: String,
    pub flatten: FlattenOptions,
    pub unflatten: UnflattenOptions,
}

impl Default for BilingualOptions {
    fn default() -> Self {
        Self {
            labels: Labels::default(),
            sheet_name: DEFAULT_SHEET.to_string(),
            flatten: FlattenOptions::default(),
            unflatten: UnflattenOptions::default(),
        }
    }
}

/// Aligns two trees into a `key`/first/second table sorted by key.
pub fn merge_trees(
    first: &TreeValue,
    second: &TreeValue,
    options: &BilingualOptions,
) -> Result<SheetTable> {
    options.labels.validate()?;
    let first_map = flatten::flatten_with(first, &options.flatten)?;
    let second_map = flatten::flatten_with(second, &options.flatten)?;
    debug!(
        first_keys = first_map.len(),
        second_keys = second_map.len(),
        "flattened translation trees"
    );

    table::to_rows_multi(
        &[
            (options.labels.first.as_str(), &first_map),
            (options.labels.second.as_str(), &second_map),
        ],
        &options.sheet_name,
    )
}

/// Splits a translation table back into one tree per language.
///
/// Every row contributes a leaf to both trees, blank cells included.
pub fn split_table(
    table: &SheetTable,
    options: &BilingualOptions,
) -> Result<(TreeValue, TreeValue)> {
    options.labels.validate()?;
    let mut maps = table::from_rows_multi(
        table,
        &[
            options.labels.first.as_str(),
            options.labels.second.as_str(),
        ],
    )?
    .into_iter();

    let first_map = maps.next().unwrap_or_default();
    let second_map = maps.next().unwrap_or_default();
    debug!(rows = first_map.len(), "read translation rows");

    let first = flatten::unflatten_with(&first_map, &options.unflatten)?;
    let second = flatten::unflatten_with(&second_map, &options.unflatten)?;
    Ok((first, second))
}
