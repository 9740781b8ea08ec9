use std::path::Path;

use tracing::{debug, info, instrument};

use crate::lingo::tools::bilingual::{self, BilingualOptions};
use crate::lingo::tools::error::{Result, ToolError};
use crate::lingo::tools::flatten::{self, FlattenOptions, UnflattenOptions};
use crate::lingo::tools::io::{self, FileFormat, RenderOptions, excel_read, excel_write};
use crate::lingo::tools::table::{self, DEFAULT_SHEET, VALUE_COLUMN};

/// Settings for single-document conversions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConvertOptions {
    pub render: RenderOptions,
    pub flatten: FlattenOptions,
    pub unflatten: UnflattenOptions,
    /// Sheet to write, or to read instead of the first one.
    pub sheet_name: Option<String>,
}

/// Converts `input` into `output`, choosing the operation from the pair of
/// file extensions. Unsupported pairs fail before anything is read or written.
pub fn convert(input: &Path, output: &Path, options: &ConvertOptions) -> Result<()> {
    let from = FileFormat::require(input)?;
    let to = FileFormat::require(output)?;

    match (from, to) {
        (FileFormat::Tree(source), FileFormat::Tree(target)) if source != target => {
            tree_to_tree(input, output, options)
        }
        (FileFormat::Tree(_), FileFormat::Excel) => tree_to_excel(input, output, options),
        (FileFormat::Excel, FileFormat::Tree(_)) => excel_to_tree(input, output, options),
        _ => Err(ToolError::UnsupportedConversion {
            from: from.to_string(),
            to: to.to_string(),
        }),
    }
}

/// Re-encodes a JSON document as YAML or the other way round, keeping key
/// order and scalar types.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn tree_to_tree(input: &Path, output: &Path, options: &ConvertOptions) -> Result<()> {
    let tree = io::read_tree(input)?;
    io::write_tree(output, &tree, &options.render)
}

/// Flattens a JSON or YAML document into a `key`/`value` sheet.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn tree_to_excel(input: &Path, output: &Path, options: &ConvertOptions) -> Result<()> {
    let tree = io::read_tree(input)?;
    let map =
        flatten::flatten_with(&tree, &options.flatten).map_err(|err| err.in_file(input))?;
    info!(key_count = map.len(), "flattened source document");

    let sheet_name = options.sheet_name.as_deref().unwrap_or(DEFAULT_SHEET);
    let sheet = table::to_rows(&map, VALUE_COLUMN, sheet_name)?;
    debug!(row_count = sheet.rows.len(), "sheet constructed");
    excel_write::write_sheet(output, &sheet).map_err(|err| err.in_file(output))
}

/// Rebuilds a JSON or YAML document from a `key`/`value` sheet.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn excel_to_tree(input: &Path, output: &Path, options: &ConvertOptions) -> Result<()> {
    let sheet = excel_read::read_sheet(input, options.sheet_name.as_deref())
        .map_err(|err| err.in_file(input))?;
    info!(row_count = sheet.rows.len(), sheet = %sheet.sheet_name, "read sheet");

    let map = table::from_rows(&sheet, VALUE_COLUMN).map_err(|err| err.in_file(input))?;
    let tree =
        flatten::unflatten_with(&map, &options.unflatten).map_err(|err| err.in_file(input))?;
    io::write_tree(output, &tree, &options.render)
}

/// Merges two language documents into one translation sheet.
#[instrument(
    level = "info",
    skip_all,
    fields(first = %first.display(), second = %second.display(), output = %output.display())
)]
pub fn trees_to_excel(
    first: &Path,
    second: &Path,
    output: &Path,
    options: &BilingualOptions,
) -> Result<()> {
    if FileFormat::require(output)? != FileFormat::Excel {
        return Err(ToolError::UnsupportedFormat(output.to_path_buf()));
    }

    let first_tree = io::read_tree(first)?;
    let second_tree = io::read_tree(second)?;
    let sheet = bilingual::merge_trees(&first_tree, &second_tree, options)?;
    info!(row_count = sheet.rows.len(), sheet = %sheet.sheet_name, "translation sheet merged");
    excel_write::write_sheet(output, &sheet).map_err(|err| err.in_file(output))
}

/// Splits a translation sheet into two language documents.
///
/// Both documents are rendered and staged next to their destinations before
/// either file is replaced. `sheet` selects the sheet to read; without it the
/// first sheet is used.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), first = %first.display(), second = %second.display())
)]
pub fn excel_to_trees(
    input: &Path,
    first: &Path,
    second: &Path,
    sheet: Option<&str>,
    options: &BilingualOptions,
    render: &RenderOptions,
) -> Result<()> {
    if FileFormat::require(input)? != FileFormat::Excel {
        return Err(ToolError::UnsupportedFormat(input.to_path_buf()));
    }

    let table = excel_read::read_sheet(input, sheet).map_err(|err| err.in_file(input))?;
    info!(row_count = table.rows.len(), sheet = %table.sheet_name, "read translation sheet");
    let (first_tree, second_tree) =
        bilingual::split_table(&table, options).map_err(|err| err.in_file(input))?;

    let first_text = io::render_document(first, &first_tree, render)?;
    let second_text = io::render_document(second, &second_tree, render)?;
    let first_staged =
        io::fs::stage(first, first_text.as_bytes()).map_err(|err| err.in_file(first))?;
    let second_staged =
        io::fs::stage(second, second_text.as_bytes()).map_err(|err| err.in_file(second))?;
    first_staged.commit().map_err(|err| err.in_file(first))?;
    second_staged.commit().map_err(|err| err.in_file(second))
}
