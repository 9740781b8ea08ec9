use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};

use crate::lingo::tools::error::{Result, ToolError};
use crate::lingo::tools::table::SheetTable;

/// Reads one sheet of an Excel workbook as text cells.
///
/// `sheet` selects a sheet by name; without it the first sheet is used. The
/// first row becomes the header, every following row a data row. Rows are
/// padded to the header width.
pub fn read_sheet(path: &Path, sheet: Option<&str>) -> Result<SheetTable> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ToolError::InvalidWorkbook("workbook has no sheets".into()))?,
    };
    let range = read_required_sheet(&mut workbook, &sheet_name)?;

    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header
            .iter()
            .map(|cell| cell_to_string(Some(cell)).trim().to_string())
            .collect(),
        None => Vec::new(),
    };

    let mut table = SheetTable::new(sheet_name, columns);
    for row in rows {
        let cells = (0..table.columns.len().max(row.len()))
            .map(|col_idx| cell_to_string(row.get(col_idx)))
            .collect();
        table.rows.push(cells);
    }

    Ok(table)
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<calamine::Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(ToolError::from)?;
    Ok(range)
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => unescape_cell_text(value),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Decodes the `_xHHHH_` escapes that spreadsheet writers use for control
/// characters. `_x005F_` stands for a literal underscore, which is how text
/// that itself looks like an escape is stored.
fn unescape_cell_text(text: &str) -> String {
    if !text.contains("_x") {
        return text.to_string();
    }

    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("_x") {
        output.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match escaped_char(candidate) {
            Some(ch) => {
                output.push(ch);
                rest = &candidate[ESCAPE_LEN..];
            }
            None => {
                output.push_str("_x");
                rest = &candidate[2..];
            }
        }
    }
    output.push_str(rest);
    output
}

/// Length of one `_xHHHH_` escape.
const ESCAPE_LEN: usize = 7;

fn escaped_char(candidate: &str) -> Option<char> {
    let bytes = candidate.as_bytes();
    if bytes.len() < ESCAPE_LEN || bytes[ESCAPE_LEN - 1] != b'_' {
        return None;
    }
    let digits = &bytes[2..ESCAPE_LEN - 1];
    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let hex = std::str::from_utf8(digits).ok()?;
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}
