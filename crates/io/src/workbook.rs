use std::path::Path;

use paradiff_align::{ColumnMapping, RowRecord, Workbook};

use crate::columns::ResolvedColumns;
use crate::error::IoError;

/// Name of the one worksheet a delimited file reads as. It does not depend on
/// the file name, so `v1.csv` and `v2.csv` pair up like two workbooks would.
pub const DELIMITED_SHEET: &str = "Sheet1";

/// How a file is parsed, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetKind {
    /// xlsx, xlsm, xls, xlsb, ods
    Excel,
    /// csv, tsv
    Delimited,
}

impl SpreadsheetKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(Self::Excel),
            "csv" | "tsv" => Some(Self::Delimited),
            _ => None,
        }
    }
}

/// Whether `path` names a file this crate can read. Office lock files
/// (`~$book.xlsx`) are never spreadsheets.
pub fn is_spreadsheet(path: &Path) -> bool {
    let lock_file = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("~$"));
    !lock_file && SpreadsheetKind::from_path(path).is_some()
}

/// Read every worksheet of `path` into row records at `columns`.
///
/// Rows before `row_offset` are skipped. Missing cells read as empty text,
/// so short rows and sparse sheets are fine. A delimited file yields a single
/// worksheet named [`DELIMITED_SHEET`].
pub fn read_workbook(path: &Path, columns: &ColumnMapping) -> Result<Workbook, IoError> {
    let resolved = ResolvedColumns::resolve(columns)?;
    let kind = SpreadsheetKind::from_path(path).ok_or_else(|| IoError::UnsupportedFormat(path.to_path_buf()))?;

    let sheets = match kind {
        SpreadsheetKind::Excel => crate::xlsx::read_sheets(path)?,
        SpreadsheetKind::Delimited => vec![(DELIMITED_SHEET.to_string(), crate::csv::read_grid(path)?)],
    };

    let mut workbook = Workbook::new();
    for (name, grid) in sheets {
        let records = rows_to_records(&grid, &resolved);
        log::debug!("{}: sheet '{}' has {} rows", path.display(), name, records.len());
        if workbook.insert(name.clone(), records).is_some() {
            log::warn!("{}: duplicate sheet name '{}', keeping the last one", path.display(), name);
        }
    }
    Ok(workbook)
}

/// Extract row records from a cell grid. Row indices are absolute grid rows.
pub fn rows_to_records(grid: &[Vec<String>], columns: &ResolvedColumns) -> Vec<RowRecord> {
    let cell = |row: &[String], col: usize| row.get(col).cloned().unwrap_or_default();

    grid.iter()
        .enumerate()
        .skip(columns.row_offset)
        .map(|(index, row)| {
            let record = RowRecord::new(index, cell(row, columns.source), cell(row, columns.target));
            match columns.extra {
                Some(col) => record.with_extra(cell(row, col)),
                None => record,
            }
        })
        .collect()
}
