// Excel/ODS import (xlsx, xlsm, xls, xlsb, ods)
//
// Only cached cell values are read; formulas, styles and validations are
// irrelevant for text comparison.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};

use crate::error::IoError;

/// Dimension guard against pathological used ranges.
const MAX_ROWS: usize = 1_048_576;
const MAX_COLS: usize = 16_384;

/// Read every worksheet into a grid of cell strings, in workbook order.
/// Grid positions are absolute sheet positions: a used range starting at C5
/// is padded with empty rows and cells above and to the left.
pub fn read_sheets(path: &Path) -> Result<Vec<(String, Vec<Vec<String>>)>, IoError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path).map_err(|e| IoError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in sheet_names {
        let range = workbook.worksheet_range(&sheet_name).map_err(|e| IoError::Sheet {
            path: path.to_path_buf(),
            sheet: sheet_name.clone(),
            message: e.to_string(),
        })?;

        let (height, width) = range.get_size();
        if height == 0 || width == 0 {
            sheets.push((sheet_name, Vec::new()));
            continue;
        }
        if height > MAX_ROWS || width > MAX_COLS {
            log::warn!(
                "sheet '{sheet_name}' truncated from {height}x{width} to {}x{}",
                height.min(MAX_ROWS),
                width.min(MAX_COLS)
            );
        }

        // Range start offset (data may not begin at A1)
        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        let (start_row, start_col) = (start_row as usize, start_col as usize);

        let mut grid: Vec<Vec<String>> = vec![Vec::new(); start_row.min(MAX_ROWS)];
        for row in range.rows().take(MAX_ROWS.saturating_sub(start_row)) {
            let mut cells = vec![String::new(); start_col.min(MAX_COLS)];
            cells.extend(row.iter().take(MAX_COLS.saturating_sub(start_col)).map(cell_text));
            grid.push(cells);
        }
        sheets.push((sheet_name, grid));
    }

    Ok(sheets)
}

/// Display text of a cached cell value.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // Integers without decimals
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        Data::Float(n) => format!("{}", n),
        Data::Int(n) => format!("{}", n),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        // Excel's own literal: #DIV/0!, #N/A, #REF!
        Data::Error(e) => e.to_string(),
        // Serial date number; text corpora rarely carry dates
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}
