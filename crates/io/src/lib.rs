// Spreadsheet input for paradiff
//
// Reads worksheets into row records at a column mapping. Parsing the file
// formats is delegated to calamine (Excel/ODS) and csv.

pub mod columns;
pub mod csv;
pub mod dir;
pub mod error;
pub mod workbook;
pub mod xlsx;

pub use columns::{column_index, column_letter, ResolvedColumns};
pub use dir::{pair_directories, FilePair};
pub use error::IoError;
pub use workbook::{read_workbook, SpreadsheetKind, DELIMITED_SHEET};
