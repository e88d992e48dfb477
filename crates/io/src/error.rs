use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open workbook {}: {message}", .path.display())]
    Open { path: PathBuf, message: String },

    #[error("cannot read sheet '{sheet}' in {}: {message}", .path.display())]
    Sheet { path: PathBuf, sheet: String, message: String },

    #[error("malformed CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid column '{0}': expected letters such as A, K or AB")]
    InvalidColumn(String),

    #[error("unsupported file type: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("cannot walk directory {}: {message}", .path.display())]
    Walk { path: PathBuf, message: String },
}
