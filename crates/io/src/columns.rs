use paradiff_align::ColumnMapping;

use crate::error::IoError;

/// Convert a column letter to a 0-based index (`A` = 0, `Z` = 25, `AA` = 26).
/// Case-insensitive; surrounding whitespace is ignored.
pub fn column_index(letter: &str) -> Result<usize, IoError> {
    let trimmed = letter.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) || trimmed.len() > 3 {
        return Err(IoError::InvalidColumn(letter.to_string()));
    }
    let col = trimmed
        .to_ascii_uppercase()
        .bytes()
        .fold(0usize, |acc, b| acc * 26 + (b - b'A' + 1) as usize);
    Ok(col - 1)
}

/// Convert a 0-based index back to its column letter.
pub fn column_letter(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// Column mapping with letters resolved to indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub source: usize,
    pub target: usize,
    pub extra: Option<usize>,
    pub row_offset: usize,
}

impl ResolvedColumns {
    pub fn resolve(mapping: &ColumnMapping) -> Result<Self, IoError> {
        Ok(Self {
            source: column_index(&mapping.source)?,
            target: column_index(&mapping.target)?,
            extra: mapping.extra.as_deref().map(column_index).transpose()?,
            row_offset: mapping.row_offset,
        })
    }
}
