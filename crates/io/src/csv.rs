// CSV/TSV import
//
// A delimited file is one worksheet; the caller names it.

use std::io::Read;
use std::path::Path;

use crate::error::IoError;

/// Read a delimited file into a grid of cell strings. The delimiter is sniffed
/// for `.csv` and fixed to tab for `.tsv`.
pub fn read_grid(path: &Path) -> Result<Vec<Vec<String>>, IoError> {
    let content = read_file_as_utf8(path)?;
    let is_tsv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("tsv"));
    let delimiter = if is_tsv { b'\t' } else { sniff_delimiter(&content) };
    grid_from_string(&content, delimiter).map_err(|source| IoError::Csv { path: path.to_path_buf(), source })
}

/// Records parsed per candidate when sniffing.
const SNIFF_RECORDS: usize = 10;

/// Candidates in tie-break order.
const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Pick the delimiter whose first records split into the widest consistent
/// rows. Comma when nothing splits.
fn sniff_delimiter(content: &str) -> u8 {
    DELIMITERS
        .iter()
        .filter_map(|&delimiter| delimiter_score(content, delimiter).map(|score| (score, delimiter)))
        .fold(None, |best: Option<(usize, u8)>, candidate| match best {
            Some(kept) if kept.0 >= candidate.0 => Some(kept),
            _ => Some(candidate),
        })
        .map_or(b',', |(_, delimiter)| delimiter)
}

/// Number of sampled records as wide as the first one, times that width.
/// `None` when the first record does not split at all.
fn delimiter_score(content: &str, delimiter: u8) -> Option<usize> {
    let mut widths = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes())
        .into_records()
        .take(SNIFF_RECORDS)
        .map_while(Result::ok)
        .map(|record| record.len());

    let width = widths.next().filter(|&w| w > 1)?;
    Some((1 + widths.filter(|&w| w == width).count()) * width)
}

/// Read file and convert to UTF-8 if needed (Windows-1252 fallback for
/// Excel-exported CSVs). A leading byte-order mark is dropped.
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let read_err = |source| IoError::Read { path: path.to_path_buf(), source };
    let mut file = std::fs::File::open(path).map_err(read_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(read_err)?;

    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

fn grid_from_string(content: &str, delimiter: u8) -> Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut grid = Vec::new();
    for result in reader.records() {
        let record = result?;
        grid.push(record.iter().map(str::to_string).collect());
    }
    Ok(grid)
}
