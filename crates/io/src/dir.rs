// Directory pairing
//
// Files are paired by file name (not relative path) across the two trees.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::IoError;
use crate::workbook::is_spreadsheet;

/// One file name and where it was found on each side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePair {
    pub name: String,
    pub original: Option<PathBuf>,
    pub modified: Option<PathBuf>,
}

impl FilePair {
    pub fn is_complete(&self) -> bool {
        self.original.is_some() && self.modified.is_some()
    }
}

/// Pair the spreadsheets under two directory trees by file name.
///
/// Both trees are walked recursively. The result is the union of names,
/// sorted, with `None` on the side where a name is missing.
pub fn pair_directories(original: &Path, modified: &Path) -> Result<Vec<FilePair>, IoError> {
    let originals = list_spreadsheets(original)?;
    let mut modifieds = list_spreadsheets(modified)?;

    let mut pairs: Vec<FilePair> = originals
        .into_iter()
        .map(|(name, path)| {
            let other = modifieds.remove(&name);
            FilePair { name, original: Some(path), modified: other }
        })
        .collect();
    pairs.extend(
        modifieds
            .into_iter()
            .map(|(name, path)| FilePair { name, original: None, modified: Some(path) }),
    );
    pairs.sort_by(|a, b| a.name.cmp(&b.name));

    log::info!(
        "paired {} files ({} on both sides)",
        pairs.len(),
        pairs.iter().filter(|p| p.is_complete()).count()
    );
    Ok(pairs)
}

/// Spreadsheets under `dir`, keyed by file name.
fn list_spreadsheets(dir: &Path) -> Result<BTreeMap<String, PathBuf>, IoError> {
    if !dir.is_dir() {
        return Err(IoError::Walk { path: dir.to_path_buf(), message: "not a directory".to_string() });
    }
    let walk_err = |message: String| IoError::Walk { path: dir.to_path_buf(), message };

    let root = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = format!("{}/**/*", root.trim_end_matches('/'));
    let entries = glob::glob(&pattern).map_err(|e| walk_err(e.to_string()))?;

    let mut found: BTreeMap<String, PathBuf> = BTreeMap::new();
    for entry in entries {
        let path = entry.map_err(|e| walk_err(e.to_string()))?;
        if !path.is_file() || !is_spreadsheet(&path) {
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if let Some(previous) = found.get(&name) {
            log::warn!(
                "{} shadows {} (same file name), keeping the first",
                path.display(),
                previous.display()
            );
            continue;
        }
        found.insert(name, path);
    }
    Ok(found)
}
