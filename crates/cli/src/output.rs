// Report rendering: json, csv and plain-text summary.
//
// The JSON document shape is a contract; bump CONTRACT_VERSION when a field
// is renamed or removed.

use std::fmt::Write as _;

use paradiff_align::{DiffReport, ReportSummary, RowClassification, TextChange};
use serde::Serialize;
use thiserror::Error;

pub const CONTRACT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("cannot serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// One compared file pair and its report.
#[derive(Debug, Clone)]
pub struct FileReport {
    /// File name, or `original/modified` when the names differ.
    pub key: String,
    pub report: DiffReport,
}

/// Totals across every file of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub files: usize,
    pub sheets: usize,
    pub warnings: usize,
    #[serde(flatten)]
    pub rows: ReportSummary,
    pub changes: usize,
}

impl RunSummary {
    pub fn collect(files: &[FileReport]) -> Self {
        let mut summary = Self { files: files.len(), ..Self::default() };
        for file in files {
            summary.sheets += file.report.sheets.len();
            summary.warnings += file.report.warnings.len();
            summary.rows.merge(&file.report.summary);
        }
        summary.changes = summary.rows.changes();
        summary
    }
}

/// Drop `Unchanged` entries from the report body. Counts are kept.
pub fn hide_unchanged(report: &mut DiffReport) {
    for sheet in report.sheets.values_mut() {
        sheet.entries.retain(|e| e.classification != RowClassification::Unchanged);
    }
}

// ============================================================================
// json
// ============================================================================

#[derive(Serialize)]
struct JsonDocument {
    contract_version: u32,
    files: serde_json::Map<String, serde_json::Value>,
    summary: RunSummary,
}

pub fn format_json(files: &[FileReport]) -> Result<Vec<u8>, OutputError> {
    let mut map = serde_json::Map::new();
    for file in files {
        map.insert(file.key.clone(), serde_json::to_value(&file.report)?);
    }
    let doc = JsonDocument {
        contract_version: CONTRACT_VERSION,
        files: map,
        summary: RunSummary::collect(files),
    };

    let mut bytes = serde_json::to_vec_pretty(&doc)?;
    bytes.push(b'\n');
    Ok(bytes)
}

// ============================================================================
// csv
// ============================================================================

pub const CSV_HEADER: [&str; 11] = [
    "file",
    "sheet",
    "original_row",
    "modified_row",
    "status",
    "change",
    "original_source",
    "modified_source",
    "original_target",
    "modified_target",
    "target_similarity",
];

fn change_label(change: TextChange) -> &'static str {
    match change {
        TextChange::None => "",
        TextChange::Source => "source",
        TextChange::Target => "target",
        TextChange::Both => "both",
    }
}

pub fn format_csv(files: &[FileReport]) -> Result<Vec<u8>, OutputError> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for file in files {
        for sheet in file.report.sheets.values() {
            for entry in &sheet.entries {
                let row = |r: &Option<paradiff_align::RowRecord>| {
                    r.as_ref().map(|r| r.display_row().to_string()).unwrap_or_default()
                };
                writer.write_record([
                    file.key.as_str(),
                    sheet.name.as_str(),
                    row(&entry.original).as_str(),
                    row(&entry.modified).as_str(),
                    entry.classification.as_str(),
                    change_label(entry.classification.text_change()),
                    entry.original_source(),
                    entry.modified_source(),
                    entry.original_target(),
                    entry.modified_target(),
                    entry.target_similarity.to_string().as_str(),
                ])?;
            }
        }
    }

    writer.flush().map_err(csv::Error::from)?;
    let bytes = writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(bytes)
}

// ============================================================================
// summary
// ============================================================================

fn counts_line(s: &ReportSummary) -> String {
    format!(
        "unchanged {}, source changed {}, target changed {}, both changed {}, added {}, removed {}, realigned {}",
        s.unchanged, s.source_changed, s.target_changed, s.both_changed, s.added, s.removed, s.realigned
    )
}

pub fn format_summary(files: &[FileReport]) -> String {
    let mut out = String::new();
    for file in files {
        let _ = writeln!(out, "{}", file.key);
        for sheet in file.report.sheets.values() {
            let _ = writeln!(out, "  {}: {}", sheet.name, counts_line(&sheet.summary));
        }
        for warning in &file.report.warnings {
            let _ = writeln!(out, "  warning: {warning}");
        }
    }
    let total = RunSummary::collect(files);
    let _ = writeln!(
        out,
        "total: {} files, {} sheets, {} changed rows ({})",
        total.files,
        total.sheets,
        total.changes,
        counts_line(&total.rows)
    );
    out
}
