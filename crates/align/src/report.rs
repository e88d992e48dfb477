use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use serde::Serialize;

use crate::matcher::{diff_worksheet, Ambiguity};
use crate::model::{ColumnMapping, Correspondence, EditSpan, RowClassification, RowRecord, Workbook};
use crate::policy::AlignmentPolicy;
use crate::text_diff::{diff, similarity, Granularity};

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// One row outcome, ready for a renderer.
#[derive(Debug, Clone, Serialize)]
pub struct DiffReportEntry {
    pub original: Option<RowRecord>,
    pub modified: Option<RowRecord>,
    pub classification: RowClassification,
    /// Word-level diff of the target texts; empty when targets are identical.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub target_spans: Vec<EditSpan>,
    /// Word-level diff of the source texts; only when the source changed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_spans: Vec<EditSpan>,
    pub target_similarity: u8,
}

impl DiffReportEntry {
    pub fn original_source(&self) -> &str {
        source_of(self.original.as_ref())
    }

    pub fn modified_source(&self) -> &str {
        source_of(self.modified.as_ref())
    }

    pub fn original_target(&self) -> &str {
        target_of(self.original.as_ref())
    }

    pub fn modified_target(&self) -> &str {
        target_of(self.modified.as_ref())
    }

    /// Character-level target diff, computed on demand.
    pub fn target_char_spans(&self) -> Vec<EditSpan> {
        if self.original_target() == self.modified_target() {
            return Vec::new();
        }
        diff(self.original_target(), self.modified_target(), Granularity::Character)
    }

    /// Sheet row label: `"7"` when both sides sit on the same row, otherwise
    /// `"7/9"`, with an empty side for added or removed rows (`"/9"`, `"7/"`).
    pub fn line_label(&self) -> String {
        let o = self.original.as_ref().map(RowRecord::display_row);
        let m = self.modified.as_ref().map(RowRecord::display_row);
        match (o, m) {
            (Some(a), Some(b)) if a == b => a.to_string(),
            _ => format!(
                "{}/{}",
                o.map(|n| n.to_string()).unwrap_or_default(),
                m.map(|n| n.to_string()).unwrap_or_default()
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Original,
    Modified,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Original => write!(f, "original"),
            Self::Modified => write!(f, "modified"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetPresence {
    Both,
    OriginalOnly,
    ModifiedOnly,
}

/// Non-fatal conditions collected while building a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportWarning {
    /// Several unclaimed original rows in the window matched the source; the nearest won.
    AlignmentAmbiguity {
        sheet: String,
        modified_row: usize,
        chosen_row: usize,
        alternative_rows: Vec<usize>,
    },
    /// Worksheet exists in one workbook only.
    MissingWorksheet { sheet: String, present_in: Side },
}

impl std::fmt::Display for ReportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlignmentAmbiguity { sheet, modified_row, chosen_row, alternative_rows } => write!(
                f,
                "sheet '{sheet}': modified row {modified_row} matched original row {chosen_row}; \
                 rows {alternative_rows:?} also match"
            ),
            Self::MissingWorksheet { sheet, present_in } => {
                write!(f, "sheet '{sheet}' only present in {present_in} workbook")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub unchanged: usize,
    pub source_changed: usize,
    pub target_changed: usize,
    pub both_changed: usize,
    pub added: usize,
    pub removed: usize,
    pub realigned: usize,
}

impl ReportSummary {
    pub fn record(&mut self, classification: RowClassification) {
        match classification {
            RowClassification::Unchanged => self.unchanged += 1,
            RowClassification::SourceChanged => self.source_changed += 1,
            RowClassification::TargetChanged => self.target_changed += 1,
            RowClassification::BothChanged => self.both_changed += 1,
            RowClassification::Added => self.added += 1,
            RowClassification::Removed => self.removed += 1,
            RowClassification::Realigned { .. } => self.realigned += 1,
        }
    }

    pub fn merge(&mut self, other: &ReportSummary) {
        self.unchanged += other.unchanged;
        self.source_changed += other.source_changed;
        self.target_changed += other.target_changed;
        self.both_changed += other.both_changed;
        self.added += other.added;
        self.removed += other.removed;
        self.realigned += other.realigned;
    }

    /// Entries other than `Unchanged`.
    pub fn changes(&self) -> usize {
        self.source_changed + self.target_changed + self.both_changed + self.added + self.removed + self.realigned
    }

    pub fn total(&self) -> usize {
        self.unchanged + self.changes()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorksheetReport {
    pub name: String,
    pub presence: SheetPresence,
    pub summary: ReportSummary,
    pub entries: Vec<DiffReportEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub columns: ColumnMapping,
    pub policy: AlignmentPolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worksheet_pattern: Option<String>,
    pub engine_version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiffReport {
    pub meta: ReportMeta,
    pub summary: ReportSummary,
    pub sheets: BTreeMap<String, WorksheetReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ReportWarning>,
}

impl DiffReport {
    pub fn has_changes(&self) -> bool {
        self.summary.changes() > 0
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Align every worksheet of a workbook pair and assemble the report.
///
/// Sheets are selected by `worksheet_pattern` (all sheets when `None`) and
/// paired by exact name. A sheet present on one side only yields all-Added or
/// all-Removed entries plus a `MissingWorksheet` warning.
pub fn build_report(
    original: &Workbook,
    modified: &Workbook,
    worksheet_pattern: Option<&Regex>,
    columns: &ColumnMapping,
    policy: &AlignmentPolicy,
) -> DiffReport {
    let names: BTreeSet<&String> = original
        .keys()
        .chain(modified.keys())
        .filter(|name| worksheet_pattern.map_or(true, |re| re.is_match(name)))
        .collect();

    let mut sheets = BTreeMap::new();
    let mut summary = ReportSummary::default();
    let mut warnings = Vec::new();

    for name in names {
        let (original_rows, modified_rows, presence) = match (original.get(name), modified.get(name)) {
            (Some(o), Some(m)) => (o.as_slice(), m.as_slice(), SheetPresence::Both),
            (Some(o), None) => (o.as_slice(), &[][..], SheetPresence::OriginalOnly),
            (None, Some(m)) => (&[][..], m.as_slice(), SheetPresence::ModifiedOnly),
            (None, None) => continue,
        };

        let present_in = match presence {
            SheetPresence::Both => None,
            SheetPresence::OriginalOnly => Some(Side::Original),
            SheetPresence::ModifiedOnly => Some(Side::Modified),
        };
        if let Some(present_in) = present_in {
            log::info!("worksheet '{name}' only present in {present_in} workbook");
            warnings.push(ReportWarning::MissingWorksheet { sheet: name.clone(), present_in });
        }

        let outcome = diff_worksheet(original_rows, modified_rows, policy);

        for Ambiguity { modified: mi, chosen, alternatives } in &outcome.ambiguities {
            let warning = ReportWarning::AlignmentAmbiguity {
                sheet: name.clone(),
                modified_row: modified_rows[*mi].display_row(),
                chosen_row: original_rows[*chosen].display_row(),
                alternative_rows: alternatives.iter().map(|&oi| original_rows[oi].display_row()).collect(),
            };
            log::warn!("{warning}");
            warnings.push(warning);
        }

        let entries: Vec<DiffReportEntry> = outcome
            .correspondences
            .iter()
            .filter_map(|c| build_entry(original_rows, modified_rows, c))
            .collect();

        let mut sheet_summary = ReportSummary::default();
        for entry in &entries {
            sheet_summary.record(entry.classification);
        }
        log::debug!(
            "worksheet '{name}': {} rows, {} changed ({} realigned, {} added, {} removed)",
            sheet_summary.total(),
            sheet_summary.changes(),
            sheet_summary.realigned,
            sheet_summary.added,
            sheet_summary.removed
        );
        summary.merge(&sheet_summary);

        sheets.insert(
            name.clone(),
            WorksheetReport { name: name.clone(), presence, summary: sheet_summary, entries },
        );
    }

    DiffReport {
        meta: ReportMeta {
            columns: columns.clone(),
            policy: *policy,
            worksheet_pattern: worksheet_pattern.map(|re| re.as_str().to_string()),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        },
        summary,
        sheets,
        warnings,
    }
}

/// `None` for pairs where neither side has source or target text.
fn build_entry(
    original_rows: &[RowRecord],
    modified_rows: &[RowRecord],
    c: &Correspondence,
) -> Option<DiffReportEntry> {
    let original = c.original.map(|i| &original_rows[i]);
    let modified = c.modified.map(|i| &modified_rows[i]);
    if original.map_or(true, RowRecord::is_blank) && modified.map_or(true, RowRecord::is_blank) {
        return None;
    }

    let (o_src, m_src) = (source_of(original), source_of(modified));
    let (o_tgt, m_tgt) = (target_of(original), target_of(modified));

    let change = c.classification.text_change();
    let target_spans = if change.target_changed() { diff(o_tgt, m_tgt, Granularity::Word) } else { Vec::new() };
    let source_spans = if change.source_changed() { diff(o_src, m_src, Granularity::Word) } else { Vec::new() };

    Some(DiffReportEntry {
        original: original.cloned(),
        modified: modified.cloned(),
        classification: c.classification,
        target_spans,
        source_spans,
        target_similarity: similarity(o_tgt, m_tgt),
    })
}

fn source_of(r: Option<&RowRecord>) -> &str {
    r.map_or("", |r| r.source_text.as_str())
}

fn target_of(r: Option<&RowRecord>) -> &str {
    r.map_or("", |r| r.target_text.as_str())
}
