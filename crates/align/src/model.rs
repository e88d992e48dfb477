use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One spreadsheet row's relevant cells, read at a given column mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowRecord {
    /// 0-based sheet row the record was read from.
    pub row_index: usize,
    pub source_text: String,
    pub target_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_text: Option<String>,
}

impl RowRecord {
    pub fn new(row_index: usize, source_text: impl Into<String>, target_text: impl Into<String>) -> Self {
        Self {
            row_index,
            source_text: source_text.into(),
            target_text: target_text.into(),
            extra_text: None,
        }
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra_text = Some(extra.into());
        self
    }

    /// 1-based row number as shown in a spreadsheet application.
    pub fn display_row(&self) -> usize {
        self.row_index + 1
    }

    /// No source and no target text.
    pub fn is_blank(&self) -> bool {
        self.source_text.is_empty() && self.target_text.is_empty()
    }
}

/// Worksheet name -> rows in sheet order.
pub type Workbook = BTreeMap<String, Vec<RowRecord>>;

/// Which columns hold the source, target and optional extra text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    /// Header rows to skip before the first RowRecord.
    pub row_offset: usize,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            source: "A".into(),
            target: "B".into(),
            extra: None,
            row_offset: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Text diff
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditOp {
    Equal,
    Insert,
    Delete,
    Replace,
}

/// One run of an edit script. `old` is the text on the before side, `new`
/// the text on the after side (both equal for `Equal`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditSpan {
    pub op: EditOp,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub old: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub new: String,
}

impl EditSpan {
    pub fn equal(text: impl Into<String>) -> Self {
        let text = text.into();
        Self { op: EditOp::Equal, old: text.clone(), new: text }
    }

    pub fn insert(text: impl Into<String>) -> Self {
        Self { op: EditOp::Insert, old: String::new(), new: text.into() }
    }

    pub fn delete(text: impl Into<String>) -> Self {
        Self { op: EditOp::Delete, old: text.into(), new: String::new() }
    }

    pub fn replace(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self { op: EditOp::Replace, old: old.into(), new: new.into() }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Which texts of a matched row pair differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextChange {
    None,
    Source,
    Target,
    Both,
}

impl TextChange {
    pub fn from_flags(source_changed: bool, target_changed: bool) -> Self {
        match (source_changed, target_changed) {
            (false, false) => Self::None,
            (true, false) => Self::Source,
            (false, true) => Self::Target,
            (true, true) => Self::Both,
        }
    }

    pub fn source_changed(self) -> bool {
        matches!(self, Self::Source | Self::Both)
    }

    pub fn target_changed(self) -> bool {
        matches!(self, Self::Target | Self::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowClassification {
    Unchanged,
    SourceChanged,
    TargetChanged,
    BothChanged,
    Added,
    Removed,
    /// Matched to an original row at a different position.
    Realigned { change: TextChange },
}

impl RowClassification {
    /// Classification of a matched pair.
    pub fn matched(change: TextChange, realigned: bool) -> Self {
        if realigned {
            return Self::Realigned { change };
        }
        match change {
            TextChange::None => Self::Unchanged,
            TextChange::Source => Self::SourceChanged,
            TextChange::Target => Self::TargetChanged,
            TextChange::Both => Self::BothChanged,
        }
    }

    /// Text change of a matched pair. Added and Removed rows have no
    /// counterpart to compare with and report `None`.
    pub fn text_change(&self) -> TextChange {
        match self {
            Self::Unchanged | Self::Added | Self::Removed => TextChange::None,
            Self::SourceChanged => TextChange::Source,
            Self::TargetChanged => TextChange::Target,
            Self::BothChanged => TextChange::Both,
            Self::Realigned { change } => *change,
        }
    }

    pub fn is_matched(&self) -> bool {
        !matches!(self, Self::Added | Self::Removed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::SourceChanged => "source_changed",
            Self::TargetChanged => "target_changed",
            Self::BothChanged => "both_changed",
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Realigned { .. } => "realigned",
        }
    }
}

impl std::fmt::Display for RowClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Realigned { change: TextChange::None } => write!(f, "realigned"),
            Self::Realigned { change: TextChange::Source } => write!(f, "realigned (source changed)"),
            Self::Realigned { change: TextChange::Target } => write!(f, "realigned (target changed)"),
            Self::Realigned { change: TextChange::Both } => write!(f, "realigned (both changed)"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// Correspondence
// ---------------------------------------------------------------------------

/// Outcome for one modified row (or one leftover original row).
/// Indices address the slices passed to the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Correspondence {
    pub original: Option<usize>,
    pub modified: Option<usize>,
    pub classification: RowClassification,
}
