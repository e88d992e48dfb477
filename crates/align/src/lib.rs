//! `paradiff-align`: row alignment and text diff engine.
//!
//! Pure engine crate: receives pre-loaded row records, returns classified
//! correspondences and a report-ready structure. No CLI or IO dependencies.

pub mod error;
pub mod matcher;
pub mod model;
pub mod policy;
pub mod report;
pub mod text_diff;

pub use error::AlignError;
pub use matcher::{diff_worksheet, MatchOutcome};
pub use model::{
    ColumnMapping, Correspondence, EditOp, EditSpan, RowClassification, RowRecord, TextChange,
    Workbook,
};
pub use policy::{AlignmentPolicy, PolicySettings};
pub use report::{
    build_report, DiffReport, DiffReportEntry, ReportMeta, ReportSummary, ReportWarning, SheetPresence, Side,
    WorksheetReport,
};
pub use text_diff::{diff, Granularity};
