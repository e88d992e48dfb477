use serde::Serialize;

use crate::model::{Correspondence, RowClassification, RowRecord, TextChange};
use crate::policy::AlignmentPolicy;
use crate::text_diff::within_tolerance;

/// Result of aligning one worksheet.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    /// Ordered by modified row, followed by unclaimed original rows.
    pub correspondences: Vec<Correspondence>,
    /// Realignments where more than one unclaimed candidate in the window
    /// matched the modified source.
    pub ambiguities: Vec<Ambiguity>,
}

/// Several candidates matched one modified row; the nearest was claimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ambiguity {
    pub modified: usize,
    pub chosen: usize,
    pub alternatives: Vec<usize>,
}

/// Align modified rows against original rows.
///
/// Each modified row first tries the original row at the same position, then
/// original rows at offsets -1, +1, -2, +2, … up to the realign window. The
/// first unclaimed candidate whose source matches exactly or within tolerance
/// is claimed. Modified rows with no candidate are `Added`; original rows
/// never claimed are appended as `Removed` in original order.
pub fn diff_worksheet(
    original: &[RowRecord],
    modified: &[RowRecord],
    policy: &AlignmentPolicy,
) -> MatchOutcome {
    let tolerance = policy.tolerate_percent();
    // Offsets past both sheets can never land on a row.
    let window = policy.realign_window().min(original.len() + modified.len());

    let mut claimed = vec![false; original.len()];
    let mut correspondences = Vec::with_capacity(modified.len() + original.len());
    let mut ambiguities = Vec::new();

    for (mi, m) in modified.iter().enumerate() {
        let source_matches = |oi: usize| within_tolerance(&original[oi].source_text, &m.source_text, tolerance);

        // Positional candidate
        if mi < original.len() && !claimed[mi] && source_matches(mi) {
            claimed[mi] = true;
            correspondences.push(Correspondence {
                original: Some(mi),
                modified: Some(mi),
                classification: RowClassification::matched(text_change(&original[mi], m), false),
            });
            continue;
        }

        // Windowed search, nearest first, above before below
        let mut candidates = window_positions(mi, window, original.len()).filter(|&oi| !claimed[oi]);
        let Some(chosen) = candidates.by_ref().find(|&oi| source_matches(oi)) else {
            correspondences.push(Correspondence {
                original: None,
                modified: Some(mi),
                classification: RowClassification::Added,
            });
            continue;
        };

        let alternatives: Vec<usize> = candidates
            .filter(|&oi| source_matches(oi))
            .collect();
        if !alternatives.is_empty() {
            log::trace!("modified row {mi}: claimed original row {chosen} over {alternatives:?}");
            ambiguities.push(Ambiguity { modified: mi, chosen, alternatives });
        }

        claimed[chosen] = true;
        correspondences.push(Correspondence {
            original: Some(chosen),
            modified: Some(mi),
            classification: RowClassification::matched(text_change(&original[chosen], m), true),
        });
    }

    for (oi, _) in claimed.iter().enumerate().filter(|(_, c)| !**c) {
        correspondences.push(Correspondence {
            original: Some(oi),
            modified: None,
            classification: RowClassification::Removed,
        });
    }

    // Claiming is complete; dropping entries here cannot turn a claimed row
    // into a Removed one.
    if policy.omit_identical() {
        correspondences.retain(|c| !target_identical_after_move(c.classification));
    }

    MatchOutcome { correspondences, ambiguities }
}

fn text_change(original: &RowRecord, modified: &RowRecord) -> TextChange {
    TextChange::from_flags(
        original.source_text != modified.source_text,
        original.target_text != modified.target_text,
    )
}

/// Rows that `omit_identical` drops: moved or source-edited, target untouched.
fn target_identical_after_move(classification: RowClassification) -> bool {
    matches!(
        classification,
        RowClassification::SourceChanged
            | RowClassification::Realigned { change: TextChange::None | TextChange::Source }
    )
}

/// Original positions at offsets -1, +1, -2, +2, … around `center`, skipping
/// positions outside `0..len`.
fn window_positions(center: usize, window: usize, len: usize) -> impl Iterator<Item = usize> {
    (1..=window)
        .flat_map(move |d| [center.checked_sub(d), center.checked_add(d)])
        .flatten()
        .filter(move |&oi| oi < len)
}
