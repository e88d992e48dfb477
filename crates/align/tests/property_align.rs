// Property-based tests for row alignment and text diff.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::HashSet;

use paradiff_align::matcher::diff_worksheet;
use paradiff_align::text_diff::{diff, new_text, old_text, Granularity};
use paradiff_align::{AlignmentPolicy, EditOp, RowClassification, RowRecord};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Text with words, punctuation, spaces and some non-ASCII.
fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => r"[a-zé ,.!]{0,24}",
        1 => r"[ab ]{0,8}",
        1 => Just(String::new()),
    ]
}

fn arb_granularity() -> impl Strategy<Value = Granularity> {
    prop_oneof![Just(Granularity::Word), Just(Granularity::Character)]
}

/// Small source vocabulary so duplicates and reorderings are common.
fn arb_rows(max: usize) -> impl Strategy<Value = Vec<RowRecord>> {
    proptest::collection::vec((r"[abcd]{1,2}", r"[xy]{0,2}"), 0..=max).prop_map(|pairs| {
        pairs
            .into_iter()
            .enumerate()
            .map(|(i, (s, t))| RowRecord::new(i, s, t))
            .collect()
    })
}

fn arb_policy() -> impl Strategy<Value = AlignmentPolicy> {
    (0i64..6, prop_oneof![Just(0i64), 1i64..60], prop::bool::ANY)
        .prop_map(|(w, t, omit)| AlignmentPolicy::new(w, t, omit, false).unwrap())
}

// ---------------------------------------------------------------------------
// Text diff
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn spans_reconstruct_both_sides(old in arb_text(), new in arb_text(), g in arb_granularity()) {
        let spans = diff(&old, &new, g);
        prop_assert_eq!(old_text(&spans), old);
        prop_assert_eq!(new_text(&spans), new);
    }

    #[test]
    fn identical_inputs_are_all_equal(s in arb_text(), g in arb_granularity()) {
        let spans = diff(&s, &s, g);
        prop_assert!(spans.iter().all(|span| span.op == EditOp::Equal));
        prop_assert_eq!(old_text(&spans), s);
    }

    #[test]
    fn no_adjacent_spans_share_an_op(old in arb_text(), new in arb_text(), g in arb_granularity()) {
        let spans = diff(&old, &new, g);
        for pair in spans.windows(2) {
            prop_assert_ne!(pair[0].op, pair[1].op);
        }
    }

    #[test]
    fn diff_is_deterministic(old in arb_text(), new in arb_text(), g in arb_granularity()) {
        prop_assert_eq!(diff(&old, &new, g), diff(&old, &new, g));
    }
}

// ---------------------------------------------------------------------------
// Row matcher
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn original_rows_claimed_at_most_once(
        original in arb_rows(12),
        modified in arb_rows(12),
        policy in arb_policy(),
    ) {
        let out = diff_worksheet(&original, &modified, &policy);
        let mut seen = HashSet::new();
        for c in &out.correspondences {
            if let Some(oi) = c.original {
                prop_assert!(seen.insert(oi), "original row {} appears twice", oi);
            }
        }
    }

    #[test]
    fn every_row_accounted_for_without_omit(
        original in arb_rows(12),
        modified in arb_rows(12),
        window in 0i64..6,
        tolerance in 0i64..40,
    ) {
        let policy = AlignmentPolicy::new(window, tolerance, false, false).unwrap();
        let out = diff_worksheet(&original, &modified, &policy);

        let originals: HashSet<usize> = out.correspondences.iter().filter_map(|c| c.original).collect();
        let modifieds: Vec<usize> = out.correspondences.iter().filter_map(|c| c.modified).collect();
        prop_assert_eq!(originals.len(), original.len());
        prop_assert_eq!(modifieds, (0..modified.len()).collect::<Vec<_>>());
    }

    #[test]
    fn strict_policy_only_compares_same_position(
        original in arb_rows(10),
        modified in arb_rows(10),
    ) {
        let out = diff_worksheet(&original, &modified, &AlignmentPolicy::strict());
        for c in &out.correspondences {
            prop_assert!(
                !matches!(c.classification, RowClassification::Realigned { .. }),
                "row {:?} realigned under strict policy",
                c
            );
            if let (Some(oi), Some(mi)) = (c.original, c.modified) {
                prop_assert_eq!(oi, mi);
                prop_assert_eq!(&original[oi].source_text, &modified[mi].source_text);
            }
        }
    }

    #[test]
    fn matches_stay_within_window(
        original in arb_rows(12),
        modified in arb_rows(12),
        policy in arb_policy(),
    ) {
        let out = diff_worksheet(&original, &modified, &policy);
        for c in &out.correspondences {
            if let (Some(oi), Some(mi)) = (c.original, c.modified) {
                prop_assert!(oi.abs_diff(mi) <= policy.realign_window());
            }
        }
    }

    /// Growing the window keeps a row's match as long as every earlier
    /// modified row kept its own.
    #[test]
    fn wider_window_keeps_earlier_matches(
        original in arb_rows(12),
        modified in arb_rows(12),
        window in 0i64..4,
        extra in 1i64..4,
        tolerance in prop_oneof![Just(0i64), 30i64..50],
    ) {
        let narrow = AlignmentPolicy::new(window, tolerance, false, false).unwrap();
        let wide = AlignmentPolicy::new(window + extra, tolerance, false, false).unwrap();
        let a = diff_worksheet(&original, &modified, &narrow);
        let b = diff_worksheet(&original, &modified, &wide);

        for mi in 0..modified.len() {
            let ca = a.correspondences[mi];
            let cb = b.correspondences[mi];
            if ca.original.is_some() {
                prop_assert_eq!(ca.original, cb.original, "modified row {} lost its match", mi);
            }
            if ca.original != cb.original {
                break;
            }
        }
    }
}
