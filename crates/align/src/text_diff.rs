// Token-level edit scripts between two strings.
// LCS over word or character tokens; common prefix/suffix are trimmed before
// the DP table is built, so cost is bounded by the changed middle.

use crate::model::{EditOp, EditSpan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    /// Runs of word characters, each other character on its own.
    #[default]
    Word,
    /// One token per `char`.
    Character,
}

/// Compute the edit script turning `old` into `new`.
///
/// Concatenating the `old` side of every span reproduces `old`; the `new` side
/// reproduces `new`. Output is deterministic for a given input pair.
pub fn diff(old: &str, new: &str, granularity: Granularity) -> Vec<EditSpan> {
    if old.is_empty() && new.is_empty() {
        return Vec::new();
    }
    if old.is_empty() {
        return vec![EditSpan::insert(new)];
    }
    if new.is_empty() {
        return vec![EditSpan::delete(old)];
    }

    let a = tokenize(old, granularity);
    let b = tokenize(new, granularity);

    let prefix = a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    let mut ops: Vec<(Step, &str)> = Vec::with_capacity(a.len().max(b.len()));
    ops.extend(a[..prefix].iter().map(|t| (Step::Keep, *t)));
    lcs_steps(&a[prefix..a.len() - suffix], &b[prefix..b.len() - suffix], &mut ops);
    ops.extend(a[a.len() - suffix..].iter().map(|t| (Step::Keep, *t)));

    coalesce(&ops)
}

/// Character-level similarity in percent: `2 * lcs / (len_old + len_new)`,
/// rounded. Two empty strings are 100% similar.
pub fn similarity(old: &str, new: &str) -> u8 {
    let a: Vec<char> = old.chars().collect();
    let b: Vec<char> = new.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }
    let lcs = lcs_len(&a, &b);
    ((200 * lcs + total / 2) / total) as u8
}

/// Whether `modified` is within `percent` character difference of `original`.
///
/// Difference is the Levenshtein distance over chars divided by the longer
/// length. Identical strings always pass; `percent == 0` accepts nothing else.
pub fn within_tolerance(original: &str, modified: &str, percent: u32) -> bool {
    if original == modified {
        return true;
    }
    if percent == 0 {
        return false;
    }
    let longest = original.chars().count().max(modified.chars().count()) as u64;
    let distance = strsim::levenshtein(original, modified) as u64;
    distance * 100 <= u64::from(percent) * longest
}

// ---------------------------------------------------------------------------
// Tokenizing
// ---------------------------------------------------------------------------

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn tokenize(s: &str, granularity: Granularity) -> Vec<&str> {
    let mut tokens = Vec::new();
    match granularity {
        Granularity::Character => {
            for (i, c) in s.char_indices() {
                tokens.push(&s[i..i + c.len_utf8()]);
            }
        }
        Granularity::Word => {
            let mut run_start: Option<usize> = None;
            for (i, c) in s.char_indices() {
                if is_word_char(c) {
                    run_start.get_or_insert(i);
                    continue;
                }
                if let Some(start) = run_start.take() {
                    tokens.push(&s[start..i]);
                }
                tokens.push(&s[i..i + c.len_utf8()]);
            }
            if let Some(start) = run_start {
                tokens.push(&s[start..]);
            }
        }
    }
    tokens
}

// ---------------------------------------------------------------------------
// LCS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Keep,
    Delete,
    Insert,
}

/// Suffix-table LCS with a fixed traceback: take a match when the tokens are
/// equal, else delete from `a` when that keeps the LCS length, else insert.
fn lcs_steps<'a>(a: &[&'a str], b: &[&'a str], out: &mut Vec<(Step, &'a str)>) {
    let m = a.len();
    let n = b.len();
    let width = n + 1;
    let mut dp = vec![0u32; (m + 1) * width];
    for i in (0..m).rev() {
        for j in (0..n).rev() {
            dp[i * width + j] = if a[i] == b[j] {
                dp[(i + 1) * width + j + 1] + 1
            } else {
                dp[(i + 1) * width + j].max(dp[i * width + j + 1])
            };
        }
    }

    let (mut i, mut j) = (0usize, 0usize);
    while i < m && j < n {
        if a[i] == b[j] {
            out.push((Step::Keep, a[i]));
            i += 1;
            j += 1;
        } else if dp[(i + 1) * width + j] >= dp[i * width + j + 1] {
            out.push((Step::Delete, a[i]));
            i += 1;
        } else {
            out.push((Step::Insert, b[j]));
            j += 1;
        }
    }
    out.extend(a[i..].iter().map(|t| (Step::Delete, *t)));
    out.extend(b[j..].iter().map(|t| (Step::Insert, *t)));
}

/// LCS length with two rolling rows.
fn lcs_len<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            cur[j + 1] = if x == y { prev[j] + 1 } else { prev[j + 1].max(cur[j]) };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// Merge token steps into spans. A change run between two equal runs becomes
/// one Delete, Insert or Replace span.
fn coalesce(steps: &[(Step, &str)]) -> Vec<EditSpan> {
    let mut spans = Vec::new();
    let mut equal = String::new();
    let mut deleted = String::new();
    let mut inserted = String::new();

    let flush_change = |spans: &mut Vec<EditSpan>, deleted: &mut String, inserted: &mut String| {
        let span = match (deleted.is_empty(), inserted.is_empty()) {
            (true, true) => return,
            (false, true) => EditSpan::delete(std::mem::take(deleted)),
            (true, false) => EditSpan::insert(std::mem::take(inserted)),
            (false, false) => EditSpan::replace(std::mem::take(deleted), std::mem::take(inserted)),
        };
        spans.push(span);
    };

    for (step, token) in steps {
        match step {
            Step::Keep => {
                flush_change(&mut spans, &mut deleted, &mut inserted);
                equal.push_str(token);
            }
            Step::Delete | Step::Insert => {
                if !equal.is_empty() {
                    spans.push(EditSpan::equal(std::mem::take(&mut equal)));
                }
                if *step == Step::Delete {
                    deleted.push_str(token);
                } else {
                    inserted.push_str(token);
                }
            }
        }
    }
    flush_change(&mut spans, &mut deleted, &mut inserted);
    if !equal.is_empty() {
        spans.push(EditSpan::equal(equal));
    }
    spans
}

/// Rebuild the before side of an edit script.
pub fn old_text(spans: &[EditSpan]) -> String {
    spans.iter().map(|s| s.old.as_str()).collect()
}

/// Rebuild the after side of an edit script.
pub fn new_text(spans: &[EditSpan]) -> String {
    spans.iter().map(|s| s.new.as_str()).collect()
}

/// True when the script contains anything besides `Equal` spans.
pub fn has_changes(spans: &[EditSpan]) -> bool {
    spans.iter().any(|s| s.op != EditOp::Equal)
}
