use std::cmp::Ordering;

use serde::Serialize;

use crate::model::TranscriptRecord;

/// One step of a sorted merge over two key-ordered slices.
#[derive(Debug, PartialEq, Eq)]
pub enum MergeStep<'a, T> {
    Left(&'a T),
    Right(&'a T),
    Both(&'a T, &'a T),
}

/// Two-pointer merge of `left` and `right`, both ascending and unique by `key`.
///
/// Every iteration advances at least one cursor, so the merge finishes after at
/// most `left.len() + right.len()` steps even when the inputs are not sorted.
pub fn merge_sorted<'a, T, K, F>(left: &'a [T], right: &'a [T], key: F) -> Vec<MergeStep<'a, T>>
where
    K: Ord,
    F: Fn(&'a T) -> K,
{
    let mut out = Vec::with_capacity(left.len().max(right.len()));
    let mut ia = 0usize;
    let mut ib = 0usize;

    loop {
        let step = match (left.get(ia), right.get(ib)) {
            (None, None) => break,
            (None, Some(b)) => {
                ib += 1;
                MergeStep::Right(b)
            }
            (Some(a), None) => {
                ia += 1;
                MergeStep::Left(a)
            }
            (Some(a), Some(b)) => match key(a).cmp(&key(b)) {
                Ordering::Less => {
                    ia += 1;
                    MergeStep::Left(a)
                }
                Ordering::Greater => {
                    ib += 1;
                    MergeStep::Right(b)
                }
                Ordering::Equal => {
                    ia += 1;
                    ib += 1;
                    MergeStep::Both(a, b)
                }
            },
        };
        out.push(step);
    }

    out
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
}

impl DiffEntry {
    pub fn is_deletion(&self) -> bool {
        self.left.is_some() && self.right.is_none()
    }

    pub fn is_insertion(&self) -> bool {
        self.left.is_none() && self.right.is_some()
    }

    pub fn is_match(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PanelDiff {
    pub entries: Vec<DiffEntry>,
    pub insertions: usize,
    pub deletions: usize,
}

impl PanelDiff {
    pub fn from_entries(entries: Vec<DiffEntry>) -> Self {
        let deletions = entries.iter().filter(|e| e.is_deletion()).count();
        let insertions = entries.iter().filter(|e| e.is_insertion()).count();
        PanelDiff {
            entries,
            insertions,
            deletions,
        }
    }

    pub fn unchanged(&self) -> usize {
        self.entries.len() - self.insertions - self.deletions
    }
}

/// Diffs two transcript lists sorted ascending by refseq id.
pub fn diff_panels(seq_a: &[TranscriptRecord], seq_b: &[TranscriptRecord]) -> PanelDiff {
    let entries = merge_sorted(seq_a, seq_b, |r| r.sort_key.as_str())
        .into_iter()
        .map(|step| match step {
            MergeStep::Left(a) => DiffEntry {
                left: Some(a.label()),
                right: None,
            },
            MergeStep::Right(b) => DiffEntry {
                left: None,
                right: Some(b.label()),
            },
            MergeStep::Both(a, b) => DiffEntry {
                left: Some(a.label()),
                right: Some(b.label()),
            },
        })
        .collect();
    PanelDiff::from_entries(entries)
}

#[cfg(test)]
#[path = "../../tests/src_inline/diff/tests.rs"]
mod tests;
