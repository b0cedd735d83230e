use std::collections::{BTreeSet, HashMap};

use crate::types::{Comment, Provenance, SkipReason, SubmissionDecision, SubmissionOutcome};

/// Decide, for each pending comment, whether the hosting service will accept
/// it, and why not when it won't.
///
/// `commentable` is the per-file right-side line set computed by
/// [`crate::commentable::commentable_lines`] from the diff the hosting
/// service renders; an empty map means that diff text was itself empty (for
/// example the remote fetch failed), in which case anchored comments pass
/// optimistically because nothing can be proven about them. Pure function:
/// the caller fetches provenance and diff data beforehand.
pub fn partition(
    pending: &[Comment],
    file_provenance: &HashMap<String, Provenance>,
    commentable: &HashMap<String, BTreeSet<u32>>,
) -> Vec<SubmissionDecision> {
    pending
        .iter()
        .map(|comment| SubmissionDecision {
            comment: comment.clone(),
            outcome: decide(comment, file_provenance, commentable),
        })
        .collect()
}

fn decide(
    comment: &Comment,
    file_provenance: &HashMap<String, Provenance>,
    commentable: &HashMap<String, BTreeSet<u32>>,
) -> SubmissionOutcome {
    // Conversation-level comments (no file/line) always go through
    let Some(anchor) = comment.anchor.as_ref() else {
        return SubmissionOutcome::Submittable;
    };
    let Some(line) = anchor.line else {
        return SubmissionOutcome::Submittable;
    };

    // Never-pushed content cannot exist in the hosted review's diff
    if file_provenance
        .get(&anchor.file)
        .is_some_and(|p| p.is_local_only())
    {
        return SubmissionOutcome::Skipped {
            reason: SkipReason::LocalOrUncommittedFile,
            valid_line_ranges: None,
        };
    }

    match commentable.get(&anchor.file) {
        Some(lines) if lines.contains(&line) => SubmissionOutcome::Submittable,
        Some(lines) => SubmissionOutcome::Skipped {
            reason: SkipReason::LineNotInDiff,
            valid_line_ranges: Some(compress_ranges(lines)),
        },
        None if !commentable.is_empty() => SubmissionOutcome::Skipped {
            reason: SkipReason::FileNotInDiff,
            valid_line_ranges: None,
        },
        // No diff data at all: optimistic fallback
        None => SubmissionOutcome::Submittable,
    }
}

/// Compress a sorted line set into inclusive range strings, e.g.
/// `{1,2,3,7,9,10}` becomes `["1-3", "7", "9-10"]`.
pub fn compress_ranges(lines: &BTreeSet<u32>) -> Vec<String> {
    let mut ranges = Vec::new();
    let mut iter = lines.iter().copied();

    let Some(first) = iter.next() else {
        return ranges;
    };
    let mut start = first;
    let mut end = first;

    for line in iter {
        if line == end + 1 {
            end = line;
        } else {
            ranges.push(format_range(start, end));
            start = line;
            end = line;
        }
    }
    ranges.push(format_range(start, end));

    ranges
}

fn format_range(start: u32, end: u32) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{}-{}", start, end)
    }
}
