use std::collections::{BTreeSet, HashMap};

use regex::Regex;

/// Compute, per file, the set of right-side line numbers a hosted review
/// system will accept an inline comment on.
///
/// This re-runs the diff state machine collapsed to the new side: context and
/// added lines are commentable at the running new-line counter, removed lines
/// are not and do not advance it. It is a separate entry point from
/// [`crate::parser::parse_diff`] because it must be run against the diff the
/// hosting service itself renders, which is not always the diff driving the
/// local file tree.
pub fn commentable_lines(diff: &str) -> HashMap<String, BTreeSet<u32>> {
    let hunk_re = Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").unwrap();

    let mut map: HashMap<String, BTreeSet<u32>> = HashMap::new();
    let mut current_file: Option<String> = None;
    let mut new_ln: u32 = 0;
    let mut in_hunk = false;

    for line in diff.lines() {
        if let Some(rest) = line.strip_prefix("diff --git ") {
            current_file = rest
                .find(" b/")
                .map(|b_idx| rest[b_idx + 3..].to_string());
            new_ln = 0;
            in_hunk = false;
            continue;
        }

        if line.starts_with("@@ ") {
            match hunk_re.captures(line) {
                Some(caps) => {
                    new_ln = caps
                        .get(3)
                        .and_then(|m| m.as_str().parse().ok())
                        .unwrap_or(0);
                    in_hunk = true;
                }
                None => {
                    log::debug!("skipping malformed hunk header: {}", line);
                    in_hunk = false;
                }
            }
            continue;
        }

        // Metadata between the file header and the first hunk
        if !in_hunk {
            continue;
        }

        let Some(file) = current_file.as_ref() else {
            continue;
        };

        if line.starts_with('+') {
            map.entry(file.clone()).or_default().insert(new_ln);
            new_ln += 1;
        } else if line.starts_with('-') {
            // Left-side only: not commentable, new counter untouched
        } else if line.starts_with(' ') || line.is_empty() {
            map.entry(file.clone()).or_default().insert(new_ln);
            new_ln += 1;
        } else if line.starts_with('\\') {
            // "\ No newline at end of file"
        } else {
            // Unknown line ends the hunk
            in_hunk = false;
        }
    }

    map
}
