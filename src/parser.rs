use regex::Regex;

use crate::types::{DiffFile, DiffLine, FileStatus, Hunk, LineKind};

/// Parse a unified diff string into structured DiffFile objects
pub fn parse_diff(diff: &str) -> Vec<DiffFile> {
    let mut files = Vec::new();
    let lines: Vec<&str> = diff.lines().collect();
    let mut i = 0;

    while i < lines.len() {
        // Look for diff --git header
        if lines[i].starts_with("diff --git ") {
            if let Some((file, consumed)) = parse_file(&lines[i..]) {
                files.push(file);
                i += consumed;
                continue;
            }
        }
        i += 1;
    }

    files
}

fn parse_file(lines: &[&str]) -> Option<(DiffFile, usize)> {
    if lines.is_empty() || !lines[0].starts_with("diff --git ") {
        return None;
    }

    let mut i = 0;
    let mut path = String::new();
    let mut old_path = None;
    let mut status = FileStatus::Modified;
    let mut explicit_status = false;
    let mut hunks = Vec::new();

    // Parse diff --git line to get path
    // Format: diff --git a/path/to/file b/path/to/file
    let git_line = lines[i];
    if let Some(b_idx) = git_line.find(" b/") {
        path = git_line[b_idx + 3..].to_string();
    }
    i += 1;

    // Parse metadata lines
    while i < lines.len() {
        let line = lines[i];

        if line.starts_with("new file mode") {
            status = FileStatus::Added;
            explicit_status = true;
        } else if line.starts_with("deleted file mode") {
            status = FileStatus::Deleted;
            explicit_status = true;
        } else if let Some(from) = line.strip_prefix("rename from ") {
            status = FileStatus::Renamed;
            explicit_status = true;
            old_path = Some(from.to_string());
        } else if let Some(from) = line.strip_prefix("copy from ") {
            status = FileStatus::Copied;
            explicit_status = true;
            old_path = Some(from.to_string());
        } else if line.starts_with("--- ") {
            // Start of actual diff content, skip this line
            i += 1;
            // Skip +++ line too
            if i < lines.len() && lines[i].starts_with("+++ ") {
                i += 1;
            }
            break;
        } else if line.starts_with("diff --git ") {
            // Next file started (mode-only or rename-only change)
            break;
        } else if line.starts_with("Binary files") {
            // Binary file, skip
            i += 1;
            break;
        }
        // Remaining metadata (index, similarity, rename to, copy to,
        // old/new mode) is discarded and never touches the line counters
        i += 1;
    }

    // Parse hunks
    while i < lines.len() {
        let line = lines[i];

        if line.starts_with("diff --git ") {
            // Next file
            break;
        }

        if line.starts_with("@@ ") {
            if let Some((hunk, consumed)) = parse_hunk(&lines[i..]) {
                hunks.push(hunk);
                i += consumed;
                continue;
            }
            // One corrupt hunk header must not lose the rest of the parse
            log::debug!("skipping malformed hunk header: {}", line);
        }

        i += 1;
    }

    if !explicit_status {
        status = infer_status(&hunks);
    }

    Some((
        DiffFile {
            path,
            old_path,
            status,
            hunks,
            provenance: None,
        },
        i,
    ))
}

/// Infer the file status from hunk content when the diff carries no
/// `new file`/`deleted file`/`rename` metadata: a body of only added lines
/// is an addition, only removed lines a deletion, anything else a
/// modification.
fn infer_status(hunks: &[Hunk]) -> FileStatus {
    let mut saw_add = false;
    let mut saw_del = false;
    let mut saw_context = false;

    for line in hunks.iter().flat_map(|h| &h.lines) {
        match line.kind {
            LineKind::Add => saw_add = true,
            LineKind::Del => saw_del = true,
            LineKind::Context => saw_context = true,
        }
    }

    if saw_add && !saw_del && !saw_context {
        FileStatus::Added
    } else if saw_del && !saw_add && !saw_context {
        FileStatus::Deleted
    } else {
        FileStatus::Modified
    }
}

fn parse_hunk(lines: &[&str]) -> Option<(Hunk, usize)> {
    if lines.is_empty() || !lines[0].starts_with("@@ ") {
        return None;
    }

    let header = lines[0].to_string();

    // Parse @@ -old_start,old_count +new_start,new_count @@ optional context
    let hunk_re = Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").unwrap();
    let caps = hunk_re.captures(&header)?;

    let old_start: u32 = caps.get(1)?.as_str().parse().ok()?;
    let old_count: u32 = caps.get(2).map_or(1, |m| m.as_str().parse().unwrap_or(1));
    let new_start: u32 = caps.get(3)?.as_str().parse().ok()?;
    let new_count: u32 = caps.get(4).map_or(1, |m| m.as_str().parse().unwrap_or(1));

    let mut diff_lines = Vec::new();
    let mut i = 1;
    let mut old_ln = old_start;
    let mut new_ln = new_start;

    while i < lines.len() {
        let line = lines[i];

        // Stop at next hunk or next file
        if line.starts_with("@@ ") || line.starts_with("diff --git ") {
            break;
        }

        let (kind, old, new) = if line.starts_with('+') {
            let ln = new_ln;
            new_ln += 1;
            (LineKind::Add, None, Some(ln))
        } else if line.starts_with('-') {
            let ln = old_ln;
            old_ln += 1;
            (LineKind::Del, Some(ln), None)
        } else if line.starts_with(' ') || line.is_empty() {
            let o = old_ln;
            let n = new_ln;
            old_ln += 1;
            new_ln += 1;
            (LineKind::Context, Some(o), Some(n))
        } else if line.starts_with('\\') {
            // "\ No newline at end of file"
            i += 1;
            continue;
        } else {
            // Unknown line, might be end of hunk
            break;
        };

        // Strip the leading +/- / space
        let content = if line.is_empty() {
            String::new()
        } else {
            line[1..].to_string()
        };

        diff_lines.push(DiffLine {
            kind,
            content,
            old_ln: old,
            new_ln: new,
        });

        i += 1;
    }

    Some((
        Hunk {
            header,
            old_start,
            old_count,
            new_start,
            new_count,
            lines: diff_lines,
        },
        i,
    ))
}
