use std::collections::HashMap;

use crate::types::{DiffFile, FileStatus, Provenance};

/// Classify each changed file by where its changes currently live, given the
/// three status maps the git collaborator computed: remote-base→remote-head
/// (`pushed`), remote-head→local-HEAD (`local_commits`) and the working tree
/// (`uncommitted`).
pub fn classify(
    files: &[String],
    pushed: &HashMap<String, FileStatus>,
    local_commits: &HashMap<String, FileStatus>,
    uncommitted: &HashMap<String, FileStatus>,
) -> HashMap<String, Provenance> {
    let mut tags = HashMap::with_capacity(files.len());

    for path in files {
        let in_pushed = pushed.contains_key(path);
        let in_local = local_commits.contains_key(path) || uncommitted.contains_key(path);

        let provenance = if in_pushed && in_local {
            Provenance::Both
        } else if in_pushed {
            Provenance::Pushed
        } else if local_commits.contains_key(path) {
            Provenance::Local
        } else if uncommitted.contains_key(path) {
            Provenance::Uncommitted
        } else {
            // A file in the overall diff matched none of the three status
            // maps; the diff and the git state have diverged. Default to
            // Pushed so comments on it are still attempted.
            log::warn!("file {} matched no git status map, defaulting to Pushed", path);
            Provenance::Pushed
        };

        tags.insert(path.clone(), provenance);
    }

    tags
}

/// Merge classified provenance tags into a parsed diff model.
pub fn attach_provenance(files: &mut [DiffFile], tags: &HashMap<String, Provenance>) {
    for file in files {
        file.provenance = tags.get(&file.path).copied();
    }
}

/// Whether the git collaborator needs to diff remote head against local HEAD
/// at all. When both resolve to the same revision there are no local-only
/// commits and `local_commits` must be the empty map; short-circuiting here
/// keeps classification correct without trusting the diff tool to return
/// empty output for identical revisions, and skips a pointless subprocess.
pub fn needs_local_commit_diff(remote_head: &str, local_head: &str) -> bool {
    remote_head.trim() != local_head.trim()
}

/// Parse `git diff --name-status` output into a path→status map.
///
/// Lines look like `M\tpath`, `A\tpath`, `D\tpath`, or for renames/copies
/// `R<score>\told\tnew` / `C<score>\told\tnew`, where the map key is the new
/// path. Malformed lines are skipped.
pub fn parse_name_status(output: &str) -> HashMap<String, FileStatus> {
    let mut map = HashMap::new();

    for line in output.lines() {
        let mut parts = line.split('\t');
        let Some(code) = parts.next() else { continue };
        let Some(first_path) = parts.next() else {
            continue;
        };

        let status = match code.chars().next() {
            Some('A') => FileStatus::Added,
            Some('M') => FileStatus::Modified,
            Some('D') => FileStatus::Deleted,
            Some('R') => FileStatus::Renamed,
            Some('C') => FileStatus::Copied,
            _ => {
                log::debug!("skipping unrecognized name-status line: {}", line);
                continue;
            }
        };

        // Renames and copies list old then new path; key on the new one
        let path = match status {
            FileStatus::Renamed | FileStatus::Copied => match parts.next() {
                Some(new_path) => new_path,
                None => {
                    log::debug!("skipping truncated rename/copy line: {}", line);
                    continue;
                }
            },
            _ => first_path,
        };

        map.insert(path.to_string(), status);
    }

    map
}
