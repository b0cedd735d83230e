use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents the status of a file in the diff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileStatus {
    Added,
    Deleted,
    Modified,
    Renamed,
    Copied,
}

/// Where a changed file's content currently lives relative to the remote.
///
/// `Pushed` changes exist on the remote head; `Local` changes exist only in
/// commits that have not been pushed; `Uncommitted` changes exist only in the
/// working tree; `Both` means the file is pushed and has further local or
/// uncommitted modifications on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    Pushed,
    Local,
    Uncommitted,
    Both,
}

impl Provenance {
    /// Whether any part of this file's changes exists only locally.
    pub fn is_local_only(&self) -> bool {
        matches!(self, Provenance::Local | Provenance::Uncommitted)
    }
}

/// Type of a diff line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    Context,
    Add,
    Del,
}

/// A single line in a diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub kind: LineKind,
    pub content: String,
    pub old_ln: Option<u32>,
    pub new_ln: Option<u32>,
}

/// A hunk in a diff (a contiguous block of changes)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    pub header: String,
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    pub lines: Vec<DiffLine>,
}

/// A file in the diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffFile {
    pub path: String,
    pub old_path: Option<String>,
    pub status: FileStatus,
    pub hunks: Vec<Hunk>,
    /// Attached after parsing, and only in combined local+remote review mode.
    pub provenance: Option<Provenance>,
}

/// What kind of comment a record is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentKind {
    /// Authored locally, not yet sent to the hosting service.
    Local,
    /// A conversation-level (issue) comment on the review as a whole.
    Conversation,
    /// An inline review comment anchored to a file/line.
    Review,
    /// The summary body of a submitted review.
    ReviewSummary,
}

/// Lifecycle status of a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentStatus {
    Pending,
    Submitted,
    AiProcessing,
    AiComplete,
}

/// File/line anchor of an inline comment.
///
/// A comment without an anchor is conversation-level. `line` is the end line
/// of a multi-line selection; `start_line` is set only for multi-line
/// selections. An anchor with `line: None` points at a file whose anchored
/// line is no longer resolvable (an outdated remote comment).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub file: String,
    pub line: Option<u32>,
    pub start_line: Option<u32>,
}

impl Anchor {
    pub fn new(file: String, line: u32) -> Self {
        Self {
            file,
            line: Some(line),
            start_line: None,
        }
    }

    pub fn multiline(file: String, start_line: u32, end_line: u32) -> Self {
        Self {
            file,
            line: Some(end_line),
            start_line: Some(start_line),
        }
    }

    pub fn is_multiline(&self) -> bool {
        self.start_line.is_some()
    }
}

/// A review comment, local or fetched from the hosting service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub kind: CommentKind,
    pub anchor: Option<Anchor>,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub status: CommentStatus,
    pub resolved: Option<bool>,
    /// Id of the thread root this comment hangs under, set during threading.
    pub thread_root_id: Option<u64>,
    /// Id of the comment this one replies to; replies never appear as roots.
    pub in_reply_to_id: Option<u64>,
    /// Populated on roots by threading; always empty on replies.
    pub replies: Vec<Comment>,
}

impl Comment {
    /// A locally authored pending comment anchored to a file/line.
    pub fn new_local(id: u64, body: String, file: String, line: u32) -> Self {
        Self {
            id,
            kind: CommentKind::Local,
            anchor: Some(Anchor::new(file, line)),
            author: String::new(),
            body,
            created_at: Utc::now(),
            status: CommentStatus::Pending,
            resolved: None,
            thread_root_id: None,
            in_reply_to_id: None,
            replies: Vec::new(),
        }
    }

    /// A locally authored pending comment not anchored to any line.
    pub fn new_general(id: u64, body: String) -> Self {
        Self {
            id,
            kind: CommentKind::Local,
            anchor: None,
            author: String::new(),
            body,
            created_at: Utc::now(),
            status: CommentStatus::Pending,
            resolved: None,
            thread_root_id: None,
            in_reply_to_id: None,
            replies: Vec::new(),
        }
    }

    pub fn is_inline(&self) -> bool {
        self.anchor
            .as_ref()
            .map(|a| a.line.is_some())
            .unwrap_or(false)
    }

    pub fn is_reply(&self) -> bool {
        self.in_reply_to_id.is_some()
    }

    /// Sort key used for the threaded display order: anchored comments order
    /// by `(file, line)`, unanchored ones take the sentinel `("", 0)` and so
    /// sort before all anchored ones.
    pub fn sort_key(&self) -> (&str, u32) {
        match &self.anchor {
            Some(a) => (a.file.as_str(), a.line.unwrap_or(0)),
            None => ("", 0),
        }
    }
}

/// Why a pending comment cannot be sent to the hosting service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The file's changes were never pushed, so its lines cannot exist in
    /// the hosted review's diff.
    LocalOrUncommittedFile,
    /// The file is in the hosted diff but the anchored line is not on its
    /// right side.
    LineNotInDiff,
    /// The hosted diff does not touch the file at all.
    FileNotInDiff,
}

/// Outcome of a submission check for one pending comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionOutcome {
    Submittable,
    Skipped {
        reason: SkipReason,
        /// Compressed right-side line ranges the hosting service would
        /// accept for this file, e.g. `["1-3", "7", "9-10"]`. Set only for
        /// `LineNotInDiff`.
        valid_line_ranges: Option<Vec<String>>,
    },
}

/// One pending comment paired with the decision on whether it can be sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionDecision {
    pub comment: Comment,
    pub outcome: SubmissionOutcome,
}

impl SubmissionDecision {
    pub fn is_submittable(&self) -> bool {
        matches!(self.outcome, SubmissionOutcome::Submittable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_multiline() {
        let anchor = Anchor::multiline("src/main.rs".to_string(), 3, 9);
        assert_eq!(anchor.line, Some(9));
        assert_eq!(anchor.start_line, Some(3));
        assert!(anchor.is_multiline());
    }

    #[test]
    fn test_comment_is_inline() {
        let inline = Comment::new_local(1, "body".to_string(), "a.rs".to_string(), 5);
        let general = Comment::new_general(2, "body".to_string());
        assert!(inline.is_inline());
        assert!(!general.is_inline());
    }

    #[test]
    fn test_sort_key_unanchored_first() {
        let inline = Comment::new_local(1, "body".to_string(), "a.rs".to_string(), 5);
        let general = Comment::new_general(2, "body".to_string());
        assert!(general.sort_key() < inline.sort_key());
    }

    #[test]
    fn test_provenance_is_local_only() {
        assert!(Provenance::Local.is_local_only());
        assert!(Provenance::Uncommitted.is_local_only());
        assert!(!Provenance::Pushed.is_local_only());
        assert!(!Provenance::Both.is_local_only());
    }

    #[test]
    fn test_comment_serde_round_trip() {
        let comment = Comment::new_local(7, "needs a test".to_string(), "lib.rs".to_string(), 12);
        let json = serde_json::to_string(&comment).unwrap();
        let back: Comment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, comment);
    }
}
