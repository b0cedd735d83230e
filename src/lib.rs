//! Diff, provenance and review-comment engine for code review tools.
//!
//! The crate parses unified-diff text into a line-addressable model, tags
//! changed files with where their changes currently live (pushed, local-only
//! commits, uncommitted, or both), threads review comments, and decides
//! which pending comments a hosted review system will accept. Everything
//! here is pure and synchronous; diff retrieval, git status, persistence and
//! network submission belong to the calling program.

pub mod commentable;
pub mod parser;
pub mod provenance;
pub mod remote;
pub mod submit;
pub mod threads;
pub mod types;

pub use commentable::commentable_lines;
pub use parser::parse_diff;
pub use provenance::{attach_provenance, classify, needs_local_commit_diff, parse_name_status};
pub use remote::{issue_comments_from_json, review_comments_from_json, reviews_from_json};
pub use submit::{compress_ranges, partition};
pub use threads::build_threads;
pub use types::{
    Anchor, Comment, CommentKind, CommentStatus, DiffFile, DiffLine, FileStatus, Hunk, LineKind,
    Provenance, SkipReason, SubmissionDecision, SubmissionOutcome,
};
