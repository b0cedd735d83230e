//! Deserialization of the hosting service's comment payloads into the
//! unified [`Comment`] model. Fetching the JSON is the network
//! collaborator's job; these functions only parse what it hands over.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::types::{Anchor, Comment, CommentKind, CommentStatus};

#[derive(Debug, Deserialize)]
struct UserPayload {
    login: String,
}

/// One entry of the `pulls/{n}/comments` payload (inline review comments)
#[derive(Debug, Deserialize)]
struct ReviewCommentPayload {
    id: u64,
    body: String,
    user: UserPayload,
    path: String,
    /// Null for outdated comments whose anchor no longer resolves
    line: Option<u32>,
    #[serde(default)]
    start_line: Option<u32>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    in_reply_to_id: Option<u64>,
}

/// One entry of the `issues/{n}/comments` payload (conversation comments)
#[derive(Debug, Deserialize)]
struct IssueCommentPayload {
    id: u64,
    body: String,
    user: UserPayload,
    created_at: DateTime<Utc>,
}

/// One entry of the `pulls/{n}/reviews` payload (review summaries)
#[derive(Debug, Deserialize)]
struct ReviewPayload {
    id: u64,
    /// Missing or null for bare approvals
    #[serde(default)]
    body: Option<String>,
    user: UserPayload,
    #[serde(default)]
    submitted_at: Option<DateTime<Utc>>,
}

/// Paginated responses come back as empty strings or bare `[]` when a PR has
/// no comments of the requested kind
fn is_empty_payload(json: &str) -> bool {
    let trimmed = json.trim();
    trimmed.is_empty() || trimmed == "[]"
}

/// Parse the inline review comments payload into [`Comment`] records.
pub fn review_comments_from_json(json: &str) -> Result<Vec<Comment>> {
    if is_empty_payload(json) {
        return Ok(Vec::new());
    }

    let payloads: Vec<ReviewCommentPayload> =
        serde_json::from_str(json).context("Failed to parse review comments")?;

    Ok(payloads
        .into_iter()
        .map(|p| Comment {
            id: p.id,
            kind: CommentKind::Review,
            anchor: Some(Anchor {
                file: p.path,
                line: p.line,
                start_line: p.start_line,
            }),
            author: p.user.login,
            body: p.body,
            created_at: p.created_at,
            status: CommentStatus::Submitted,
            resolved: None,
            thread_root_id: None,
            in_reply_to_id: p.in_reply_to_id,
            replies: Vec::new(),
        })
        .collect())
}

/// Parse the conversation-level comments payload into [`Comment`] records.
pub fn issue_comments_from_json(json: &str) -> Result<Vec<Comment>> {
    if is_empty_payload(json) {
        return Ok(Vec::new());
    }

    let payloads: Vec<IssueCommentPayload> =
        serde_json::from_str(json).context("Failed to parse conversation comments")?;

    Ok(payloads
        .into_iter()
        .map(|p| Comment {
            id: p.id,
            kind: CommentKind::Conversation,
            anchor: None,
            author: p.user.login,
            body: p.body,
            created_at: p.created_at,
            status: CommentStatus::Submitted,
            resolved: None,
            thread_root_id: None,
            in_reply_to_id: None,
            replies: Vec::new(),
        })
        .collect())
}

/// Parse the review summaries payload into [`Comment`] records.
///
/// Bodiless entries (bare approvals) and unsubmitted drafts carry nothing a
/// comment panel can show and are filtered out.
pub fn reviews_from_json(json: &str) -> Result<Vec<Comment>> {
    if is_empty_payload(json) {
        return Ok(Vec::new());
    }

    let payloads: Vec<ReviewPayload> =
        serde_json::from_str(json).context("Failed to parse reviews")?;

    Ok(payloads
        .into_iter()
        .filter_map(|p| {
            let body = p.body.unwrap_or_default();
            if body.is_empty() {
                return None;
            }
            let submitted_at = p.submitted_at?;
            Some(Comment {
                id: p.id,
                kind: CommentKind::ReviewSummary,
                anchor: None,
                author: p.user.login,
                body,
                created_at: submitted_at,
                status: CommentStatus::Submitted,
                resolved: None,
                thread_root_id: None,
                in_reply_to_id: None,
                replies: Vec::new(),
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_comments_empty_payloads() {
        assert!(review_comments_from_json("").unwrap().is_empty());
        assert!(review_comments_from_json("  \n").unwrap().is_empty());
        assert!(review_comments_from_json("[]").unwrap().is_empty());
    }

    #[test]
    fn test_review_comments_basic() {
        let json = r#"[
            {
                "id": 11,
                "body": "consider renaming this",
                "user": {"login": "alice"},
                "path": "src/lib.rs",
                "line": 42,
                "created_at": "2024-01-15T10:30:00Z"
            }
        ]"#;
        let comments = review_comments_from_json(json).unwrap();

        assert_eq!(comments.len(), 1);
        let c = &comments[0];
        assert_eq!(c.id, 11);
        assert_eq!(c.kind, CommentKind::Review);
        assert_eq!(c.author, "alice");
        assert_eq!(c.status, CommentStatus::Submitted);

        let anchor = c.anchor.as_ref().unwrap();
        assert_eq!(anchor.file, "src/lib.rs");
        assert_eq!(anchor.line, Some(42));
        assert_eq!(anchor.start_line, None);
    }

    #[test]
    fn test_review_comment_reply_keeps_in_reply_to() {
        let json = r#"[
            {
                "id": 12,
                "body": "agreed",
                "user": {"login": "bob"},
                "path": "src/lib.rs",
                "line": 42,
                "created_at": "2024-01-15T11:00:00Z",
                "in_reply_to_id": 11
            }
        ]"#;
        let comments = review_comments_from_json(json).unwrap();
        assert_eq!(comments[0].in_reply_to_id, Some(11));
        assert!(comments[0].is_reply());
    }

    #[test]
    fn test_review_comment_outdated_null_line() {
        let json = r#"[
            {
                "id": 13,
                "body": "this moved",
                "user": {"login": "alice"},
                "path": "src/old.rs",
                "line": null,
                "created_at": "2024-01-15T11:00:00Z"
            }
        ]"#;
        let comments = review_comments_from_json(json).unwrap();

        let anchor = comments[0].anchor.as_ref().unwrap();
        assert_eq!(anchor.line, None);
        assert!(!comments[0].is_inline());
    }

    #[test]
    fn test_review_comment_multiline() {
        let json = r#"[
            {
                "id": 14,
                "body": "whole block",
                "user": {"login": "alice"},
                "path": "src/lib.rs",
                "line": 20,
                "start_line": 15,
                "created_at": "2024-01-15T11:00:00Z"
            }
        ]"#;
        let comments = review_comments_from_json(json).unwrap();
        let anchor = comments[0].anchor.as_ref().unwrap();
        assert!(anchor.is_multiline());
        assert_eq!(anchor.start_line, Some(15));
        assert_eq!(anchor.line, Some(20));
    }

    #[test]
    fn test_review_comments_malformed_json_errors() {
        assert!(review_comments_from_json("{not json").is_err());
    }

    #[test]
    fn test_issue_comments_are_unanchored() {
        let json = r#"[
            {
                "id": 21,
                "body": "LGTM overall",
                "user": {"login": "carol"},
                "created_at": "2024-01-16T09:00:00Z"
            }
        ]"#;
        let comments = issue_comments_from_json(json).unwrap();

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].kind, CommentKind::Conversation);
        assert!(comments[0].anchor.is_none());
    }

    #[test]
    fn test_reviews_filter_bodiless_and_unsubmitted() {
        let json = r#"[
            {
                "id": 31,
                "body": "",
                "user": {"login": "dave"},
                "state": "APPROVED",
                "submitted_at": "2024-01-17T08:00:00Z"
            },
            {
                "id": 32,
                "body": "a few nits inline",
                "user": {"login": "erin"},
                "state": "COMMENTED",
                "submitted_at": "2024-01-17T09:00:00Z"
            },
            {
                "id": 33,
                "body": "draft thoughts",
                "user": {"login": "frank"},
                "state": "PENDING",
                "submitted_at": null
            }
        ]"#;
        let comments = reviews_from_json(json).unwrap();

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, 32);
        assert_eq!(comments[0].kind, CommentKind::ReviewSummary);
        assert!(comments[0].anchor.is_none());
    }

    #[test]
    fn test_reviews_null_or_missing_body_filtered() {
        // Bare approvals can carry "body": null or omit the field entirely
        let json = r#"[
            {
                "id": 41,
                "body": null,
                "user": {"login": "dave"},
                "state": "APPROVED",
                "submitted_at": "2024-01-17T08:00:00Z"
            },
            {
                "id": 42,
                "user": {"login": "erin"},
                "state": "APPROVED",
                "submitted_at": "2024-01-17T08:30:00Z"
            },
            {
                "id": 43,
                "body": "one real summary",
                "user": {"login": "frank"},
                "state": "COMMENTED",
                "submitted_at": "2024-01-17T09:00:00Z"
            }
        ]"#;
        let comments = reviews_from_json(json).unwrap();

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, 43);
        assert_eq!(comments[0].body, "one real summary");
    }

    #[test]
    fn test_remote_comments_thread_end_to_end() {
        // Fetched payloads feed straight into the thread builder
        let json = r#"[
            {
                "id": 1,
                "body": "root",
                "user": {"login": "alice"},
                "path": "a.rs",
                "line": 10,
                "created_at": "2024-01-15T10:00:00Z"
            },
            {
                "id": 2,
                "body": "reply",
                "user": {"login": "bob"},
                "path": "a.rs",
                "line": 10,
                "created_at": "2024-01-15T10:05:00Z",
                "in_reply_to_id": 1
            }
        ]"#;
        let comments = review_comments_from_json(json).unwrap();
        let threads = crate::threads::build_threads(comments);

        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].id, 1);
        assert_eq!(threads[0].replies.len(), 1);
        assert_eq!(threads[0].replies[0].author, "bob");
    }
}
