use std::collections::HashMap;

use crate::types::Comment;

/// Build the threaded display list from a flat comment collection.
///
/// Comments without `in_reply_to_id` are roots; the rest are replies grouped
/// under the root they name, sorted ascending by creation time (stable, so
/// equal timestamps keep their input order). Replies pointing at an id that
/// is not a root have no recoverable place in this model and are dropped.
/// Roots come back ordered by `(file, line)` with unanchored comments first.
pub fn build_threads(flat: Vec<Comment>) -> Vec<Comment> {
    let mut roots: Vec<Comment> = Vec::new();
    let mut reply_groups: HashMap<u64, Vec<Comment>> = HashMap::new();

    for comment in flat {
        match comment.in_reply_to_id {
            Some(parent_id) => reply_groups.entry(parent_id).or_default().push(comment),
            None => roots.push(comment),
        }
    }

    for root in &mut roots {
        root.replies.clear();
        if let Some(mut group) = reply_groups.remove(&root.id) {
            group.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            for reply in &mut group {
                reply.thread_root_id = Some(root.id);
                reply.replies.clear();
            }
            root.replies = group;
        }
    }

    let orphaned: usize = reply_groups.values().map(Vec::len).sum();
    if orphaned > 0 {
        log::warn!("dropping {} orphaned replies with no matching root", orphaned);
    }

    roots.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    roots
}
