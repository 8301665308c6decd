//! Cache updates run after a mutation succeeded
//!
//! Cached `comments` and `replies` lists are lists on the wire but sets in
//! meaning: a reconciler only ever appends an entry that is not already there,
//! so running one twice for the same result changes nothing the second time.

use crate::{
    api::{
        typename, CommentId, CommentTarget, CommentsQuery, CreateCommentInput, CreatedComment,
        LandWorkspaceChangeInput, Workspace,
    },
    normalize::REPLIES,
    Cache, EntityRef,
};

/// Adds a freshly created comment to every cached list it now belongs to
///
/// Lists that are not cached are left alone. Each target named by `input` is
/// handled on its own, so an input naming both a workspace and a change
/// updates both lists.
pub fn create_comment<C: Cache>(cache: &mut C, result: &CreatedComment, input: &CreateCommentInput) {
    let targets = input.targets();
    if targets.len() > 1 {
        tracing::warn!(
            comment = %result.id(),
            num_targets = targets.len(),
            "comment creation names several targets, reconciling all of them"
        );
    }
    for t in targets {
        match t {
            CommentTarget::Workspace(w) => {
                append_top_comment(cache, &CommentsQuery::Workspace(w), result)
            }
            CommentTarget::Change(c) => append_top_comment(cache, &CommentsQuery::Change(c), result),
            CommentTarget::Reply(parent) => link_reply(cache, &parent, result),
        }
    }
}

fn append_top_comment<C: Cache>(cache: &mut C, query: &CommentsQuery, result: &CreatedComment) {
    let comment = match result {
        CreatedComment::Top(c) => c,
        CreatedComment::Reply(c) => {
            tracing::debug!(comment = %c.id, ?query, "replies are not top-level comments");
            return;
        }
    };
    cache.update_query(query, |data| {
        if data.comments.iter().any(|c| c.id == comment.id.0) {
            return;
        }
        tracing::debug!(comment = %comment.id, ?query, "appending comment to cached list");
        data.comments
            .push(EntityRef::new(typename::TOP_COMMENT, comment.id.as_str()));
    });
}

fn link_reply<C: Cache>(cache: &mut C, parent: &CommentId, result: &CreatedComment) {
    let parent = EntityRef::new(typename::TOP_COMMENT, parent.as_str());
    let mut replies = match cache.resolve(&parent, REPLIES) {
        Some(r) => r,
        None => {
            tracing::debug!(?parent, "replies are not cached, skipping");
            return;
        }
    };
    let key = match cache.key_of_entity(&EntityRef::new(result.typename(), result.id().as_str())) {
        Some(k) => k,
        None => return,
    };
    if replies.contains(&key) {
        return;
    }
    tracing::debug!(?parent, %key, "linking reply");
    replies.push(key);
    cache.link(&parent, REPLIES, replies);
}

/// Landing a change needs no manual cache update
///
/// The result only carries fields of the workspace entity, which the cache
/// already knows by id. Normalizing the result updates every cached read of
/// that workspace in place.
pub fn land_workspace_change<C: Cache>(
    _cache: &mut C,
    _result: &Workspace,
    _input: &LandWorkspaceChangeInput,
) {
}
