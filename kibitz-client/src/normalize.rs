//! Automatic normalization of operation results into the cache
//!
//! Every entity in a result is written under its own key, and nested entities
//! are stored as links. This is what keeps already-cached reads up to date when
//! a result carries an entity the cache knows about.

use serde_json::{Map, Value};

use crate::{
    api::{
        typename, CommentFields, CommentId, CommentsPage, CommentsQuery, CreatedComment, User,
        Workspace,
    },
    cache::COMMENTS,
    Cache, EntityKey, EntityRef,
};

const AUTHOR: &str = "author";
pub(crate) const REPLIES: &str = "replies";

fn to_fields<T: serde::Serialize>(value: &T) -> Map<String, Value> {
    // all the types normalized here serialize as structs
    match serde_json::to_value(value).expect("serializing normalized value") {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub fn write_user<C: Cache>(cache: &mut C, user: &User) -> Option<EntityKey> {
    let entity = EntityRef::new(typename::USER, user.id.as_str());
    cache.write_entity(&entity, to_fields(user));
    cache.key_of_entity(&entity)
}

/// Writes a comment and its author, returning the comment's key
pub fn write_comment<C: Cache>(
    cache: &mut C,
    comment_typename: &str,
    comment: &CommentFields,
) -> Option<EntityKey> {
    let entity = EntityRef::new(comment_typename, comment.id.as_str());
    let mut fields = to_fields(comment);
    fields.remove(AUTHOR);
    cache.write_entity(&entity, fields);
    let author = write_user(cache, &comment.author);
    cache.link(&entity, AUTHOR, author.into_iter().collect());
    cache.key_of_entity(&entity)
}

pub fn write_created_comment<C: Cache>(cache: &mut C, comment: &CreatedComment) {
    write_comment(cache, comment.typename(), comment.fields());
}

pub fn write_workspace<C: Cache>(cache: &mut C, workspace: &Workspace) {
    let entity = EntityRef::new(typename::WORKSPACE, workspace.id.as_str());
    cache.write_entity(&entity, to_fields(workspace));
}

/// Writes a fetched comments page, replacing the cached `comments` list of its
/// container and the `replies` list of each of its top comments
pub fn write_comments_page<C: Cache>(cache: &mut C, query: &CommentsQuery, page: &CommentsPage) {
    let container = EntityRef::new(query.container_typename(), page.id.clone());
    let mut fields = Map::new();
    fields.insert(String::from("id"), Value::from(page.id.clone()));
    cache.write_entity(&container, fields);

    let mut top_keys = Vec::with_capacity(page.comments.len());
    for top in page.comments.iter() {
        let top_entity = EntityRef::new(typename::TOP_COMMENT, top.comment.id.as_str());
        top_keys.extend(write_comment(cache, typename::TOP_COMMENT, &top.comment));
        let reply_keys = top
            .replies
            .iter()
            .filter_map(|r| write_comment(cache, typename::REPLY_COMMENT, r))
            .collect();
        cache.link(&top_entity, REPLIES, reply_keys);
    }
    cache.link(&container, COMMENTS, top_keys);
}

/// Rebuilds a comment from its record and its author's record
pub fn read_comment<C: Cache>(cache: &C, key: &EntityKey) -> Option<CommentFields> {
    let entity = EntityRef::from_key(key)?;
    let mut fields = cache.read_entity(&entity)?;
    let author_key = cache.resolve(&entity, AUTHOR)?.into_iter().next()?;
    let author = cache.read_entity(&EntityRef::from_key(&author_key)?)?;
    fields.insert(String::from(AUTHOR), Value::Object(author));
    match serde_json::from_value(Value::Object(fields)) {
        Ok(c) => Some(c),
        Err(err) => {
            tracing::warn!(%key, %err, "cached comment record is incomplete");
            None
        }
    }
}

pub fn read_comments<C: Cache>(cache: &C, query: &CommentsQuery) -> Option<Vec<CommentFields>> {
    let container = EntityRef::new(query.container_typename(), query.container_id());
    let keys = cache.resolve(&container, COMMENTS)?;
    Some(keys.iter().filter_map(|k| read_comment(cache, k)).collect())
}

pub fn read_replies<C: Cache>(cache: &C, parent: &CommentId) -> Option<Vec<CommentFields>> {
    let parent = EntityRef::new(typename::TOP_COMMENT, parent.as_str());
    let keys = cache.resolve(&parent, REPLIES)?;
    Some(keys.iter().filter_map(|k| read_comment(cache, k)).collect())
}

pub fn read_workspace<C: Cache>(cache: &C, id: &str) -> Option<Workspace> {
    let fields = cache.read_entity(&EntityRef::new(typename::WORKSPACE, id))?;
    serde_json::from_value(Value::Object(fields)).ok()
}
