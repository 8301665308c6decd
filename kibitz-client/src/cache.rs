use std::{collections::HashMap, fmt};

use serde_json::{Map, Value};

use crate::api::CommentsQuery;

/// Key of a normalized entity, `Typename:id`
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EntityKey(pub String);

impl EntityKey {
    /// Splits the key back into its typename and id
    pub fn parts(&self) -> Option<(&str, &str)> {
        self.0.split_once(':')
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to an entity by typename and id, not necessarily cached
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct EntityRef {
    pub typename: String,
    pub id: String,
}

impl EntityRef {
    pub fn new(typename: &str, id: impl Into<String>) -> EntityRef {
        EntityRef {
            typename: String::from(typename),
            id: id.into(),
        }
    }

    pub fn from_key(key: &EntityKey) -> Option<EntityRef> {
        key.parts().map(|(typename, id)| EntityRef::new(typename, id))
    }
}

/// Query-shaped view of a cached `comments` list
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommentsData {
    /// Id of the workspace or change owning the list
    pub id: String,
    pub comments: Vec<EntityRef>,
}

/// The primitives a normalized object cache offers
///
/// There are two write paths. `update_query` edits the result shape of a
/// cached query, while `link` overwrites a relationship field of an entity.
pub trait Cache {
    fn key_of_entity(&self, entity: &EntityRef) -> Option<EntityKey>;

    fn read_entity(&self, entity: &EntityRef) -> Option<Map<String, Value>>;

    /// Merges `fields` into the entity's scalar fields, creating it if needed
    fn write_entity(&mut self, entity: &EntityRef, fields: Map<String, Value>);

    fn resolve(&self, entity: &EntityRef, field: &str) -> Option<Vec<EntityKey>>;

    fn link(&mut self, entity: &EntityRef, field: &str, keys: Vec<EntityKey>);

    /// Reads the cached result of `query`, hands it to `update` and writes it
    /// back. Does nothing if the query was never cached.
    fn update_query<F>(&mut self, query: &CommentsQuery, update: F)
    where
        F: FnOnce(&mut CommentsData);
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Record {
    pub fields: Map<String, Value>,
    pub links: HashMap<String, Vec<EntityKey>>,
}

/// In-memory normalized cache, one record per entity key
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NormalizedCache {
    records: HashMap<EntityKey, Record>,
}

pub(crate) const COMMENTS: &str = "comments";

impl NormalizedCache {
    pub fn new() -> NormalizedCache {
        NormalizedCache::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, key: &EntityKey) -> Option<&Record> {
        self.records.get(key)
    }

    fn record_mut(&mut self, entity: &EntityRef) -> Option<&mut Record> {
        let key = self.key_of_entity(entity)?;
        Some(self.records.entry(key).or_default())
    }
}

impl Cache for NormalizedCache {
    fn key_of_entity(&self, entity: &EntityRef) -> Option<EntityKey> {
        if entity.typename.is_empty() || entity.id.is_empty() {
            return None;
        }
        Some(EntityKey(format!("{}:{}", entity.typename, entity.id)))
    }

    fn read_entity(&self, entity: &EntityRef) -> Option<Map<String, Value>> {
        let key = self.key_of_entity(entity)?;
        self.records.get(&key).map(|r| r.fields.clone())
    }

    fn write_entity(&mut self, entity: &EntityRef, fields: Map<String, Value>) {
        match self.record_mut(entity) {
            Some(r) => r.fields.extend(fields),
            None => tracing::warn!(?entity, "refusing to write entity without a key"),
        }
    }

    fn resolve(&self, entity: &EntityRef, field: &str) -> Option<Vec<EntityKey>> {
        let key = self.key_of_entity(entity)?;
        self.records.get(&key)?.links.get(field).cloned()
    }

    fn link(&mut self, entity: &EntityRef, field: &str, keys: Vec<EntityKey>) {
        match self.record_mut(entity) {
            Some(r) => {
                r.links.insert(String::from(field), keys);
            }
            None => tracing::warn!(?entity, field, "refusing to link entity without a key"),
        }
    }

    fn update_query<F>(&mut self, query: &CommentsQuery, update: F)
    where
        F: FnOnce(&mut CommentsData),
    {
        let container = EntityRef::new(query.container_typename(), query.container_id());
        let keys = match self.resolve(&container, COMMENTS) {
            Some(keys) => keys,
            None => {
                tracing::debug!(?query, "query is not cached, skipping update");
                return;
            }
        };
        let mut data = CommentsData {
            id: container.id.clone(),
            comments: keys.iter().filter_map(EntityRef::from_key).collect(),
        };
        update(&mut data);
        let keys = data
            .comments
            .iter()
            .filter_map(|c| self.key_of_entity(c))
            .collect();
        self.link(&container, COMMENTS, keys);
    }
}
