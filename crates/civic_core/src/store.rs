//! Store collaborator seam and an in-memory implementation.
//!
//! The real persistence backend lives outside this workspace. Anything that
//! can upsert a mapping under `(entity_type, key)` and resolve one by id can
//! stand in for it.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use civic_logging::civic_debug;
use serde_json::Value;
use thiserror::Error;

use crate::{Event, Mapping};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store backend failure: {0}")]
    Backend(String),
}

pub trait DocumentStore: Send + Sync {
    /// Insert or replace the document stored under `key`. Idempotent on `key`.
    fn upsert(&self, entity_type: &str, key: &str, document: &Mapping) -> Result<(), StoreError>;

    fn resolve_reference(&self, entity_type: &str, id: &str) -> Result<Option<Mapping>, StoreError>;

    /// Look up a canonical entity by its `name` field, returning its id.
    fn find_by_name(&self, entity_type: &str, name: &str) -> Result<Option<String>, StoreError>;
}

/// In-memory store for tests and embedding. Keys are kept sorted.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    docs: RwLock<BTreeMap<(String, String), Mapping>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents stored across all entity types. A poisoned lock still
    /// reports what was written before the panic.
    pub fn len(&self) -> usize {
        self.docs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys stored for `entity_type`, in sorted order.
    pub fn keys(&self, entity_type: &str) -> Vec<String> {
        self.docs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .filter(|(kind, _)| kind == entity_type)
            .map(|(_, key)| key.clone())
            .collect()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("store lock poisoned".to_string())
}

impl DocumentStore for InMemoryStore {
    fn upsert(&self, entity_type: &str, key: &str, document: &Mapping) -> Result<(), StoreError> {
        let mut docs = self.docs.write().map_err(|_| poisoned())?;
        let replaced = docs
            .insert((entity_type.to_string(), key.to_string()), document.clone())
            .is_some();
        civic_debug!("upsert {entity_type}/{key} (replaced: {replaced})");
        Ok(())
    }

    fn resolve_reference(&self, entity_type: &str, id: &str) -> Result<Option<Mapping>, StoreError> {
        let docs = self.docs.read().map_err(|_| poisoned())?;
        Ok(docs
            .get(&(entity_type.to_string(), id.to_string()))
            .cloned())
    }

    fn find_by_name(&self, entity_type: &str, name: &str) -> Result<Option<String>, StoreError> {
        let docs = self.docs.read().map_err(|_| poisoned())?;
        Ok(docs
            .iter()
            .find(|((kind, _), doc)| {
                kind == entity_type && doc.get("name") == Some(&Value::String(name.to_string()))
            })
            .map(|((_, key), _)| key.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("{entity_type} `{name}` carries no id")]
    Unidentified { entity_type: &'static str, name: String },
    #[error("{entity_type} `{id}` does not resolve in the store")]
    Dangling { entity_type: &'static str, id: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Check that every projection embedded in `event` resolves to a canonical
/// entity. Stops at the first unresolved reference.
pub fn verify_references(event: &Event, store: &dyn DocumentStore) -> Result<(), ReferenceError> {
    for reference in event.references() {
        let entity_type = reference.collection();
        let Some(id) = reference.id() else {
            return Err(ReferenceError::Unidentified {
                entity_type,
                name: reference.name().to_string(),
            });
        };
        if store.resolve_reference(entity_type, id)?.is_none() {
            return Err(ReferenceError::Dangling {
                entity_type,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
