//! Backend Access
//!
//! The hosted database is reached through [`Backend`]. The browser build
//! talks to the JS bridge; [`MemoryBackend`] applies the same transactions
//! to in-process maps.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::error::{DomainError, DomainResult};
use crate::tx::{Entity, Query, TxOp};
use crate::upload::FileStore;

/// Transactions and one-shot reads against the hosted database
#[async_trait(?Send)]
pub trait Backend {
    async fn transact(&self, ops: Vec<TxOp>) -> DomainResult<()>;

    /// Raw response data, keyed by namespace
    async fn query_once(&self, query: &Query) -> DomainResult<Value>;
}

// ========================
// In-memory backend
// ========================

type Key = (Entity, String);

#[derive(Debug, Clone, PartialEq, Eq)]
struct LinkRow {
    entity: Entity,
    id: String,
    label: String,
    target: String,
}

/// Backend held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: RefCell<BTreeMap<Key, Map<String, Value>>>,
    links: RefCell<Vec<LinkRow>>,
    log: RefCell<Vec<Vec<TxOp>>>,
    files: RefCell<BTreeMap<String, Vec<u8>>>,
    fail_next: RefCell<Option<String>>,
    next_file: Cell<u64>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user record
    pub fn with_user(self, id: &str, items_sorted: u32) -> Self {
        self.records
            .borrow_mut()
            .insert((Entity::Users, id.to_string()), into_fields(json!({ "itemsSorted": items_sorted })));
        self
    }

    /// Make the next transaction or upload fail with `message`
    pub fn fail_next(&self, message: &str) {
        *self.fail_next.borrow_mut() = Some(message.to_string());
    }

    /// Every committed transaction, oldest first
    pub fn transactions(&self) -> Vec<Vec<TxOp>> {
        self.log.borrow().clone()
    }

    pub fn record(&self, entity: Entity, id: &str) -> Option<Map<String, Value>> {
        self.records.borrow().get(&(entity, id.to_string())).cloned()
    }

    /// Target of a has-one link
    pub fn linked(&self, entity: Entity, id: &str, label: &str) -> Option<String> {
        self.links
            .borrow()
            .iter()
            .find(|l| l.entity == entity && l.id == id && l.label == label)
            .map(|l| l.target.clone())
    }

    fn take_failure(&self) -> DomainResult<()> {
        match self.fail_next.borrow_mut().take() {
            Some(message) => Err(DomainError::Backend(message)),
            None => Ok(()),
        }
    }

    fn apply(&self, op: TxOp) {
        match op {
            TxOp::Update { entity, id, fields } => {
                let mut records = self.records.borrow_mut();
                let record = records.entry((entity, id)).or_default();
                for (k, v) in fields {
                    record.insert(k, v);
                }
            }
            TxOp::Merge { entity, id, fields } => {
                let mut records = self.records.borrow_mut();
                let record = records.entry((entity, id)).or_default();
                deep_merge(record, fields);
            }
            TxOp::Link { entity, id, links } => {
                let mut rows = self.links.borrow_mut();
                for (label, target) in links {
                    let Some(target) = target.as_str() else { continue };
                    // Every label in this schema is has-one on the forward side
                    rows.retain(|l| !(l.entity == entity && l.id == id && l.label == label));
                    rows.push(LinkRow {
                        entity,
                        id: id.clone(),
                        label,
                        target: target.to_string(),
                    });
                }
            }
            TxOp::Unlink { entity, id, links } => {
                let mut rows = self.links.borrow_mut();
                for (label, target) in links {
                    let target = target.as_str().unwrap_or_default();
                    rows.retain(|l| {
                        !(l.entity == entity && l.id == id && l.label == label && (target.is_empty() || l.target == target))
                    });
                }
            }
        }
    }

    fn row(&self, entity: Entity, id: &str) -> Value {
        let mut fields = self.record(entity, id).unwrap_or_default();
        fields.insert("id".to_string(), Value::String(id.to_string()));
        Value::Object(fields)
    }

    fn owned_by(&self, entity: Entity, owner: &str) -> Vec<String> {
        let links = self.links.borrow();
        let mut ids: Vec<String> = links
            .iter()
            .filter(|l| l.entity == entity && l.label == "owner" && l.target == owner)
            .map(|l| l.id.clone())
            .collect();
        let created = |id: &String| {
            self.record(entity, id)
                .and_then(|r| r.get("createdAt").and_then(Value::as_i64))
                .unwrap_or(0)
        };
        ids.sort_by_key(|id| std::cmp::Reverse(created(id)));
        ids
    }
}

fn into_fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn deep_merge(target: &mut Map<String, Value>, fields: Map<String, Value>) {
    for (k, v) in fields {
        match (target.get_mut(&k), v) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => deep_merge(existing, incoming),
            (_, v) => {
                target.insert(k, v);
            }
        }
    }
}

#[async_trait(?Send)]
impl Backend for MemoryBackend {
    async fn transact(&self, ops: Vec<TxOp>) -> DomainResult<()> {
        self.take_failure()?;
        self.log.borrow_mut().push(ops.clone());
        for op in ops {
            self.apply(op);
        }
        Ok(())
    }

    async fn query_once(&self, query: &Query) -> DomainResult<Value> {
        let data = match query {
            Query::User { id } => {
                let rows: Vec<Value> = self.record(Entity::Users, id).map(|_| self.row(Entity::Users, id)).into_iter().collect();
                json!({ "$users": rows })
            }
            Query::Items { owner } => {
                let rows: Vec<Value> = self
                    .owned_by(Entity::Items, owner)
                    .iter()
                    .map(|id| {
                        let mut row = self.row(Entity::Items, id);
                        if let Some(box_id) = self.linked(Entity::Items, id, "box") {
                            row["box"] = self.row(Entity::Boxes, &box_id);
                        }
                        row
                    })
                    .collect();
                json!({ "items": rows })
            }
            Query::Boxes { owner } => {
                let rows: Vec<Value> = self
                    .owned_by(Entity::Boxes, owner)
                    .iter()
                    .map(|id| {
                        let items: Vec<Value> = self
                            .links
                            .borrow()
                            .iter()
                            .filter(|l| l.entity == Entity::Items && l.label == "box" && l.target == *id)
                            .map(|l| json!({ "id": l.id }))
                            .collect();
                        let mut row = self.row(Entity::Boxes, id);
                        row["items"] = Value::Array(items);
                        row
                    })
                    .collect();
                json!({ "boxes": rows })
            }
            Query::File { id } => {
                let rows: Vec<Value> = if self.files.borrow().contains_key(id) {
                    vec![json!({ "id": id, "url": format!("memory://{}", id) })]
                } else {
                    Vec::new()
                };
                json!({ "$files": rows })
            }
        };
        Ok(data)
    }
}

#[async_trait(?Send)]
impl FileStore for MemoryBackend {
    async fn upload_file(&self, name: &str, bytes: Vec<u8>) -> DomainResult<String> {
        self.take_failure()?;
        let n = self.next_file.get() + 1;
        self.next_file.set(n);
        let id = format!("file-{}-{}", n, name);
        self.files.borrow_mut().insert(id.clone(), bytes);
        Ok(id)
    }
}
