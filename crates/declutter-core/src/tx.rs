//! Transactions and Queries
//!
//! Typed descriptions of backend writes and reads. They serialize to the
//! shapes the JS bridge forwards to the hosted database unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{DomainError, DomainResult};
use crate::models::{Item, StorageBox, UserStats};

/// Namespaces in the backend schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Entity {
    #[serde(rename = "items")]
    Items,
    #[serde(rename = "boxes")]
    Boxes,
    #[serde(rename = "$users")]
    Users,
    #[serde(rename = "$files")]
    Files,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Items => "items",
            Entity::Boxes => "boxes",
            Entity::Users => "$users",
            Entity::Files => "$files",
        }
    }
}

/// One write in a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum TxOp {
    /// Set top-level attributes, creating the entity when missing
    Update { entity: Entity, id: String, fields: Map<String, Value> },
    /// Deep-merge nested attributes
    Merge { entity: Entity, id: String, fields: Map<String, Value> },
    /// Link labels to target ids
    Link { entity: Entity, id: String, links: Map<String, Value> },
    Unlink { entity: Entity, id: String, links: Map<String, Value> },
}

impl TxOp {
    pub fn update(entity: Entity, id: &str, fields: Value) -> Self {
        TxOp::Update { entity, id: id.to_string(), fields: into_map(fields) }
    }

    pub fn merge(entity: Entity, id: &str, fields: Value) -> Self {
        TxOp::Merge { entity, id: id.to_string(), fields: into_map(fields) }
    }

    pub fn link(entity: Entity, id: &str, label: &str, target: &str) -> Self {
        let mut links = Map::new();
        links.insert(label.to_string(), Value::String(target.to_string()));
        TxOp::Link { entity, id: id.to_string(), links }
    }

    pub fn unlink(entity: Entity, id: &str, label: &str, target: &str) -> Self {
        let mut links = Map::new();
        links.insert(label.to_string(), Value::String(target.to_string()));
        TxOp::Unlink { entity, id: id.to_string(), links }
    }

    pub fn entity(&self) -> Entity {
        match self {
            TxOp::Update { entity, .. }
            | TxOp::Merge { entity, .. }
            | TxOp::Link { entity, .. }
            | TxOp::Unlink { entity, .. } => *entity,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            TxOp::Update { id, .. } | TxOp::Merge { id, .. } | TxOp::Link { id, .. } | TxOp::Unlink { id, .. } => id,
        }
    }
}

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

// ========================
// Queries
// ========================

/// Reads the app performs, once or as live subscriptions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// The user record holding `itemsSorted`
    User { id: String },
    /// Items owned by a user with their box, newest first
    Items { owner: String },
    /// Boxes owned by a user with linked item ids, newest first
    Boxes { owner: String },
    /// A stored file and its download url
    File { id: String },
}

impl Query {
    pub fn to_json(&self) -> Value {
        match self {
            Query::User { id } => json!({
                "$users": { "$": { "where": { "id": id } } }
            }),
            Query::Items { owner } => json!({
                "items": {
                    "$": { "where": { "owner.id": owner }, "order": { "serverCreatedAt": "desc" } },
                    "box": {}
                }
            }),
            Query::Boxes { owner } => json!({
                "boxes": {
                    "$": { "where": { "owner.id": owner }, "order": { "serverCreatedAt": "desc" } },
                    "items": {}
                }
            }),
            Query::File { id } => json!({
                "$files": { "$": { "where": { "id": id } } }
            }),
        }
    }
}

fn rows(data: &Value, key: &str) -> Vec<Value> {
    data.get(key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn parse_rows<T: serde::de::DeserializeOwned>(data: &Value, key: &str) -> DomainResult<Vec<T>> {
    rows(data, key)
        .into_iter()
        .map(|row| serde_json::from_value(row).map_err(DomainError::from))
        .collect()
}

pub fn parse_items(data: &Value) -> DomainResult<Vec<Item>> {
    parse_rows(data, "items")
}

pub fn parse_boxes(data: &Value) -> DomainResult<Vec<StorageBox>> {
    parse_rows(data, "boxes")
}

/// A missing user record or counter reads as zero
pub fn parse_user_stats(data: &Value) -> UserStats {
    let items_sorted = rows(data, "$users")
        .first()
        .and_then(|u| u.get("itemsSorted"))
        .and_then(Value::as_u64)
        .unwrap_or(0);
    UserStats {
        items_sorted: u32::try_from(items_sorted).unwrap_or(u32::MAX),
    }
}

pub fn parse_file_url(data: &Value) -> Option<String> {
    rows(data, "$files")
        .first()
        .and_then(|f| f.get("url"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_serializes_for_bridge() {
        let op = TxOp::update(Entity::Items, "i1", json!({ "status": "kept" }));
        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(
            value,
            json!({ "op": "update", "entity": "items", "id": "i1", "fields": { "status": "kept" } })
        );

        let link = serde_json::to_value(TxOp::link(Entity::Items, "i1", "box", "b1")).unwrap();
        assert_eq!(link["op"], "link");
        assert_eq!(link["links"]["box"], "b1");
    }

    #[test]
    fn test_users_entity_name() {
        let op = TxOp::update(Entity::Users, "u1", json!({ "itemsSorted": 3 }));
        assert_eq!(serde_json::to_value(&op).unwrap()["entity"], "$users");
        assert_eq!(op.entity().as_str(), "$users");
        assert_eq!(op.id(), "u1");
    }

    #[test]
    fn test_query_shapes() {
        let q = Query::Items { owner: "u1".into() }.to_json();
        assert_eq!(q["items"]["$"]["where"]["owner.id"], "u1");
        assert!(q["items"]["box"].is_object());

        let q = Query::User { id: "u1".into() }.to_json();
        assert_eq!(q["$users"]["$"]["where"]["id"], "u1");
    }

    #[test]
    fn test_parse_user_stats_defaults_to_zero() {
        assert_eq!(parse_user_stats(&json!({ "$users": [] })).items_sorted, 0);
        assert_eq!(parse_user_stats(&json!({ "$users": [{ "id": "u1" }] })).items_sorted, 0);
        assert_eq!(parse_user_stats(&json!({ "$users": [{ "itemsSorted": 7 }] })).items_sorted, 7);
    }

    #[test]
    fn test_parse_items_and_file_url() {
        let data = json!({
            "items": [{ "id": "i1", "name": "Lamp", "photoPath": "f1", "status": "unsorted", "createdAt": 1 }]
        });
        let items = parse_items(&data).unwrap();
        assert_eq!(items[0].name, "Lamp");
        assert!(parse_items(&json!({ "items": [{ "id": 1 }] })).is_err());

        assert_eq!(parse_file_url(&json!({ "$files": [{ "url": "https://x/y.jpg" }] })).as_deref(), Some("https://x/y.jpg"));
        assert_eq!(parse_file_url(&json!({ "$files": [] })), None);
    }
}
