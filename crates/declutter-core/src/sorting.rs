//! Sorting Service
//!
//! Item and box writes for the signed-in user. Every keep or discard also
//! bumps the user's `itemsSorted` counter.

use rand::Rng;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::backend::Backend;
use crate::error::{DomainError, DomainResult};
use crate::models::{DiscardCategory, ItemStatus, GRADIENT_COUNT};
use crate::tx::{parse_file_url, parse_user_stats, Entity, Query, TxOp};
use crate::undo::UndoAction;

/// Where an already sorted item can be moved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Box(String),
    Discard(DiscardCategory),
}

pub struct SortService<'a, B: Backend + ?Sized> {
    backend: &'a B,
    user_id: Option<String>,
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn require_name(name: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidInput("name cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

impl<'a, B: Backend + ?Sized> SortService<'a, B> {
    pub fn new(backend: &'a B, user_id: Option<String>) -> Self {
        Self { backend, user_id }
    }

    fn user_id(&self) -> DomainResult<&str> {
        self.user_id.as_deref().ok_or(DomainError::Unauthenticated)
    }

    /// Create an unsorted item for an uploaded photo. Returns the item id.
    pub async fn create_item(&self, photo_path: &str, name: &str) -> DomainResult<String> {
        let user_id = self.user_id()?;
        let item_id = new_id();
        self.backend
            .transact(vec![
                TxOp::update(
                    Entity::Items,
                    &item_id,
                    json!({
                        "name": name,
                        "photoPath": photo_path,
                        "status": ItemStatus::Unsorted.as_str(),
                        "createdAt": now_millis(),
                    }),
                ),
                TxOp::link(Entity::Items, &item_id, "owner", user_id),
            ])
            .await?;
        debug!(item = %item_id, "item created");
        Ok(item_id)
    }

    /// Keep an item in a box. Returns the user's new sorted count.
    pub async fn keep_item(&self, item_id: &str, box_id: &str) -> DomainResult<u32> {
        let user_id = self.user_id()?;
        self.backend
            .transact(vec![
                TxOp::update(
                    Entity::Items,
                    item_id,
                    json!({ "status": ItemStatus::Kept.as_str(), "sortedAt": now_millis() }),
                ),
                TxOp::link(Entity::Items, item_id, "box", box_id),
            ])
            .await?;
        info!(item = %item_id, box_id = %box_id, "item kept");
        self.increment_items_sorted(user_id).await
    }

    /// Discard an item to a pile. Returns the user's new sorted count.
    pub async fn discard_item(&self, item_id: &str, category: DiscardCategory) -> DomainResult<u32> {
        let user_id = self.user_id()?;
        self.backend
            .transact(vec![TxOp::update(
                Entity::Items,
                item_id,
                json!({ "status": category.status().as_str(), "sortedAt": now_millis() }),
            )])
            .await?;
        info!(item = %item_id, pile = category.label(), "item discarded");
        self.increment_items_sorted(user_id).await
    }

    /// Read the counter and write it back plus one.
    ///
    /// Two sessions sorting at the same moment can lose an increment.
    async fn increment_items_sorted(&self, user_id: &str) -> DomainResult<u32> {
        let data = self.backend.query_once(&Query::User { id: user_id.to_string() }).await?;
        let next = parse_user_stats(&data).items_sorted.saturating_add(1);
        self.backend
            .transact(vec![TxOp::update(Entity::Users, user_id, json!({ "itemsSorted": next }))])
            .await?;
        Ok(next)
    }

    pub async fn rename_item(&self, item_id: &str, name: &str) -> DomainResult<()> {
        self.user_id()?;
        let name = require_name(name)?;
        self.backend
            .transact(vec![TxOp::update(Entity::Items, item_id, json!({ "name": name }))])
            .await
    }

    /// Move a sorted item to another box or pile. The sorted count is unchanged.
    pub async fn move_item(&self, item_id: &str, from_box: Option<&str>, to: &Destination) -> DomainResult<()> {
        self.user_id()?;
        let ops = match to {
            Destination::Box(box_id) => vec![
                TxOp::update(Entity::Items, item_id, json!({ "status": ItemStatus::Kept.as_str() })),
                TxOp::link(Entity::Items, item_id, "box", box_id),
            ],
            Destination::Discard(category) => {
                let mut ops = vec![TxOp::update(
                    Entity::Items,
                    item_id,
                    json!({ "status": category.status().as_str() }),
                )];
                if let Some(box_id) = from_box {
                    ops.push(TxOp::unlink(Entity::Items, item_id, "box", box_id));
                }
                ops
            }
        };
        self.backend.transact(ops).await
    }

    /// Create a box with a random gradient. Returns the box id.
    pub async fn create_box(&self, name: &str) -> DomainResult<String> {
        let user_id = self.user_id()?;
        let name = require_name(name)?;
        let box_id = new_id();
        let gradient = rand::thread_rng().gen_range(0..GRADIENT_COUNT);
        self.backend
            .transact(vec![
                TxOp::update(
                    Entity::Boxes,
                    &box_id,
                    json!({ "name": name, "gradient": gradient, "createdAt": now_millis() }),
                ),
                TxOp::link(Entity::Boxes, &box_id, "owner", user_id),
            ])
            .await?;
        info!(box_id = %box_id, gradient, "box created");
        Ok(box_id)
    }

    /// Put an item back the way it was before `action`
    pub async fn undo_sort(&self, action: &UndoAction) -> DomainResult<()> {
        self.user_id()?;
        let record = &action.record;
        let sorted_at = if record.previous_status.is_sorted() {
            json!(now_millis())
        } else {
            Value::Null
        };
        let mut ops = vec![TxOp::update(
            Entity::Items,
            &record.item_id,
            json!({ "status": record.previous_status.as_str(), "sortedAt": sorted_at }),
        )];
        match (&record.previous_box_id, &record.new_box_id) {
            (Some(previous), _) => ops.push(TxOp::link(Entity::Items, &record.item_id, "box", previous)),
            (None, Some(new)) => ops.push(TxOp::unlink(Entity::Items, &record.item_id, "box", new)),
            (None, None) => {}
        }
        self.backend.transact(ops).await?;
        info!(item = %record.item_id, status = record.previous_status.as_str(), "sort undone");
        Ok(())
    }

    /// Download url of a stored photo, `None` when it does not exist
    pub async fn photo_url(&self, file_id: &str) -> DomainResult<Option<String>> {
        let data = self.backend.query_once(&Query::File { id: file_id.to_string() }).await?;
        Ok(parse_file_url(&data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::undo::SortRecord;

    fn service(backend: &MemoryBackend) -> SortService<'_, MemoryBackend> {
        SortService::new(backend, Some("u1".to_string()))
    }

    fn items_sorted(backend: &MemoryBackend) -> u64 {
        backend
            .record(Entity::Users, "u1")
            .and_then(|r| r.get("itemsSorted").and_then(Value::as_u64))
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn test_create_item_is_unsorted_and_owned() {
        let backend = MemoryBackend::new();
        let id = service(&backend).create_item("file-1", "Item").await.unwrap();

        let record = backend.record(Entity::Items, &id).unwrap();
        assert_eq!(record["status"], "unsorted");
        assert_eq!(record["photoPath"], "file-1");
        assert_eq!(backend.linked(Entity::Items, &id, "owner").as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn test_keep_links_box_and_counts() {
        let backend = MemoryBackend::new().with_user("u1", 4);
        let svc = service(&backend);
        let item = svc.create_item("f", "Lamp").await.unwrap();

        let count = svc.keep_item(&item, "b1").await.unwrap();
        assert_eq!(count, 5);
        assert_eq!(items_sorted(&backend), 5);

        let record = backend.record(Entity::Items, &item).unwrap();
        assert_eq!(record["status"], "kept");
        assert!(record["sortedAt"].is_i64());
        assert_eq!(backend.linked(Entity::Items, &item, "box").as_deref(), Some("b1"));
    }

    #[tokio::test]
    async fn test_discard_counts_from_missing_user_record() {
        let backend = MemoryBackend::new();
        let svc = service(&backend);
        let item = svc.create_item("f", "Old shoes").await.unwrap();

        assert_eq!(svc.discard_item(&item, DiscardCategory::Donate).await.unwrap(), 1);
        assert_eq!(backend.record(Entity::Items, &item).unwrap()["status"], "donate");
    }

    #[tokio::test]
    async fn test_requires_user() {
        let backend = MemoryBackend::new();
        let svc = SortService::new(&backend, None);

        assert_eq!(svc.create_item("f", "x").await.unwrap_err(), DomainError::Unauthenticated);
        assert_eq!(svc.keep_item("i", "b").await.unwrap_err(), DomainError::Unauthenticated);
        assert_eq!(svc.create_box("Books").await.unwrap_err(), DomainError::Unauthenticated);
        assert!(backend.transactions().is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_does_not_count() {
        let backend = MemoryBackend::new().with_user("u1", 2);
        backend.fail_next("Network error");

        let err = service(&backend).discard_item("i1", DiscardCategory::Trash).await.unwrap_err();
        assert_eq!(err.user_message(), "Network error");
        assert_eq!(items_sorted(&backend), 2);
    }

    #[tokio::test]
    async fn test_create_box_gradient_in_range() {
        let backend = MemoryBackend::new();
        let svc = service(&backend);
        for _ in 0..20 {
            let id = svc.create_box("  Kitchen ").await.unwrap();
            let record = backend.record(Entity::Boxes, &id).unwrap();
            assert_eq!(record["name"], "Kitchen");
            assert!(record["gradient"].as_u64().unwrap() < GRADIENT_COUNT as u64);
        }
        assert!(matches!(svc.create_box("   ").await, Err(DomainError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_move_and_rename() {
        let backend = MemoryBackend::new();
        let svc = service(&backend);
        let item = svc.create_item("f", "Vase").await.unwrap();
        svc.keep_item(&item, "b1").await.unwrap();

        svc.move_item(&item, Some("b1"), &Destination::Box("b2".into())).await.unwrap();
        assert_eq!(backend.linked(Entity::Items, &item, "box").as_deref(), Some("b2"));

        svc.move_item(&item, Some("b2"), &Destination::Discard(DiscardCategory::Sell)).await.unwrap();
        assert_eq!(backend.linked(Entity::Items, &item, "box"), None);
        assert_eq!(backend.record(Entity::Items, &item).unwrap()["status"], "sell");
        assert_eq!(items_sorted(&backend), 1);

        svc.rename_item(&item, "Blue vase").await.unwrap();
        assert_eq!(backend.record(Entity::Items, &item).unwrap()["name"], "Blue vase");
    }

    #[tokio::test]
    async fn test_undo_restores_unsorted() {
        let backend = MemoryBackend::new();
        let svc = service(&backend);
        let item = svc.create_item("f", "Mug").await.unwrap();
        svc.keep_item(&item, "b1").await.unwrap();

        let action = UndoAction {
            record: SortRecord {
                item_id: item.clone(),
                item_name: "Mug".into(),
                previous_status: ItemStatus::Unsorted,
                previous_box_id: None,
                new_status: ItemStatus::Kept,
                new_box_id: Some("b1".into()),
                streak_before: 0,
            },
            timestamp: 0,
        };
        svc.undo_sort(&action).await.unwrap();

        let record = backend.record(Entity::Items, &item).unwrap();
        assert_eq!(record["status"], "unsorted");
        assert!(record["sortedAt"].is_null());
        assert_eq!(backend.linked(Entity::Items, &item, "box"), None);
    }

    #[tokio::test]
    async fn test_photo_url() {
        use crate::upload::FileStore;

        let backend = MemoryBackend::new();
        let file_id = backend.upload_file("x.jpg", vec![0]).await.unwrap();
        let svc = service(&backend);
        assert!(svc.photo_url(&file_id).await.unwrap().is_some());
        assert_eq!(svc.photo_url("missing").await.unwrap(), None);
    }
}
