//! Domain Models
//!
//! Entities mirrored from the hosted backend schema.

use serde::{Deserialize, Serialize};

/// Number of card gradients a box can be painted with
pub const GRADIENT_COUNT: u8 = 8;

/// Sorting state of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Photographed but not swiped yet
    #[default]
    Unsorted,
    /// Swiped right and packed into a box
    Kept,
    Trash,
    Donate,
    Sell,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Unsorted => "unsorted",
            ItemStatus::Kept => "kept",
            ItemStatus::Trash => "trash",
            ItemStatus::Donate => "donate",
            ItemStatus::Sell => "sell",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "kept" => ItemStatus::Kept,
            "trash" => ItemStatus::Trash,
            "donate" => ItemStatus::Donate,
            "sell" => ItemStatus::Sell,
            _ => ItemStatus::Unsorted,
        }
    }

    /// Trash, donate and sell are the discard piles
    pub fn is_discarded(&self) -> bool {
        matches!(self, ItemStatus::Trash | ItemStatus::Donate | ItemStatus::Sell)
    }

    pub fn is_sorted(&self) -> bool {
        *self != ItemStatus::Unsorted
    }
}

/// Where a discarded item goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscardCategory {
    Trash,
    Donate,
    Sell,
}

impl DiscardCategory {
    pub const ALL: [DiscardCategory; 3] = [DiscardCategory::Trash, DiscardCategory::Donate, DiscardCategory::Sell];

    pub fn status(&self) -> ItemStatus {
        match self {
            DiscardCategory::Trash => ItemStatus::Trash,
            DiscardCategory::Donate => ItemStatus::Donate,
            DiscardCategory::Sell => ItemStatus::Sell,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DiscardCategory::Trash => "Trash",
            DiscardCategory::Donate => "Donate",
            DiscardCategory::Sell => "Sell",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            DiscardCategory::Trash => "🗑️",
            DiscardCategory::Donate => "🎁",
            DiscardCategory::Sell => "💰",
        }
    }
}

/// Reference to the box an item is linked to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxRef {
    pub id: String,
    pub name: String,
    pub gradient: u8,
}

/// A photographed belonging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    /// Storage file id of the compressed photo
    pub photo_path: String,
    #[serde(default)]
    pub status: ItemStatus,
    pub created_at: i64,
    #[serde(default)]
    pub sorted_at: Option<i64>,
    #[serde(default)]
    pub r#box: Option<BoxRef>,
}

impl Item {
    pub fn box_id(&self) -> Option<&str> {
        self.r#box.as_ref().map(|b| b.id.as_str())
    }
}

/// Linked item ids as returned by box queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedId {
    pub id: String,
}

/// A box kept items are packed into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageBox {
    pub id: String,
    pub name: String,
    pub gradient: u8,
    pub created_at: i64,
    #[serde(default)]
    pub items: Vec<LinkedId>,
}

impl StorageBox {
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// Per-user counters stored on the backend user record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(default)]
    pub items_sorted: u32,
}

/// Signed-in user as reported by the auth bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Boxes ordered by how many items they hold, fullest first
pub fn sorted_boxes(boxes: &[StorageBox]) -> Vec<StorageBox> {
    let mut sorted = boxes.to_vec();
    sorted.sort_by(|a, b| b.item_count().cmp(&a.item_count()));
    sorted
}

pub fn items_with_status(items: &[Item], status: ItemStatus) -> Vec<Item> {
    items.iter().filter(|i| i.status == status).cloned().collect()
}

pub fn items_in_box(items: &[Item], box_id: &str) -> Vec<Item> {
    items.iter().filter(|i| i.box_id() == Some(box_id)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(id: &str, status: ItemStatus) -> Item {
        Item {
            id: id.to_string(),
            name: format!("Item {}", id),
            photo_path: format!("file-{}", id),
            status,
            created_at: 0,
            sorted_at: None,
            r#box: None,
        }
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [ItemStatus::Unsorted, ItemStatus::Kept, ItemStatus::Trash, ItemStatus::Donate, ItemStatus::Sell] {
            assert_eq!(ItemStatus::from_str(status.as_str()), status);
        }
        assert_eq!(ItemStatus::from_str("garbage"), ItemStatus::Unsorted);
    }

    #[test]
    fn test_item_deserializes_backend_shape() {
        let json = r#"{
            "id": "i1", "name": "Lamp", "photoPath": "f1", "status": "kept",
            "createdAt": 10, "box": {"id": "b1", "name": "Living", "gradient": 3}
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.status, ItemStatus::Kept);
        assert_eq!(item.box_id(), Some("b1"));
        assert_eq!(item.sorted_at, None);
    }

    #[test]
    fn test_sorted_boxes_fullest_first() {
        let boxes = vec![
            StorageBox { id: "a".into(), name: "A".into(), gradient: 0, created_at: 0, items: vec![] },
            StorageBox {
                id: "b".into(),
                name: "B".into(),
                gradient: 1,
                created_at: 0,
                items: vec![LinkedId { id: "1".into() }, LinkedId { id: "2".into() }],
            },
        ];
        let sorted = sorted_boxes(&boxes);
        assert_eq!(sorted[0].id, "b");
        assert_eq!(sorted[1].id, "a");
    }

    #[test]
    fn test_filters() {
        let mut kept = make_item("2", ItemStatus::Kept);
        kept.r#box = Some(BoxRef { id: "b1".into(), name: "Box".into(), gradient: 0 });
        let items = vec![make_item("1", ItemStatus::Trash), kept, make_item("3", ItemStatus::Unsorted)];

        assert_eq!(items_with_status(&items, ItemStatus::Trash).len(), 1);
        assert_eq!(items_in_box(&items, "b1")[0].id, "2");
        assert!(ItemStatus::Sell.is_discarded());
        assert!(!ItemStatus::Unsorted.is_sorted());
    }
}
