//! Undo History
//!
//! Bounded LIFO of sort actions. Pushing beyond the bound evicts the
//! oldest entry; popping returns the newest.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::models::ItemStatus;

/// Maximum number of sort actions kept for undo
pub const MAX_HISTORY: usize = 10;

/// A sort as it is about to be recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortRecord {
    pub item_id: String,
    pub item_name: String,
    pub previous_status: ItemStatus,
    pub previous_box_id: Option<String>,
    pub new_status: ItemStatus,
    pub new_box_id: Option<String>,
    /// Session streak before the sort was counted
    pub streak_before: u32,
}

/// A recorded, reversible sort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoAction {
    #[serde(flatten)]
    pub record: SortRecord,
    /// Milliseconds since the epoch
    pub timestamp: i64,
}

impl UndoAction {
    pub fn item_id(&self) -> &str {
        &self.record.item_id
    }

    pub fn item_name(&self) -> &str {
        &self.record.item_name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoHistory {
    stack: VecDeque<UndoAction>,
}

impl UndoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a sort, stamping it with the current time
    pub fn record_sort(&mut self, record: SortRecord) {
        self.record_sort_at(record, chrono::Utc::now().timestamp_millis());
    }

    pub fn record_sort_at(&mut self, record: SortRecord, timestamp: i64) {
        self.stack.push_back(UndoAction { record, timestamp });
        if self.stack.len() > MAX_HISTORY {
            self.stack.pop_front();
        }
    }

    pub fn pop_undo(&mut self) -> Option<UndoAction> {
        self.stack.pop_back()
    }

    pub fn last_action(&self) -> Option<&UndoAction> {
        self.stack.back()
    }

    pub fn can_undo(&self) -> bool {
        !self.stack.is_empty()
    }

    pub fn clear_history(&mut self) {
        self.stack.clear();
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &UndoAction> {
        self.stack.iter()
    }
}
