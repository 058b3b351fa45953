//! Experience Points
//!
//! Every keep or discard earns a fixed amount. Crossing a multiple of the
//! milestone interval raises a one-shot flag. The total and history are
//! persisted to local storage.

use serde::{Deserialize, Serialize};

use crate::storage::{load_json, save_json, KeyValueStore};

pub const XP_STORAGE_KEY: &str = "superswiper-xp";
pub const XP_PER_ACTION: u32 = 5;
pub const XP_MILESTONE_INTERVAL: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XpAction {
    Keep,
    Discard,
    /// Never earns XP
    Undo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpHistoryEntry {
    pub amount: u32,
    pub action: XpAction,
    pub timestamp: i64,
}

/// Persisted XP state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XpState {
    pub total: u32,
    pub history: Vec<XpHistoryEntry>,
}

impl XpState {
    /// Load from storage; corrupt data starts fresh
    pub fn load(store: &dyn KeyValueStore) -> Self {
        load_json(store, XP_STORAGE_KEY)
    }

    pub fn save(&self, store: &dyn KeyValueStore) {
        save_json(store, XP_STORAGE_KEY, self);
    }
}

/// The most recent award, for the floating "+5" indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EarnedXp {
    pub amount: u32,
    pub action: XpAction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XpTracker {
    state: XpState,
    should_trigger_milestone: bool,
    last_earned: Option<EarnedXp>,
}

impl XpTracker {
    pub fn new(state: XpState) -> Self {
        Self {
            state,
            should_trigger_milestone: false,
            last_earned: None,
        }
    }

    pub fn state(&self) -> &XpState {
        &self.state
    }

    pub fn total(&self) -> u32 {
        self.state.total
    }

    pub fn should_trigger_milestone(&self) -> bool {
        self.should_trigger_milestone
    }

    pub fn last_earned(&self) -> Option<EarnedXp> {
        self.last_earned
    }

    /// Award XP for `action`, returning the amount granted
    pub fn add_xp(&mut self, action: XpAction) -> u32 {
        self.add_xp_at(action, chrono::Utc::now().timestamp_millis())
    }

    pub fn add_xp_at(&mut self, action: XpAction, timestamp: i64) -> u32 {
        if action == XpAction::Undo {
            return 0;
        }
        self.award(XP_PER_ACTION, action, timestamp)
    }

    fn award(&mut self, amount: u32, action: XpAction, timestamp: i64) -> u32 {
        let previous = self.state.total;
        self.state.total = previous.saturating_add(amount);
        self.state.history.push(XpHistoryEntry { amount, action, timestamp });
        self.last_earned = Some(EarnedXp { amount, action });

        if self.state.total / XP_MILESTONE_INTERVAL > previous / XP_MILESTONE_INTERVAL {
            self.should_trigger_milestone = true;
        }
        amount
    }

    pub fn clear_milestone_trigger(&mut self) {
        self.should_trigger_milestone = false;
    }

    pub fn clear_last_earned(&mut self) {
        self.last_earned = None;
    }

    /// `950`, `1.2k`
    pub fn formatted_total(&self) -> String {
        format_xp(self.state.total)
    }
}

pub fn format_xp(total: u32) -> String {
    if total >= 1000 {
        format!("{:.1}k", total as f64 / 1000.0)
    } else {
        total.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_keep_and_discard_award_fixed_amount() {
        let mut xp = XpTracker::default();
        assert_eq!(xp.add_xp(XpAction::Keep), XP_PER_ACTION);
        assert_eq!(xp.add_xp(XpAction::Discard), XP_PER_ACTION);
        assert_eq!(xp.total(), 10);
        assert_eq!(xp.state().history.len(), 2);
        assert_eq!(xp.last_earned(), Some(EarnedXp { amount: 5, action: XpAction::Discard }));
    }

    #[test]
    fn test_undo_awards_nothing() {
        let mut xp = XpTracker::default();
        assert_eq!(xp.add_xp(XpAction::Undo), 0);
        assert_eq!(xp.total(), 0);
        assert!(xp.state().history.is_empty());
        assert!(xp.last_earned().is_none());
    }

    #[test]
    fn test_milestone_crossing_fires_once() {
        let mut xp = XpTracker::new(XpState { total: 95, history: vec![] });
        xp.add_xp_at(XpAction::Keep, 1);
        assert_eq!(xp.total(), 100);
        assert!(xp.should_trigger_milestone());

        xp.clear_milestone_trigger();
        xp.add_xp_at(XpAction::Keep, 2);
        assert!(!xp.should_trigger_milestone());
    }

    #[test]
    fn test_jump_over_several_intervals_fires_once() {
        let mut xp = XpTracker::new(XpState { total: 95, history: vec![] });
        xp.award(210, XpAction::Keep, 1);
        assert_eq!(xp.total(), 305);
        assert!(xp.should_trigger_milestone());
        xp.clear_milestone_trigger();
        assert!(!xp.should_trigger_milestone());
    }

    #[test]
    fn test_no_milestone_inside_interval() {
        let mut xp = XpTracker::new(XpState { total: 100, history: vec![] });
        xp.add_xp(XpAction::Keep);
        assert!(!xp.should_trigger_milestone());
    }

    #[test]
    fn test_formatted_total() {
        assert_eq!(format_xp(950), "950");
        assert_eq!(format_xp(1000), "1.0k");
        assert_eq!(format_xp(1240), "1.2k");
    }

    #[test]
    fn test_persists_and_recovers_from_corruption() {
        let store = MemoryStore::new();
        let mut xp = XpTracker::new(XpState::load(&store));
        xp.add_xp_at(XpAction::Keep, 7);
        xp.state().save(&store);

        let loaded = XpState::load(&store);
        assert_eq!(loaded.total, 5);
        assert_eq!(loaded.history[0].timestamp, 7);

        store.set(XP_STORAGE_KEY, "not json");
        assert_eq!(XpState::load(&store), XpState::default());
    }

    #[test]
    fn test_partial_state_fills_defaults() {
        let store = MemoryStore::new();
        store.set(XP_STORAGE_KEY, r#"{"total": 40}"#);
        let loaded = XpState::load(&store);
        assert_eq!(loaded.total, 40);
        assert!(loaded.history.is_empty());
    }
}
