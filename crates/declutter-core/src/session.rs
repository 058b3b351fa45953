//! Sorting Session
//!
//! Bookkeeping around every swipe: undo history, session streak, XP and
//! achievements, plus the toasts they raise. One instance lives for the
//! whole app and is shared by every screen.

use tracing::{debug, info};

use crate::achievements::{unlock_message, Achievement, Achievements};
use crate::error::DomainError;
use crate::models::ItemStatus;
use crate::storage::KeyValueStore;
use crate::streak::Streak;
use crate::toast::Toasts;
use crate::undo::{SortRecord, UndoAction, UndoHistory};
use crate::xp::{XpAction, XpState, XpTracker};

/// Celebrations raised by one sort
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOutcome {
    pub xp_earned: u32,
    /// The streak just reached the confetti threshold
    pub confetti: bool,
    /// XP crossed a milestone
    pub milestone: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub streak: Streak,
    pub xp: XpTracker,
    pub undo: UndoHistory,
    pub achievements: Achievements,
    pub toasts: Toasts,
}

impl Session {
    /// Restore persisted XP and achievements; streak and undo start empty
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self {
            xp: XpTracker::new(XpState::load(store)),
            achievements: Achievements::load(store),
            ..Self::default()
        }
    }

    /// Count a sort that the backend accepted.
    ///
    /// `record.streak_before` is overwritten with the current streak.
    pub fn record_sort(&mut self, mut record: SortRecord, store: &dyn KeyValueStore) -> SortOutcome {
        record.streak_before = self.streak.count();
        let action = if record.new_status == ItemStatus::Kept {
            XpAction::Keep
        } else {
            XpAction::Discard
        };
        debug!(item = %record.item_id, status = record.new_status.as_str(), "sort recorded");
        self.undo.record_sort(record);

        let confetti = self.streak.increment_streak();
        let xp_earned = self.xp.add_xp(action);
        self.xp.state().save(store);

        SortOutcome {
            xp_earned,
            confetti,
            milestone: self.xp.should_trigger_milestone(),
        }
    }

    /// Feed the user's new sorted count; toasts the most significant unlock
    pub fn items_sorted_changed(&mut self, items_sorted: u32, store: &dyn KeyValueStore) -> Vec<Achievement> {
        let fresh = self.achievements.check_and_unlock(items_sorted);
        if !fresh.is_empty() {
            self.achievements.save(store);
            if let Some(top) = self.achievements.newly_unlocked() {
                self.toasts.success(unlock_message(&top));
            }
        }
        fresh
    }

    /// Take the newest action for reverting. Call [`Session::confirm_undo`]
    /// or [`Session::undo_failed`] once the backend answered.
    pub fn begin_undo(&mut self) -> Option<UndoAction> {
        self.undo.pop_undo()
    }

    /// The revert went through: the streak goes back, no XP is granted
    pub fn confirm_undo(&mut self, action: &UndoAction) {
        self.streak.set_streak(i64::from(action.record.streak_before));
        self.xp.add_xp(XpAction::Undo);
        info!(item = %action.item_id(), "undo confirmed");
        self.toasts.info(format!("Undid sorting \"{}\"", action.item_name()));
    }

    /// The revert was rejected: the action goes back on the stack
    pub fn undo_failed(&mut self, action: UndoAction, err: &DomainError) {
        self.toasts.error(format!("Could not undo: {}", err.user_message()));
        self.undo.record_sort_at(action.record, action.timestamp);
    }

    /// Sign-out: drop everything scoped to the session
    pub fn end(&mut self) {
        self.streak.reset_session_streak();
        self.streak.clear_confetti_trigger();
        self.undo.clear_history();
    }
}
