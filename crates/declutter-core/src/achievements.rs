//! Achievements
//!
//! Milestones for the number of items a user has sorted. Unlocks are
//! persisted locally and each achievement unlocks at most once.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::storage::{load_json, save_json, KeyValueStore};

pub const ACHIEVEMENTS_STORAGE_KEY: &str = "superswiper-achievements";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Milestone,
    Streak,
    Special,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub threshold: u32,
    pub category: AchievementCategory,
}

const fn milestone(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    threshold: u32,
) -> Achievement {
    Achievement {
        id,
        name,
        description,
        icon,
        threshold,
        category: AchievementCategory::Milestone,
    }
}

/// Catalog, ordered by threshold
pub const ACHIEVEMENTS: [Achievement; 9] = [
    milestone("first-step", "First Step", "Sort your first item", "👣", 1),
    milestone("getting-started", "Getting Started", "Sort 5 items", "🌱", 5),
    milestone("making-progress", "Making Progress", "Sort 10 items", "📈", 10),
    milestone("declutter-rookie", "Declutter Rookie", "Sort 25 items", "🧹", 25),
    milestone("half-century", "Half Century", "Sort 50 items", "🎯", 50),
    milestone("century-club", "Century Club", "Sort 100 items", "💯", 100),
    milestone("declutter-pro", "Declutter Pro", "Sort 250 items", "⭐", 250),
    milestone("master-organizer", "Master Organizer", "Sort 500 items", "🏆", 500),
    milestone("legendary", "Legendary", "Sort 1000 items", "👑", 1000),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockedAchievement {
    pub id: String,
    pub unlocked_at: i64,
}

/// Catalog entry joined with its unlock state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementStatus {
    pub achievement: Achievement,
    pub unlocked_at: Option<i64>,
}

impl AchievementStatus {
    pub fn unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Achievements {
    unlocked: Vec<UnlockedAchievement>,
    newly_unlocked: Option<Achievement>,
}

impl Achievements {
    pub fn new(unlocked: Vec<UnlockedAchievement>) -> Self {
        Self {
            unlocked,
            newly_unlocked: None,
        }
    }

    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self::new(load_json(store, ACHIEVEMENTS_STORAGE_KEY))
    }

    pub fn save(&self, store: &dyn KeyValueStore) {
        save_json(store, ACHIEVEMENTS_STORAGE_KEY, &self.unlocked);
    }

    fn unlocked_ids(&self) -> HashSet<&str> {
        self.unlocked.iter().map(|a| a.id.as_str()).collect()
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.iter().any(|a| a.id == id)
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    pub fn total_count(&self) -> usize {
        ACHIEVEMENTS.len()
    }

    /// The most significant achievement of the last unlock batch
    pub fn newly_unlocked(&self) -> Option<Achievement> {
        self.newly_unlocked
    }

    pub fn clear_newly_unlocked(&mut self) {
        self.newly_unlocked = None;
    }

    pub fn with_status(&self) -> Vec<AchievementStatus> {
        ACHIEVEMENTS
            .iter()
            .map(|a| AchievementStatus {
                achievement: *a,
                unlocked_at: self
                    .unlocked
                    .iter()
                    .find(|u| u.id == a.id)
                    .map(|u| u.unlocked_at),
            })
            .collect()
    }

    pub fn next_achievement(&self) -> Option<Achievement> {
        let ids = self.unlocked_ids();
        ACHIEVEMENTS.iter().find(|a| !ids.contains(a.id)).copied()
    }

    /// Percent of the way from the previous unlocked threshold to the next one
    pub fn progress_to_next(&self, items_sorted: u32) -> f64 {
        let Some(next) = self.next_achievement() else {
            return 100.0;
        };
        let ids = self.unlocked_ids();
        let previous = ACHIEVEMENTS
            .iter()
            .filter(|a| a.threshold < next.threshold && ids.contains(a.id))
            .map(|a| a.threshold)
            .max()
            .unwrap_or(0);

        let span = (next.threshold - previous) as f64;
        let progress = (items_sorted as f64 - previous as f64) / span * 100.0;
        progress.clamp(0.0, 100.0)
    }

    /// Unlock every reached achievement not unlocked yet.
    /// Returns the new unlocks in catalog order.
    pub fn check_and_unlock(&mut self, items_sorted: u32) -> Vec<Achievement> {
        self.check_and_unlock_at(items_sorted, chrono::Utc::now().timestamp_millis())
    }

    pub fn check_and_unlock_at(&mut self, items_sorted: u32, now: i64) -> Vec<Achievement> {
        let fresh: Vec<Achievement> = ACHIEVEMENTS
            .iter()
            .filter(|a| items_sorted >= a.threshold && !self.is_unlocked(a.id))
            .copied()
            .collect();

        for achievement in &fresh {
            self.unlocked.push(UnlockedAchievement {
                id: achievement.id.to_string(),
                unlocked_at: now,
            });
        }
        if let Some(top) = fresh.last() {
            info!(achievement = top.id, items_sorted, "achievement unlocked");
            self.newly_unlocked = Some(*top);
        }
        fresh
    }
}

/// Toast text for an unlock
pub fn unlock_message(achievement: &Achievement) -> String {
    format!("{} Achievement unlocked: {}!", achievement.icon, achievement.name)
}
