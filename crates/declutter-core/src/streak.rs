//! Session Streak
//!
//! Counts sorts in the current session and raises a one-shot confetti flag
//! when the count reaches the threshold.

/// Streak length that triggers confetti
pub const CONFETTI_THRESHOLD: u32 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Streak {
    count: u32,
    should_trigger_confetti: bool,
}

impl Streak {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn should_trigger_confetti(&self) -> bool {
        self.should_trigger_confetti
    }

    /// Count one more sort. Returns true when this increment raised the flag.
    pub fn increment_streak(&mut self) -> bool {
        self.count = self.count.saturating_add(1);
        if self.count == CONFETTI_THRESHOLD && !self.should_trigger_confetti {
            self.should_trigger_confetti = true;
            return true;
        }
        false
    }

    /// Restore a count, e.g. after undo. Negative values clamp to zero.
    pub fn set_streak(&mut self, n: i64) {
        self.count = n.clamp(0, u32::MAX as i64) as u32;
    }

    pub fn reset_session_streak(&mut self) {
        self.count = 0;
    }

    pub fn clear_confetti_trigger(&mut self) {
        self.should_trigger_confetti = false;
    }

    /// Badge text, empty while nothing is sorted
    pub fn display(&self) -> String {
        if self.count > 0 {
            format!("{} sorted", self.count)
        } else {
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confetti_fires_once_at_threshold() {
        let mut streak = Streak::new();
        let fired: Vec<bool> = (0..5).map(|_| streak.increment_streak()).collect();

        assert_eq!(fired, vec![false, false, false, false, true]);
        assert!(streak.should_trigger_confetti());

        // A sixth increment must not re-raise
        assert!(!streak.increment_streak());
        streak.clear_confetti_trigger();
        assert!(!streak.should_trigger_confetti());
        assert!(!streak.increment_streak());
        assert!(!streak.should_trigger_confetti());
    }

    #[test]
    fn test_threshold_reached_again_after_reset() {
        let mut streak = Streak::new();
        for _ in 0..5 {
            streak.increment_streak();
        }
        streak.clear_confetti_trigger();
        streak.reset_session_streak();
        for _ in 0..5 {
            streak.increment_streak();
        }
        assert!(streak.should_trigger_confetti());
    }

    #[test]
    fn test_set_streak_clamps_to_zero() {
        let mut streak = Streak::new();
        streak.set_streak(-3);
        assert_eq!(streak.count(), 0);
        streak.set_streak(7);
        assert_eq!(streak.count(), 7);
    }

    #[test]
    fn test_display() {
        let mut streak = Streak::new();
        assert_eq!(streak.display(), "");
        streak.increment_streak();
        streak.increment_streak();
        assert_eq!(streak.display(), "2 sorted");
    }
}
