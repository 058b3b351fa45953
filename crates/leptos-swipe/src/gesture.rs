//! Gesture Tracker
//!
//! Turns raw pointer coordinates into drag updates: offset from the
//! pointer-down position, dragging flag, release marker and the velocity
//! over the trailing `VELOCITY_WINDOW_MS` of samples.

use std::collections::VecDeque;

/// Samples older than this (relative to the newest) do not count toward velocity
pub const VELOCITY_WINDOW_MS: f64 = 100.0;

/// Current offset of the drag. Overwritten on every move.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureSample {
    pub delta_x: f64,
    pub delta_y: f64,
    pub is_dragging: bool,
}

/// Pixels per millisecond
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

/// What the decision engine receives for every pointer event
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureUpdate {
    pub sample: GestureSample,
    /// Pointer released; final update of this drag
    pub last: bool,
    pub velocity: Velocity,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Point {
    x: f64,
    y: f64,
    /// Event timestamp in ms
    t: f64,
}

#[derive(Clone, Debug, Default)]
pub struct GestureTracker {
    start: Option<Point>,
    /// Recent points, oldest first, pruned to the velocity window
    recent: VecDeque<Point>,
    sample: GestureSample,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample(&self) -> GestureSample {
        self.sample
    }

    pub fn is_dragging(&self) -> bool {
        self.sample.is_dragging
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, t: f64) -> GestureUpdate {
        let point = Point { x, y, t };
        self.start = Some(point);
        self.recent.clear();
        self.recent.push_back(point);
        self.sample = GestureSample {
            delta_x: 0.0,
            delta_y: 0.0,
            is_dragging: true,
        };
        self.update(false)
    }

    /// Ignored unless a pointer-down started a drag
    pub fn pointer_move(&mut self, x: f64, y: f64, t: f64) -> Option<GestureUpdate> {
        if !self.sample.is_dragging {
            return None;
        }
        self.track(x, y, t)?;
        Some(self.update(false))
    }

    /// Final sample of the drag; `None` when nothing was being dragged
    pub fn pointer_up(&mut self, x: f64, y: f64, t: f64) -> Option<GestureUpdate> {
        if !self.sample.is_dragging {
            return None;
        }
        self.track(x, y, t)?;
        self.sample.is_dragging = false;
        let update = self.update(true);
        self.start = None;
        Some(update)
    }

    /// Drop the drag without a decision, e.g. on pointercancel
    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    fn track(&mut self, x: f64, y: f64, t: f64) -> Option<()> {
        let start = self.start?;
        self.recent.push_back(Point { x, y, t });
        while self.recent.len() > 1 && self.recent.front().is_some_and(|p| p.t < t - VELOCITY_WINDOW_MS) {
            self.recent.pop_front();
        }
        self.sample.delta_x = x - start.x;
        self.sample.delta_y = y - start.y;
        Some(())
    }

    /// Displacement across the window over its duration
    fn velocity(&self) -> Velocity {
        match (self.recent.front(), self.recent.back()) {
            (Some(first), Some(last)) if last.t > first.t => {
                let dt = last.t - first.t;
                Velocity {
                    x: (last.x - first.x) / dt,
                    y: (last.y - first.y) / dt,
                }
            }
            _ => Velocity::default(),
        }
    }

    fn update(&self, last: bool) -> GestureUpdate {
        GestureUpdate {
            sample: self.sample,
            last,
            velocity: self.velocity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_without_down_is_ignored() {
        let mut tracker = GestureTracker::new();
        assert_eq!(tracker.pointer_move(10.0, 10.0, 1.0), None);
        assert_eq!(tracker.pointer_up(10.0, 10.0, 2.0), None);
    }

    #[test]
    fn test_deltas_relative_to_start() {
        let mut tracker = GestureTracker::new();
        tracker.pointer_down(100.0, 200.0, 0.0);
        let update = tracker.pointer_move(130.0, 190.0, 16.0).unwrap();

        assert_eq!(update.sample.delta_x, 30.0);
        assert_eq!(update.sample.delta_y, -10.0);
        assert!(update.sample.is_dragging);
        assert!(!update.last);
    }

    #[test]
    fn test_velocity_ignores_samples_outside_window() {
        let mut tracker = GestureTracker::new();
        tracker.pointer_down(0.0, 0.0, 0.0);
        tracker.pointer_move(10.0, 0.0, 100.0);
        let update = tracker.pointer_move(60.0, 20.0, 150.0).unwrap();

        assert_eq!(update.velocity, Velocity { x: 1.0, y: 0.4 });
    }

    #[test]
    fn test_release_finalizes() {
        let mut tracker = GestureTracker::new();
        tracker.pointer_down(0.0, 0.0, 0.0);
        tracker.pointer_move(-50.0, 0.0, 50.0);
        let update = tracker.pointer_up(-80.0, 0.0, 60.0).unwrap();

        assert!(update.last);
        assert!(!update.sample.is_dragging);
        assert_eq!(update.sample.delta_x, -80.0);
        assert_eq!(update.velocity.x, -80.0 / 60.0);
        assert!(!tracker.is_dragging());
        assert_eq!(tracker.pointer_move(0.0, 0.0, 70.0), None);
    }

    #[test]
    fn test_same_timestamp_has_no_infinite_velocity() {
        let mut tracker = GestureTracker::new();
        tracker.pointer_down(0.0, 0.0, 10.0);
        let update = tracker.pointer_move(40.0, 0.0, 10.0).unwrap();
        assert_eq!(update.velocity, Velocity::default());
    }

    #[test]
    fn test_release_at_last_move_position_keeps_flick_velocity() {
        let mut tracker = GestureTracker::new();
        tracker.pointer_down(0.0, 0.0, 0.0);
        for step in 1..=5 {
            let x = f64::from(step) * 10.0;
            tracker.pointer_move(x, 0.0, x);
        }
        let update = tracker.pointer_up(50.0, 0.0, 58.0).unwrap();

        assert_eq!(update.sample.delta_x, 50.0);
        assert!(update.velocity.x > 0.8, "vx = {}", update.velocity.x);
    }

    #[test]
    fn test_pause_before_release_has_no_velocity() {
        let mut tracker = GestureTracker::new();
        tracker.pointer_down(0.0, 0.0, 0.0);
        tracker.pointer_move(60.0, 0.0, 40.0);
        tracker.pointer_move(60.0, 0.0, 300.0);
        let update = tracker.pointer_up(60.0, 0.0, 420.0).unwrap();

        assert_eq!(update.velocity, Velocity::default());
    }
}
