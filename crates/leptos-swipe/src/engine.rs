//! Swipe Decision Engine
//!
//! State machine over gesture updates:
//! `Idle -> Dragging -> Committing -> Settled`.
//!
//! A release commits when the card travelled past the distance threshold or
//! was flung faster than the velocity threshold. A committed card flies off
//! for a fixed duration; only then is the swipe reported, exactly once.
//! The settled card ignores input until the host calls `reset`.

use crate::gesture::GestureUpdate;

pub const DISTANCE_THRESHOLD: f64 = 100.0;
/// Release speed in px/ms that commits regardless of distance
pub const VELOCITY_THRESHOLD: f64 = 0.5;
pub const FLY_OFF_DURATION_MS: u32 = 350;
pub const MAX_ROTATION_DEG: f64 = 15.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeConfig {
    pub distance_threshold: f64,
    pub velocity_threshold: f64,
    pub fly_off_ms: u32,
    pub max_rotation: f64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            distance_threshold: DISTANCE_THRESHOLD,
            velocity_threshold: VELOCITY_THRESHOLD,
            fly_off_ms: FLY_OFF_DURATION_MS,
            max_rotation: MAX_ROTATION_DEG,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    /// Discard
    Left,
    /// Keep
    Right,
}

/// Classification of a release
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SwipeOutcome {
    #[default]
    None,
    Left,
    Right,
}

impl SwipeOutcome {
    pub fn direction(&self) -> Option<SwipeDirection> {
        match self {
            SwipeOutcome::None => None,
            SwipeOutcome::Left => Some(SwipeDirection::Left),
            SwipeOutcome::Right => Some(SwipeDirection::Right),
        }
    }
}

impl From<SwipeDirection> for SwipeOutcome {
    fn from(dir: SwipeDirection) -> Self {
        match dir {
            SwipeDirection::Left => SwipeOutcome::Left,
            SwipeDirection::Right => SwipeOutcome::Right,
        }
    }
}

/// Label shown on the card while dragging past the threshold
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlay {
    Keep,
    Discard,
}

impl Overlay {
    pub fn label(&self) -> &'static str {
        match self {
            Overlay::Keep => "KEEP",
            Overlay::Discard => "DISCARD",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SwipePhase {
    #[default]
    Idle,
    Dragging,
    Committing(SwipeDirection),
    Settled(SwipeDirection),
}

/// Effect of feeding one gesture update
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    /// Card follows the pointer
    Moved,
    /// Release below both thresholds; card returns to rest
    SnapBack,
    /// Release committed; start the fly-off timer
    Commit(SwipeDirection),
    /// Update arrived while committing
    Ignored,
}

#[derive(Clone, Debug, Default)]
pub struct SwipeEngine {
    config: SwipeConfig,
    phase: SwipePhase,
    offset_x: f64,
    offset_y: f64,
}

impl SwipeEngine {
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    pub fn phase(&self) -> SwipePhase {
        self.phase
    }

    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    /// Input is refused from commit until `reset`
    pub fn accepts_input(&self) -> bool {
        matches!(self.phase, SwipePhase::Idle | SwipePhase::Dragging)
    }

    pub fn handle(&mut self, update: &GestureUpdate) -> EngineEvent {
        if !self.accepts_input() {
            return EngineEvent::Ignored;
        }
        let dx = update.sample.delta_x;

        if !update.last {
            self.phase = SwipePhase::Dragging;
            self.offset_x = dx;
            self.offset_y = update.sample.delta_y;
            return EngineEvent::Moved;
        }

        match self.classify(dx, update.velocity.x).direction() {
            Some(dir) => {
                self.phase = SwipePhase::Committing(dir);
                self.offset_x = dx;
                self.offset_y = update.sample.delta_y;
                EngineEvent::Commit(dir)
            }
            None => {
                self.phase = SwipePhase::Idle;
                self.offset_x = 0.0;
                self.offset_y = 0.0;
                EngineEvent::SnapBack
            }
        }
    }

    /// Classify a release at offset `dx` with horizontal velocity `vx`.
    /// Distance wins over velocity when picking the direction.
    pub fn classify(&self, dx: f64, vx: f64) -> SwipeOutcome {
        let by_sign = |v: f64| {
            if v > 0.0 {
                SwipeOutcome::Right
            } else {
                SwipeOutcome::Left
            }
        };
        if dx.abs() >= self.config.distance_threshold {
            by_sign(dx)
        } else if vx.abs() >= self.config.velocity_threshold {
            by_sign(vx)
        } else {
            SwipeOutcome::None
        }
    }

    /// Commit without a drag, e.g. from a button or arrow key.
    /// Returns false from a previous commit until `reset`.
    pub fn commit(&mut self, dir: SwipeDirection) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.phase = SwipePhase::Committing(dir);
        self.offset_y = 0.0;
        true
    }

    /// Fly-off finished. Returns the committed direction the first time only.
    pub fn finish_fly_off(&mut self) -> Option<SwipeDirection> {
        match self.phase {
            SwipePhase::Committing(dir) => {
                self.phase = SwipePhase::Settled(dir);
                self.offset_x = 0.0;
                self.offset_y = 0.0;
                Some(dir)
            }
            _ => None,
        }
    }

    /// Back to rest, e.g. when the next card is shown
    pub fn reset(&mut self) {
        self.phase = SwipePhase::Idle;
        self.offset_x = 0.0;
        self.offset_y = 0.0;
    }

    /// Overlay while dragging past the distance threshold
    pub fn overlay(&self) -> Option<Overlay> {
        if self.phase != SwipePhase::Dragging {
            return None;
        }
        if self.offset_x >= self.config.distance_threshold {
            Some(Overlay::Keep)
        } else if self.offset_x <= -self.config.distance_threshold {
            Some(Overlay::Discard)
        } else {
            None
        }
    }

    /// Degrees, clamped to the configured maximum
    pub fn rotation(&self) -> f64 {
        let max = self.config.max_rotation;
        (self.offset_x / self.config.distance_threshold * max).clamp(-max, max)
    }

    /// 0.0 at rest to 1.0 at the threshold
    pub fn progress(&self) -> f64 {
        (self.offset_x.abs() / self.config.distance_threshold).min(1.0)
    }

    /// Inline style for the card. `viewport_width` sets how far a committed
    /// card flies.
    pub fn card_style(&self, viewport_width: f64) -> String {
        match self.phase {
            SwipePhase::Dragging => format!(
                "transform: translate({}px, {}px) rotate({}deg); transition: none;",
                self.offset_x,
                self.offset_y,
                self.rotation()
            ),
            SwipePhase::Committing(dir) => {
                let sign = if dir == SwipeDirection::Right { 1.0 } else { -1.0 };
                let max = self.config.max_rotation;
                format!(
                    "transform: translate({}px, {}px) rotate({}deg); transition: transform {}ms ease-out;",
                    sign * viewport_width * 1.5,
                    self.offset_y,
                    sign * max,
                    self.config.fly_off_ms
                )
            }
            SwipePhase::Idle => {
                "transform: translate(0px, 0px) rotate(0deg); transition: transform 0.3s ease-out;".to_string()
            }
            // The next card takes the place without animating in
            SwipePhase::Settled(_) => "transform: translate(0px, 0px) rotate(0deg); transition: none;".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{GestureSample, GestureTracker, Velocity};

    fn drag(dx: f64) -> GestureUpdate {
        GestureUpdate {
            sample: GestureSample { delta_x: dx, delta_y: 0.0, is_dragging: true },
            last: false,
            velocity: Velocity::default(),
        }
    }

    fn release(dx: f64, vx: f64) -> GestureUpdate {
        GestureUpdate {
            sample: GestureSample { delta_x: dx, delta_y: 0.0, is_dragging: false },
            last: true,
            velocity: Velocity { x: vx, y: 0.0 },
        }
    }

    #[test]
    fn test_overlay_at_threshold() {
        let mut engine = SwipeEngine::default();
        engine.handle(&drag(99.0));
        assert_eq!(engine.overlay(), None);
        engine.handle(&drag(100.0));
        assert_eq!(engine.overlay(), Some(Overlay::Keep));
        engine.handle(&drag(-100.0));
        assert_eq!(engine.overlay(), Some(Overlay::Discard));
    }

    #[test]
    fn test_distance_commit_emits_once_after_fly_off() {
        let mut engine = SwipeEngine::default();
        engine.handle(&drag(150.0));
        assert_eq!(engine.handle(&release(150.0, 0.0)), EngineEvent::Commit(SwipeDirection::Right));
        assert_eq!(engine.overlay(), None);

        assert_eq!(engine.finish_fly_off(), Some(SwipeDirection::Right));
        assert_eq!(engine.finish_fly_off(), None);
        assert_eq!(engine.offset(), (0.0, 0.0));
    }

    #[test]
    fn test_velocity_commit_uses_velocity_direction() {
        let mut engine = SwipeEngine::default();
        engine.handle(&drag(20.0));
        assert_eq!(engine.handle(&release(20.0, -0.8)), EngineEvent::Commit(SwipeDirection::Left));
    }

    #[test]
    fn test_distance_direction_wins() {
        let mut engine = SwipeEngine::default();
        assert_eq!(engine.handle(&release(-120.0, 2.0)), EngineEvent::Commit(SwipeDirection::Left));
    }

    #[test]
    fn test_short_slow_release_snaps_back() {
        let mut engine = SwipeEngine::default();
        engine.handle(&drag(60.0));
        assert_eq!(engine.handle(&release(60.0, 0.2)), EngineEvent::SnapBack);
        assert_eq!(engine.phase(), SwipePhase::Idle);
        assert_eq!(engine.finish_fly_off(), None);
    }

    #[test]
    fn test_input_ignored_while_committing() {
        let mut engine = SwipeEngine::default();
        engine.handle(&release(200.0, 0.0));
        assert!(!engine.accepts_input());
        assert_eq!(engine.handle(&drag(-300.0)), EngineEvent::Ignored);
        assert_eq!(engine.handle(&release(-300.0, 0.0)), EngineEvent::Ignored);

        assert_eq!(engine.finish_fly_off(), Some(SwipeDirection::Right));
        assert!(!engine.accepts_input());
        engine.reset();
        assert!(engine.accepts_input());
    }

    #[test]
    fn test_settled_card_emits_no_second_event() {
        let mut engine = SwipeEngine::default();
        assert!(engine.commit(SwipeDirection::Right));
        assert_eq!(engine.finish_fly_off(), Some(SwipeDirection::Right));

        assert!(!engine.commit(SwipeDirection::Left));
        assert_eq!(engine.handle(&drag(-300.0)), EngineEvent::Ignored);
        assert_eq!(engine.handle(&release(-300.0, 0.0)), EngineEvent::Ignored);
        assert_eq!(engine.finish_fly_off(), None);
        assert_eq!(engine.phase(), SwipePhase::Settled(SwipeDirection::Right));

        engine.reset();
        assert!(engine.commit(SwipeDirection::Left));
    }

    #[test]
    fn test_classify_outcomes() {
        let engine = SwipeEngine::default();
        assert_eq!(engine.classify(40.0, 0.1), SwipeOutcome::None);
        assert_eq!(engine.classify(100.0, 0.0), SwipeOutcome::Right);
        assert_eq!(engine.classify(50.0, -1.0), SwipeOutcome::Left);
        assert_eq!(SwipeOutcome::from(SwipeDirection::Right).direction(), Some(SwipeDirection::Right));
    }

    #[test]
    fn test_flick_released_in_place_commits() {
        let mut tracker = GestureTracker::new();
        let mut engine = SwipeEngine::default();
        engine.handle(&tracker.pointer_down(0.0, 0.0, 0.0));
        for step in 1..=5 {
            let x = f64::from(step) * 10.0;
            let update = tracker.pointer_move(x, 0.0, x).unwrap();
            assert_eq!(engine.handle(&update), EngineEvent::Moved);
        }
        let release = tracker.pointer_up(50.0, 0.0, 58.0).unwrap();

        assert_eq!(engine.handle(&release), EngineEvent::Commit(SwipeDirection::Right));
    }

    #[test]
    fn test_rotation_and_progress() {
        let mut engine = SwipeEngine::default();
        engine.handle(&drag(50.0));
        assert_eq!(engine.rotation(), 7.5);
        assert_eq!(engine.progress(), 0.5);

        engine.handle(&drag(-400.0));
        assert_eq!(engine.rotation(), -15.0);
        assert_eq!(engine.progress(), 1.0);
    }

    #[test]
    fn test_card_style_per_phase() {
        let mut engine = SwipeEngine::default();
        engine.handle(&drag(10.0));
        assert!(engine.card_style(400.0).contains("transition: none"));

        engine.handle(&release(110.0, 0.0));
        let style = engine.card_style(400.0);
        assert!(style.contains("translate(600px"));
        assert!(style.contains("350ms"));

        engine.finish_fly_off();
        assert!(engine.card_style(400.0).contains("translate(0px, 0px)"));
    }

    #[test]
    fn test_programmatic_commit() {
        let mut engine = SwipeEngine::default();
        assert!(engine.commit(SwipeDirection::Left));
        assert!(!engine.commit(SwipeDirection::Right));
        assert_eq!(engine.finish_fly_off(), Some(SwipeDirection::Left));
    }
}
