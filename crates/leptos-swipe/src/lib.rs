//! Leptos Swipe Utilities
//!
//! Tinder-style swipe cards for Leptos using pointer events.
//! A release past the distance or velocity threshold flies the card off
//! and reports the direction once the animation is over.

pub mod engine;
pub mod gesture;

use leptos::prelude::*;
use wasm_bindgen::JsCast;

pub use engine::{
    EngineEvent, Overlay, SwipeConfig, SwipeDirection, SwipeEngine, SwipeOutcome, SwipePhase, DISTANCE_THRESHOLD,
    FLY_OFF_DURATION_MS, MAX_ROTATION_DEG, VELOCITY_THRESHOLD,
};
pub use gesture::{GestureSample, GestureTracker, GestureUpdate, Velocity};

/// Fly-off distance when the window width is unavailable
const FALLBACK_VIEWPORT_PX: f64 = 400.0;

/// Swipe state for one card slot
#[derive(Clone, Copy)]
pub struct SwipeSignals {
    tracker: StoredValue<GestureTracker>,
    pub engine: RwSignal<SwipeEngine>,
    on_swipe: Callback<SwipeDirection>,
}

/// Create swipe state. `on_swipe` runs once per committed swipe, after the
/// fly-off animation.
pub fn use_swipe(config: SwipeConfig, on_swipe: Callback<SwipeDirection>) -> SwipeSignals {
    SwipeSignals {
        tracker: StoredValue::new(GestureTracker::new()),
        engine: RwSignal::new(SwipeEngine::new(config)),
        on_swipe,
    }
}

fn viewport_width() -> f64 {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(FALLBACK_VIEWPORT_PX)
}

impl SwipeSignals {
    /// Reactive inline style for the card element
    pub fn card_style(&self) -> String {
        let width = viewport_width();
        self.engine.with(|e| e.card_style(width))
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.engine.with(|e| e.overlay())
    }

    pub fn progress(&self) -> f64 {
        self.engine.with(|e| e.progress())
    }

    pub fn is_committing(&self) -> bool {
        self.engine.with(|e| matches!(e.phase(), SwipePhase::Committing(_)))
    }

    /// Back to rest for the next card
    pub fn reset(&self) {
        self.tracker.update_value(|t| t.cancel());
        self.engine.update(|e| e.reset());
    }

    /// Swipe without dragging, e.g. from the keep and discard buttons
    pub fn trigger(&self, dir: SwipeDirection) {
        if self.engine.try_update(|e| e.commit(dir)).unwrap_or(false) {
            self.start_fly_off(dir);
        }
    }

    fn feed(&self, update: GestureUpdate) {
        let Some(event) = self.engine.try_update(|e| e.handle(&update)) else {
            return;
        };
        if let EngineEvent::Commit(dir) = event {
            self.start_fly_off(dir);
        }
    }

    fn start_fly_off(&self, dir: SwipeDirection) {
        tracing::debug!(?dir, "swipe committed");
        let engine = self.engine;
        let on_swipe = self.on_swipe;
        let ms = engine.with_untracked(|e| e.config().fly_off_ms);
        gloo_timers::callback::Timeout::new(ms, move || {
            // Card may have been unmounted during the animation
            if let Some(Some(dir)) = engine.try_update(|e| e.finish_fly_off()) {
                on_swipe.run(dir);
            }
        })
        .forget();
    }
}

/// Create pointerdown handler for the card.
/// Captures the pointer so the drag keeps tracking outside the card.
pub fn make_on_pointerdown(swipe: SwipeSignals) -> impl Fn(web_sys::PointerEvent) + Copy + 'static {
    move |ev: web_sys::PointerEvent| {
        if !swipe.engine.with_untracked(|e| e.accepts_input()) {
            return;
        }
        // Primary button or touch/pen contact only
        if ev.button() != 0 {
            return;
        }
        if let Some(el) = ev.current_target().and_then(|t| t.dyn_into::<web_sys::Element>().ok()) {
            let _ = el.set_pointer_capture(ev.pointer_id());
        }
        let (x, y, t) = (ev.client_x() as f64, ev.client_y() as f64, ev.time_stamp());
        let Some(update) = swipe.tracker.try_update_value(|tr| tr.pointer_down(x, y, t)) else {
            return;
        };
        swipe.feed(update);
    }
}

pub fn make_on_pointermove(swipe: SwipeSignals) -> impl Fn(web_sys::PointerEvent) + Copy + 'static {
    move |ev: web_sys::PointerEvent| {
        let (x, y, t) = (ev.client_x() as f64, ev.client_y() as f64, ev.time_stamp());
        if let Some(Some(update)) = swipe.tracker.try_update_value(|tr| tr.pointer_move(x, y, t)) {
            swipe.feed(update);
        }
    }
}

pub fn make_on_pointerup(swipe: SwipeSignals) -> impl Fn(web_sys::PointerEvent) + Copy + 'static {
    move |ev: web_sys::PointerEvent| {
        let (x, y, t) = (ev.client_x() as f64, ev.client_y() as f64, ev.time_stamp());
        if let Some(Some(update)) = swipe.tracker.try_update_value(|tr| tr.pointer_up(x, y, t)) {
            swipe.feed(update);
        }
    }
}

/// Interrupted drags snap back without a decision
pub fn make_on_pointercancel(swipe: SwipeSignals) -> impl Fn(web_sys::PointerEvent) + Copy + 'static {
    move |_ev: web_sys::PointerEvent| {
        if swipe.engine.with_untracked(|e| e.phase() == SwipePhase::Dragging) {
            swipe.reset();
        }
    }
}

/// Arrow keys swipe the focused card
pub fn make_on_keydown(swipe: SwipeSignals) -> impl Fn(web_sys::KeyboardEvent) + Copy + 'static {
    move |ev: web_sys::KeyboardEvent| {
        let dir = match ev.key().as_str() {
            "ArrowLeft" => SwipeDirection::Left,
            "ArrowRight" => SwipeDirection::Right,
            _ => return,
        };
        ev.prevent_default();
        swipe.trigger(dir);
    }
}
