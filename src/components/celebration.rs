//! Celebration Overlay
//!
//! Confetti when the streak hits its threshold and a banner on XP
//! milestones. The flags are cleared by the context after a short delay.

use leptos::prelude::*;

use crate::context::use_app;

const CONFETTI_PIECES: usize = 24;

#[component]
pub fn Celebration() -> impl IntoView {
    let ctx = use_app();

    let confetti = move || ctx.session.with(|s| s.streak.should_trigger_confetti());
    let milestone = move || ctx.session.with(|s| s.xp.should_trigger_milestone());

    view! {
        <Show when=confetti>
            <div class="confetti" aria-hidden="true">
                {(0..CONFETTI_PIECES).map(|i| {
                    let style = format!(
                        "left: {}%; animation-delay: {}ms; --hue: {};",
                        (i * 37) % 100,
                        (i * 53) % 600,
                        (i * 47) % 360
                    );
                    view! { <span class="confetti-piece" style=style></span> }
                }).collect_view()}
            </div>
        </Show>
        <Show when=milestone>
            <div class="milestone-banner">
                "🎉 " {move || ctx.session.with(|s| s.xp.formatted_total())} " XP!"
            </div>
        </Show>
    }
}
