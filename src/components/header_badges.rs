//! Header Badges Component
//!
//! Session streak, XP total with the floating award indicator.

use leptos::prelude::*;

use crate::context::use_app;

#[component]
pub fn HeaderBadges() -> impl IntoView {
    let ctx = use_app();

    let streak_text = move || ctx.session.with(|s| s.streak.display());
    let xp_text = move || ctx.session.with(|s| s.xp.formatted_total());
    let earned = move || ctx.session.with(|s| s.xp.last_earned());

    view! {
        <header class="header-badges">
            <Show when=move || !streak_text().is_empty()>
                <span class="streak-badge">"🔥 " {streak_text}</span>
            </Show>
            <span class="xp-badge">
                "⚡ " {xp_text} " XP"
                {move || earned().map(|e| view! { <span class="xp-float">"+" {e.amount}</span> })}
            </span>
        </header>
    }
}
