//! Bottom Navigation Component
//!
//! Tab bar switching between the app's screens.

use leptos::prelude::*;

/// Screen selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Sort,
    Boxes,
    Piles,
    Stats,
    Settings,
}

const TABS: &[(Screen, &str, &str)] = &[
    (Screen::Sort, "🃏", "Sort"),
    (Screen::Boxes, "📦", "Boxes"),
    (Screen::Piles, "🗂️", "Piles"),
    (Screen::Stats, "📊", "Stats"),
    (Screen::Settings, "⚙️", "Settings"),
];

#[component]
pub fn BottomNav(screen: ReadSignal<Screen>, set_screen: WriteSignal<Screen>) -> impl IntoView {
    view! {
        <nav class="bottom-nav">
            {TABS.iter().map(|(target, icon, label)| {
                let target = *target;
                view! {
                    <button
                        class=move || if screen.get() == target { "nav-btn active" } else { "nav-btn" }
                        on:click=move |_| set_screen.set(target)
                    >
                        <span class="nav-icon">{*icon}</span>
                        <span class="nav-label">{*label}</span>
                    </button>
                }
            }).collect_view()}
        </nav>
    }
}
