//! Stats View Component
//!
//! Category breakdown, sorting rates, box fill, the daily trend and the
//! achievement catalog.

use leptos::prelude::*;

use declutter_core::stats::{box_stats, category_stats, discard_rate, keep_rate, sorting_rate, sorting_trends};

use crate::context::use_app;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
fn StatTile(label: &'static str, #[prop(into)] value: Signal<String>) -> impl IntoView {
    view! {
        <div class="stat-tile">
            <span class="stat-value">{move || value.get()}</span>
            <span class="stat-label">{label}</span>
        </div>
    }
}

#[component]
pub fn StatsView() -> impl IntoView {
    let ctx = use_app();
    let store = use_app_store();

    let stats = Memo::new(move |_| store.items().with(|items| category_stats(items)));
    let trends = move || store.items().with(|items| sorting_trends(items, &chrono::Local));
    let boxes = move || store.boxes().with(|b| box_stats(b));
    let items_sorted = move || store.user_stats().with(|s| s.items_sorted);

    let trend_max = move || trends().iter().map(|t| t.count).max().unwrap_or(0).max(1);

    let achievements = move || ctx.session.with(|s| s.achievements.with_status());
    let next = move || ctx.session.with(|s| s.achievements.next_achievement());
    let progress = move || ctx.session.with(|s| s.achievements.progress_to_next(items_sorted()));
    let unlocked_summary = move || {
        ctx.session
            .with(|s| format!("{} / {}", s.achievements.unlocked_count(), s.achievements.total_count()))
    };

    view! {
        <div class="stats-view">
            <h2>"Stats"</h2>

            <div class="stat-grid">
                <StatTile label="Sorted" value=Signal::derive(move || items_sorted().to_string()) />
                <StatTile label="Kept" value=Signal::derive(move || stats.get().kept.to_string()) />
                <StatTile label="Trash" value=Signal::derive(move || stats.get().trash.to_string()) />
                <StatTile label="Donate" value=Signal::derive(move || stats.get().donate.to_string()) />
                <StatTile label="Sell" value=Signal::derive(move || stats.get().sell.to_string()) />
                <StatTile label="Unsorted" value=Signal::derive(move || stats.get().unsorted.to_string()) />
            </div>

            <div class="stat-grid rates">
                <StatTile label="Sorted" value=Signal::derive(move || format!("{}%", sorting_rate(&stats.get()))) />
                <StatTile label="Kept" value=Signal::derive(move || format!("{}%", keep_rate(&stats.get()))) />
                <StatTile label="Let go" value=Signal::derive(move || format!("{}%", discard_rate(&stats.get()))) />
            </div>

            <section class="trend">
                <h3>"Recent sorting"</h3>
                <Show
                    when=move || !trends().is_empty()
                    fallback=|| view! { <p class="empty-state">"Sort a few items to see your trend."</p> }
                >
                    <div class="trend-bars">
                        {move || {
                            let max = trend_max();
                            trends()
                                .into_iter()
                                .map(|t| {
                                    let height = format!("height: {}%;", t.count * 100 / max);
                                    view! {
                                        <div class="trend-bar">
                                            <span class="trend-count">{t.count}</span>
                                            <div class="trend-fill" style=height></div>
                                            <span class="trend-date">{t.date}</span>
                                        </div>
                                    }
                                })
                                .collect_view()
                        }}
                    </div>
                </Show>
            </section>

            <section class="box-stats">
                <h3>"Boxes"</h3>
                <ul>
                    {move || boxes()
                        .into_iter()
                        .map(|b| view! {
                            <li class=format!("gradient-{}", b.gradient)>
                                <span>{b.name}</span>
                                <span class="box-count">{b.count}</span>
                            </li>
                        })
                        .collect_view()}
                </ul>
            </section>

            <section class="achievements">
                <h3>"Achievements " <span class="achievement-count">{unlocked_summary}</span></h3>
                {move || next().map(|a| {
                    let width = format!("width: {:.0}%;", progress());
                    view! {
                        <div class="next-achievement">
                            <span>"Next: " {a.icon} " " {a.name}</span>
                            <div class="progress-track"><div class="progress-fill" style=width></div></div>
                        </div>
                    }
                })}
                <ul class="achievement-list">
                    {move || achievements()
                        .into_iter()
                        .map(|status| {
                            let unlocked = status.unlocked();
                            let a = status.achievement;
                            view! {
                                <li class="achievement" class:locked=!unlocked>
                                    <span class="achievement-icon">{if unlocked { a.icon } else { "🔒" }}</span>
                                    <span class="achievement-name">{a.name}</span>
                                    <span class="achievement-desc">{a.description}</span>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </section>
        </div>
    }
}
