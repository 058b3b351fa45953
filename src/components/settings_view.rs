//! Settings View Component
//!
//! Theme, sound, daily reminder, the in-app log and sign out.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use declutter_core::config::{Preferences, Theme};

use super::input_value;
use crate::commands;
use crate::context::use_app;

const THEMES: [Theme; 3] = [Theme::System, Theme::Light, Theme::Dark];

#[component]
pub fn SettingsView() -> impl IntoView {
    let ctx = use_app();

    let (log_lines, set_log_lines) = signal(Vec::<String>::new());
    let (show_log, set_show_log) = signal(false);

    let update_prefs = move |f: &dyn Fn(&mut Preferences)| {
        let mut prefs = ctx.prefs.get_untracked();
        f(&mut prefs);
        ctx.save_prefs(prefs);
    };

    let on_theme = move |ev: web_sys::Event| {
        let Some(select) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok()) else {
            return;
        };
        let theme = Theme::from_str(&select.value());
        update_prefs(&|p| p.theme = theme);
    };

    let on_notifications = move |_: web_sys::Event| {
        if ctx.prefs.with_untracked(|p| p.notifications_enabled) {
            update_prefs(&|p| p.notifications_enabled = false);
            return;
        }
        spawn_local(async move {
            match commands::request_notification_permission().await {
                Ok(true) => update_prefs(&|p| p.notifications_enabled = true),
                Ok(false) => ctx.toast_error("Notifications are blocked in this browser"),
                Err(err) => {
                    tracing::warn!(error = %err, "notification permission request failed");
                    ctx.toast_error("Could not enable notifications");
                }
            }
        });
    };

    let on_reminder_time = move |ev: web_sys::Event| {
        let time = input_value(&ev);
        if !time.is_empty() {
            update_prefs(&|p| p.reminder_time = time.clone());
        }
    };

    let toggle_log = move |_: web_sys::MouseEvent| {
        if !show_log.get_untracked() {
            set_log_lines.set(ring_logger::recent_lines());
        }
        set_show_log.update(|v| *v = !*v);
    };

    let on_sign_out = move |_: web_sys::MouseEvent| {
        spawn_local(async move {
            if let Err(err) = commands::sign_out().await {
                tracing::warn!(error = %err, "sign out failed");
                ctx.toast_error("Could not sign out");
                return;
            }
            ctx.session.update(|s| s.end());
            ctx.user.set(None);
            tracing::info!("signed out");
        });
    };

    let email = move || ctx.user.with(|u| u.as_ref().and_then(|u| u.email.clone()).unwrap_or_default());

    view! {
        <div class="settings-view">
            <h2>"Settings"</h2>

            <section class="settings-group">
                <label class="settings-row">
                    <span>"Theme"</span>
                    <select on:change=on_theme>
                        {THEMES.into_iter().map(|theme| {
                            let selected = move || ctx.prefs.with(|p| p.theme == theme);
                            view! {
                                <option value=theme.as_str() selected=selected>
                                    {match theme {
                                        Theme::System => "System",
                                        Theme::Light => "Light",
                                        Theme::Dark => "Dark",
                                    }}
                                </option>
                            }
                        }).collect_view()}
                    </select>
                </label>
                <label class="settings-row">
                    <span>"Sound effects"</span>
                    <input
                        type="checkbox"
                        prop:checked=move || ctx.prefs.with(|p| p.sound_enabled)
                        on:change=move |_| update_prefs(&|p| p.sound_enabled = !p.sound_enabled)
                    />
                </label>
            </section>

            <section class="settings-group">
                <label class="settings-row">
                    <span>"Daily reminder"</span>
                    <input
                        type="checkbox"
                        prop:checked=move || ctx.prefs.with(|p| p.notifications_enabled)
                        on:change=on_notifications
                    />
                </label>
                <Show when=move || ctx.prefs.with(|p| p.notifications_enabled)>
                    <label class="settings-row">
                        <span>"Remind me at"</span>
                        <input
                            type="time"
                            prop:value=move || ctx.prefs.with(|p| p.reminder_time.clone())
                            on:change=on_reminder_time
                        />
                    </label>
                </Show>
            </section>

            <section class="settings-group">
                <button class="link-btn" on:click=toggle_log>
                    {move || if show_log.get() { "Hide log" } else { "Show log" }}
                </button>
                <Show when=move || show_log.get()>
                    <pre class="log-viewer">{move || log_lines.get().join("\n")}</pre>
                    <button class="link-btn" on:click=move |_| {
                        ring_logger::clear();
                        set_log_lines.set(Vec::new());
                    }>
                        "Clear log"
                    </button>
                </Show>
            </section>

            <section class="settings-group account">
                <p class="account-email">{email}</p>
                <button class="sign-out-btn" on:click=on_sign_out>"Sign out"</button>
            </section>
        </div>
    }
}
