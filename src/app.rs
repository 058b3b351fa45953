//! Declutter Frontend App
//!
//! Root component: configuration check, sign-in gate, live backend
//! subscriptions and the tabbed mobile layout.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use declutter_core::config::{AppConfig, NEXT_REMINDER_KEY};
use declutter_core::notifications::{next_reminder, parse_reminder_time, PushPayload};
use declutter_core::tx::{self, Query};

use crate::commands::{self, Subscription};
use crate::components::{
    BoxesView, BottomNav, Celebration, ConfigError, HeaderBadges, PilesView, Screen, SettingsView, SignIn, SortView,
    StatsView, ToastStack,
};
use crate::context::AppContext;
use crate::store::{store_reset, AppState, AppStateStoreFields, AppStore};

#[component]
pub fn App() -> impl IntoView {
    match AppConfig::from_app_id(option_env!("DECLUTTER_APP_ID")) {
        Ok(config) => {
            tracing::info!(app_id = %config.app_id, "starting");
            view! { <Main /> }.into_any()
        }
        Err(err) => {
            tracing::error!(error = %err, "missing configuration");
            view! { <ConfigError message=err.to_string() /> }.into_any()
        }
    }
}

#[component]
fn Main() -> impl IntoView {
    let ctx = AppContext::new();
    let store: AppStore = Store::new(AppState::new());
    provide_context(ctx);
    provide_context(store);

    let (screen, set_screen) = signal(Screen::Sort);
    let (auth_checked, set_auth_checked) = signal(false);

    // Theme follows preferences
    Effect::new(move |_| {
        let theme = ctx.prefs.with(|p| p.theme);
        commands::apply_theme(theme.as_str());
    });

    // Restore the signed-in user on mount
    Effect::new(move |_| {
        spawn_local(async move {
            match commands::current_user().await {
                Ok(user) => ctx.user.set(user),
                Err(err) => tracing::warn!(error = %err, "could not restore session"),
            }
            set_auth_checked.set(true);
        });
    });

    // Live queries for the current user; replacing the list unsubscribes
    let subscriptions = StoredValue::new_local(Vec::<Subscription>::new());
    Effect::new(move |_| {
        let user_id = ctx.user.with(|u| u.as_ref().map(|u| u.id.clone()));
        subscriptions.set_value(Vec::new());
        store_reset(&store);
        let Some(user_id) = user_id else {
            return;
        };
        tracing::info!(user = %user_id, "subscribing");
        subscriptions.set_value(subscribe_all(store, &user_id));
    });

    // Daily reminder while notifications are on
    let reminder = StoredValue::new_local(None::<gloo_timers::callback::Timeout>);
    let (reminder_tick, set_reminder_tick) = signal(0u32);
    Effect::new(move |_| {
        let _ = reminder_tick.get();
        let prefs = ctx.prefs.get();
        reminder.set_value(None);
        if !prefs.notifications_enabled || !commands::notification_permission_granted() {
            ctx.with_storage(|s| s.remove(NEXT_REMINDER_KEY));
            return;
        }
        let now = chrono::Local::now();
        let Some(at) = next_reminder(&now, parse_reminder_time(&prefs.reminder_time)) else {
            return;
        };
        ctx.with_storage(|s| s.set(NEXT_REMINDER_KEY, &at.timestamp_millis().to_string()));
        let delay = (at - now).num_milliseconds().clamp(0, i64::from(u32::MAX)) as u32;
        tracing::debug!(at = %at, "reminder scheduled");
        let timeout = gloo_timers::callback::Timeout::new(delay, move || {
            if let Err(err) = commands::show_notification(&PushPayload::default()) {
                tracing::warn!(error = %err, "reminder notification failed");
            }
            set_reminder_tick.update(|t| *t += 1);
        });
        reminder.set_value(Some(timeout));
    });

    // Pushes that arrive while the app is open are shown by the page
    let push_listener = StoredValue::new_local(None::<Subscription>);
    Effect::new(move |_| {
        let enabled = ctx.prefs.with(|p| p.notifications_enabled);
        push_listener.set_value(None);
        if !enabled {
            return;
        }
        push_listener.set_value(Some(commands::listen_for_push(|payload| {
            tracing::debug!(tag = %payload.tag, "push received");
            if let Err(err) = commands::show_notification(&payload) {
                tracing::warn!(error = %err, "push notification failed");
            }
        })));
    });

    let signed_in = move || ctx.user.with(|u| u.is_some());

    view! {
        <Show
            when=move || auth_checked.get()
            fallback=|| view! { <div class="splash">"Loading..."</div> }
        >
            <Show when=signed_in fallback=|| view! { <SignIn /> }>
                <div class="app-layout">
                    <HeaderBadges />
                    <main class="main-content">
                        {move || match screen.get() {
                            Screen::Sort => view! { <SortView /> }.into_any(),
                            Screen::Boxes => view! { <BoxesView /> }.into_any(),
                            Screen::Piles => view! { <PilesView /> }.into_any(),
                            Screen::Stats => view! { <StatsView /> }.into_any(),
                            Screen::Settings => view! { <SettingsView /> }.into_any(),
                        }}
                    </main>
                    <BottomNav screen=screen set_screen=set_screen />
                    <Celebration />
                </div>
            </Show>
        </Show>
        <ToastStack />
    }
}

/// Items, boxes and the user record for `user_id`
fn subscribe_all(store: AppStore, user_id: &str) -> Vec<Subscription> {
    let mut subs = Vec::with_capacity(3);

    let items = commands::subscribe_query(&Query::Items { owner: user_id.to_string() }, move |resp| {
        store.loading().set(false);
        match resp.map_err(declutter_core::DomainError::Backend).and_then(|data| tx::parse_items(&data)) {
            Ok(items) => {
                store.items().set(items);
                store.sync_error().set(None);
            }
            Err(err) => {
                tracing::warn!(error = %err, "items subscription failed");
                store.items().set(Vec::new());
                store.sync_error().set(Some(err.user_message()));
            }
        }
    });

    let boxes = commands::subscribe_query(&Query::Boxes { owner: user_id.to_string() }, move |resp| {
        match resp.map_err(declutter_core::DomainError::Backend).and_then(|data| tx::parse_boxes(&data)) {
            Ok(boxes) => store.boxes().set(boxes),
            Err(err) => {
                tracing::warn!(error = %err, "boxes subscription failed");
                store.boxes().set(Vec::new());
            }
        }
    });

    // Errors keep the last known count
    let stats = commands::subscribe_query(&Query::User { id: user_id.to_string() }, move |resp| {
        if let Ok(data) = resp {
            store.user_stats().set(tx::parse_user_stats(&data));
        }
    });

    for sub in [items, boxes, stats] {
        match sub {
            Ok(sub) => subs.push(sub),
            Err(err) => tracing::error!(error = %err, "subscribe failed"),
        }
    }
    subs
}
