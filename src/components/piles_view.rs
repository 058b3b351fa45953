//! Piles View Component
//!
//! Trash, donate and sell piles. The donate and sell lists can be shared
//! as plain text.

use leptos::prelude::*;
use leptos::task::spawn_local;

use declutter_core::models::{items_with_status, DiscardCategory};
use declutter_core::share::{format_items_list, ShareableCategory};
use declutter_core::toast::ToastKind;

use super::boxes_view::item_key;
use super::ItemRow;
use crate::commands::{self, ShareResult};
use crate::context::use_app;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
fn Pile(category: DiscardCategory) -> impl IntoView {
    let ctx = use_app();
    let store = use_app_store();
    let status = category.status();

    let items = move || store.items().with(|items| items_with_status(items, status));
    let count = move || store.items().with(|items| items.iter().filter(|i| i.status == status).count());

    let on_share = move |_: web_sys::MouseEvent| {
        let Some(shareable) = ShareableCategory::from_discard(category) else {
            return;
        };
        let text = store.items().with_untracked(|all| format_items_list(&items_with_status(all, status), shareable));
        spawn_local(async move {
            match commands::share_text(shareable.title(), &text).await {
                Ok(ShareResult::Shared) => {}
                Ok(ShareResult::Copied) => ctx.toast(ToastKind::Success, "List copied to clipboard"),
                Err(err) => {
                    tracing::warn!(error = %err, "share failed");
                    ctx.toast_error("Could not share the list");
                }
            }
        });
    };

    view! {
        <section class=format!("pile pile-{}", status.as_str())>
            <header class="pile-header">
                <h3>{category.icon()} " " {category.label()}</h3>
                <span class="pile-count">{count}</span>
                <Show when=move || { ShareableCategory::from_discard(category).is_some() && count() > 0 }>
                    <button class="share-btn" on:click=on_share>"Share"</button>
                </Show>
            </header>
            <ul class="pile-items">
                <For
                    each=items
                    key=item_key
                    children=|item| view! { <ItemRow item=item /> }
                />
            </ul>
        </section>
    }
}

#[component]
pub fn PilesView() -> impl IntoView {
    view! {
        <div class="piles-view">
            <h2>"Piles"</h2>
            {DiscardCategory::ALL
                .into_iter()
                .map(|category| view! { <Pile category=category /> })
                .collect_view()}
        </div>
    }
}
