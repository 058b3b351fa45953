//! Item Row Component
//!
//! A sorted item in a box or pile list. The name is editable in place and
//! the item can be moved to another box or pile.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use declutter_core::models::{sorted_boxes, DiscardCategory, Item};
use declutter_core::sorting::Destination;

use super::input_value;
use crate::context::use_app;
use crate::store::{use_app_store, AppStateStoreFields};

const BOX_PREFIX: &str = "box:";

/// Select value back to a destination
fn parse_destination(value: &str) -> Option<Destination> {
    if let Some(box_id) = value.strip_prefix(BOX_PREFIX) {
        return Some(Destination::Box(box_id.to_string()));
    }
    DiscardCategory::ALL
        .into_iter()
        .find(|c| c.status().as_str() == value)
        .map(Destination::Discard)
}

#[component]
pub fn ItemRow(item: Item) -> impl IntoView {
    let ctx = use_app();
    let store = use_app_store();

    let item_id = StoredValue::new(item.id.clone());
    let from_box = StoredValue::new(item.box_id().map(str::to_string));
    let status = item.status;

    let (editing, set_editing) = signal(false);
    let (name, set_name) = signal(item.name.clone());

    let saved_name = StoredValue::new(item.name.clone());

    // Enter and the blur that follows both land here
    let commit_rename = move || {
        if !editing.get_untracked() {
            return;
        }
        set_editing.set(false);
        let new_name = name.get_untracked();
        if new_name.trim() == saved_name.get_value() {
            return;
        }
        saved_name.set_value(new_name.trim().to_string());
        spawn_local(async move {
            let id = item_id.get_value();
            if let Err(err) = ctx.sort_service().rename_item(&id, &new_name).await {
                tracing::warn!(item = %id, error = %err, "rename failed");
                ctx.toast_error(err.user_message());
            }
        });
    };

    let on_move = move |ev: web_sys::Event| {
        let Some(select) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok()) else {
            return;
        };
        let Some(destination) = parse_destination(&select.value()) else {
            return;
        };
        spawn_local(async move {
            let id = item_id.get_value();
            let from = from_box.get_value();
            match ctx.sort_service().move_item(&id, from.as_deref(), &destination).await {
                Ok(()) => tracing::info!(item = %id, ?destination, "item moved"),
                Err(err) => ctx.toast_error(err.user_message()),
            }
        });
    };

    // Every box and pile except where the item already is
    let box_options = move || {
        let current = from_box.get_value();
        store.boxes().with(|boxes| {
            sorted_boxes(boxes)
                .into_iter()
                .filter(|b| Some(&b.id) != current.as_ref())
                .map(|b| view! { <option value=format!("{}{}", BOX_PREFIX, b.id)>"📦 " {b.name}</option> })
                .collect_view()
        })
    };
    let pile_options = DiscardCategory::ALL
        .into_iter()
        .filter(|c| c.status() != status)
        .map(|c| view! { <option value=c.status().as_str()>{c.icon()} " " {c.label()}</option> })
        .collect_view();

    view! {
        <li class="item-row">
            <Show
                when=move || editing.get()
                fallback=move || view! {
                    <span class="item-name" on:dblclick=move |_| set_editing.set(true)>
                        {move || name.get()}
                    </span>
                }
            >
                <input
                    class="item-name-input"
                    type="text"
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(input_value(&ev))
                    on:blur=move |_| commit_rename()
                    on:keydown=move |ev: web_sys::KeyboardEvent| {
                        if ev.key() == "Enter" {
                            commit_rename();
                        }
                    }
                />
            </Show>
            <select class="item-move" on:change=on_move>
                <option value="" selected>"Move to..."</option>
                {box_options}
                {pile_options}
            </select>
        </li>
    }
}
