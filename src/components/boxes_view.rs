//! Boxes View Component
//!
//! Every box with its item count, fullest first. Opening a box lists its
//! items for renaming or moving.

use leptos::prelude::*;

use declutter_core::models::{items_in_box, sorted_boxes, Item};

use super::ItemRow;
use crate::store::{use_app_store, AppStateStoreFields};

/// Rebuild a row whenever anything it shows changes
pub(crate) fn item_key(item: &Item) -> (String, String, Option<String>, &'static str) {
    (
        item.id.clone(),
        item.name.clone(),
        item.box_id().map(str::to_string),
        item.status.as_str(),
    )
}

#[component]
pub fn BoxesView() -> impl IntoView {
    let store = use_app_store();
    let (open_box, set_open_box) = signal::<Option<String>>(None);

    let boxes = move || store.boxes().with(|b| sorted_boxes(b));

    view! {
        <div class="boxes-view">
            <h2>"Boxes"</h2>
            <Show
                when=move || store.boxes().with(|b| !b.is_empty())
                fallback=|| view! {
                    <p class="empty-state">"No boxes yet. Keep an item to create your first box."</p>
                }
            >
                <ul class="box-grid">
                    <For
                        each=boxes
                        key=|b| (b.id.clone(), b.name.clone(), b.item_count())
                        children=move |b| {
                            let box_id = b.id.clone();
                            let toggle_id = b.id.clone();
                            let is_open = {
                                let id = b.id.clone();
                                move || open_box.with(|open| open.as_deref() == Some(id.as_str()))
                            };
                            let contents = move || {
                                store.items().with(|items| items_in_box(items, &box_id))
                            };
                            view! {
                                <li class=format!("box-card gradient-{}", b.gradient)>
                                    <button
                                        class="box-header"
                                        on:click=move |_| {
                                            let id = toggle_id.clone();
                                            set_open_box.update(|open| {
                                                *open = if open.as_deref() == Some(id.as_str()) { None } else { Some(id) };
                                            });
                                        }
                                    >
                                        <span class="box-name">{b.name.clone()}</span>
                                        <span class="box-count">{b.item_count()} " items"</span>
                                    </button>
                                    <Show when=is_open.clone()>
                                        <ul class="box-items">
                                            <For
                                                each=contents.clone()
                                                key=item_key
                                                children=|item| view! { <ItemRow item=item /> }
                                            />
                                        </ul>
                                    </Show>
                                </li>
                            }
                        }
                    />
                </ul>
            </Show>
        </div>
    }
}
