//! Sort View Component
//!
//! The main screen: a stack of unsorted items, one swipe card at a time.
//! A committed swipe opens the box picker (right) or the discard sheet
//! (left); picking a destination writes the sort and shows the next card.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_swipe::{use_swipe, SwipeConfig, SwipeDirection};

use declutter_core::models::{items_with_status, DiscardCategory, Item, ItemStatus};
use declutter_core::sorting::Destination;
use declutter_core::undo::SortRecord;

use super::{BoxPickerSheet, DiscardSheet, SwipeCard, UploadPanel};
use crate::context::use_app;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn SortView() -> impl IntoView {
    let ctx = use_app();
    let store = use_app_store();

    let unsorted = Memo::new(move |_| store.items().with(|items| items_with_status(items, ItemStatus::Unsorted)));
    let top = Memo::new(move |_| unsorted.with(|items| items.first().cloned()));
    let remaining = move || unsorted.with(|items| items.len());

    // Sheet opened by the last committed swipe
    let (sheet, set_sheet) = signal::<Option<SwipeDirection>>(None);
    let (busy, set_busy) = signal(false);

    let swipe = use_swipe(
        SwipeConfig::default(),
        Callback::new(move |dir: SwipeDirection| set_sheet.set(Some(dir))),
    );

    let close_sheet = move || {
        set_sheet.set(None);
        swipe.reset();
    };

    let apply_sort = move |item: Item, destination: Destination| {
        set_busy.set(true);
        spawn_local(async move {
            let service = ctx.sort_service();
            let (result, new_status, new_box_id) = match &destination {
                Destination::Box(box_id) => {
                    (service.keep_item(&item.id, box_id).await, ItemStatus::Kept, Some(box_id.clone()))
                }
                Destination::Discard(category) => {
                    (service.discard_item(&item.id, *category).await, category.status(), None)
                }
            };
            match result {
                Ok(items_sorted) => {
                    let record = SortRecord {
                        item_id: item.id.clone(),
                        item_name: item.name.clone(),
                        previous_status: item.status,
                        previous_box_id: item.box_id().map(str::to_string),
                        new_status,
                        new_box_id,
                        streak_before: 0,
                    };
                    ctx.record_sort(record, items_sorted);
                }
                Err(err) => {
                    tracing::error!(item = %item.id, error = %err, "sort failed");
                    ctx.toast_error(err.user_message());
                }
            }
            set_busy.set(false);
            close_sheet();
        });
    };

    let on_box_pick = Callback::new(move |box_id: String| {
        if let Some(item) = top.get_untracked() {
            apply_sort(item, Destination::Box(box_id));
        }
    });
    let on_discard_pick = Callback::new(move |category: DiscardCategory| {
        if let Some(item) = top.get_untracked() {
            apply_sort(item, Destination::Discard(category));
        }
    });
    let on_cancel = Callback::new(move |_: ()| close_sheet());

    let controls_disabled = move || top.with(|t| t.is_none()) || sheet.get().is_some() || busy.get();

    view! {
        <div class="sort-view">
            <UploadPanel />

            {move || store.sync_error().get().map(|msg| view! { <p class="error sync-error">{msg}</p> })}

            <div class="card-stack">
                {move || {
                    if store.loading().get() {
                        return view! { <div class="empty-state">"Loading your items..."</div> }.into_any();
                    }
                    match top.get() {
                        Some(item) => view! { <SwipeCard item=item swipe=swipe /> }.into_any(),
                        None => view! {
                            <div class="empty-state">
                                <p class="empty-icon">"✨"</p>
                                <p>"All sorted! Add more photos to keep going."</p>
                            </div>
                        }
                        .into_any(),
                    }
                }}
            </div>

            <Show when=move || top.with(|t| t.is_some())>
                <p class="remaining">{remaining} " left to sort"</p>
            </Show>

            <div class="sort-controls">
                <button
                    class="sort-btn discard"
                    title="Discard"
                    disabled=controls_disabled
                    on:click=move |_| swipe.trigger(SwipeDirection::Left)
                >
                    "✕"
                </button>
                <button
                    class="sort-btn undo"
                    title="Undo"
                    disabled=move || !ctx.session.with(|s| s.undo.can_undo())
                    on:click=move |_| ctx.undo_last()
                >
                    "↩"
                </button>
                <button
                    class="sort-btn keep"
                    title="Keep"
                    disabled=controls_disabled
                    on:click=move |_| swipe.trigger(SwipeDirection::Right)
                >
                    "✓"
                </button>
            </div>

            {move || match sheet.get() {
                Some(SwipeDirection::Right) => {
                    view! { <BoxPickerSheet on_pick=on_box_pick on_cancel=on_cancel busy=busy /> }.into_any()
                }
                Some(SwipeDirection::Left) => {
                    view! { <DiscardSheet on_pick=on_discard_pick on_cancel=on_cancel busy=busy /> }.into_any()
                }
                None => ().into_any(),
            }}
        </div>
    }
}
