//! Box Picker Sheet
//!
//! Bottom sheet listing the user's boxes, fullest first, with an inline
//! form to start a new box.

use leptos::html::Div;
use leptos::prelude::*;
use leptos::task::spawn_local;

use declutter_core::models::sorted_boxes;

use super::dialog::{focus_first_on_open, make_on_dialog_keydown};
use super::input_value;
use crate::context::use_app;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn BoxPickerSheet(
    on_pick: Callback<String>,
    on_cancel: Callback<()>,
    #[prop(into)] busy: Signal<bool>,
) -> impl IntoView {
    let ctx = use_app();
    let store = use_app_store();

    let boxes = move || store.boxes().with(|b| sorted_boxes(b));
    let (new_name, set_new_name) = signal(String::new());
    let (creating, set_creating) = signal(false);
    let sheet = NodeRef::<Div>::new();
    focus_first_on_open(sheet);

    let on_create = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let name = new_name.get();
        if name.trim().is_empty() || creating.get() {
            return;
        }
        set_creating.set(true);
        spawn_local(async move {
            match ctx.sort_service().create_box(&name).await {
                Ok(box_id) => {
                    set_new_name.set(String::new());
                    on_pick.run(box_id);
                }
                Err(err) => ctx.toast_error(err.user_message()),
            }
            set_creating.set(false);
        });
    };

    view! {
        <div class="sheet-backdrop" on:click=move |_| on_cancel.run(())></div>
        <div
            class="sheet box-picker"
            role="dialog"
            aria-modal="true"
            aria-label="Choose a box"
            node_ref=sheet
            on:keydown=make_on_dialog_keydown(sheet, on_cancel)
        >
            <h2>"Keep in which box?"</h2>
            <ul class="box-list">
                <For
                    each=boxes
                    key=|b| b.id.clone()
                    children=move |b| {
                        let box_id = b.id.clone();
                        let class = format!("box-option gradient-{}", b.gradient);
                        view! {
                            <li>
                                <button
                                    class=class
                                    disabled=move || busy.get()
                                    on:click=move |_| on_pick.run(box_id.clone())
                                >
                                    <span class="box-name">{b.name.clone()}</span>
                                    <span class="box-count">{b.item_count()}</span>
                                </button>
                            </li>
                        }
                    }
                />
            </ul>
            <form class="new-box-form" on:submit=on_create>
                <input
                    type="text"
                    placeholder="New box name"
                    prop:value=move || new_name.get()
                    on:input=move |ev| set_new_name.set(input_value(&ev))
                />
                <button type="submit" disabled=move || creating.get() || busy.get()>"Create"</button>
            </form>
            <button class="link-btn" on:click=move |_| on_cancel.run(())>"Cancel"</button>
        </div>
    }
}
