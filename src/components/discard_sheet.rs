//! Discard Sheet
//!
//! Bottom sheet for choosing where a discarded item goes.

use leptos::html::Div;
use leptos::prelude::*;

use declutter_core::models::DiscardCategory;

use super::dialog::{focus_first_on_open, make_on_dialog_keydown};

#[component]
pub fn DiscardSheet(
    on_pick: Callback<DiscardCategory>,
    on_cancel: Callback<()>,
    #[prop(into)] busy: Signal<bool>,
) -> impl IntoView {
    let sheet = NodeRef::<Div>::new();
    focus_first_on_open(sheet);

    view! {
        <div class="sheet-backdrop" on:click=move |_| on_cancel.run(())></div>
        <div
            class="sheet discard-picker"
            role="dialog"
            aria-modal="true"
            aria-label="Choose a pile"
            node_ref=sheet
            on:keydown=make_on_dialog_keydown(sheet, on_cancel)
        >
            <h2>"Let it go to..."</h2>
            <div class="discard-options">
                {DiscardCategory::ALL.into_iter().map(|category| {
                    let class = format!("discard-option {}", category.status().as_str());
                    view! {
                        <button
                            class=class
                            disabled=move || busy.get()
                            on:click=move |_| on_pick.run(category)
                        >
                            <span class="discard-icon">{category.icon()}</span>
                            <span class="discard-label">{category.label()}</span>
                        </button>
                    }
                }).collect_view()}
            </div>
            <button class="link-btn" on:click=move |_| on_cancel.run(())>"Cancel"</button>
        </div>
    }
}
