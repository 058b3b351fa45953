//! Swipe Card Component
//!
//! The photo card on top of the sort stack. Drag right to keep, left to
//! discard; arrow keys do the same while the card has focus.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_swipe::{
    make_on_keydown, make_on_pointercancel, make_on_pointerdown, make_on_pointermove, make_on_pointerup, Overlay,
    SwipePhase, SwipeSignals,
};

use declutter_core::models::Item;
use declutter_core::photo::PhotoState;

use crate::context::use_app;

#[component]
pub fn SwipeCard(item: Item, swipe: SwipeSignals) -> impl IntoView {
    let ctx = use_app();
    let photo = RwSignal::new(PhotoState::Loading);
    let photo_url = Memo::new(move |_| photo.with(|p| p.url().map(str::to_string)));

    let file_id = item.photo_path.clone();
    spawn_local(async move {
        let lookup = if file_id.is_empty() {
            Ok(None)
        } else {
            ctx.sort_service().photo_url(&file_id).await
        };
        if let Err(err) = &lookup {
            tracing::warn!(file = %file_id, error = %err, "photo url lookup failed");
        }
        let _ = photo.try_set(PhotoState::from_lookup(&file_id, lookup));
    });

    // Hidden while a destination sheet is open for this card
    let settled = move || swipe.engine.with(|e| matches!(e.phase(), SwipePhase::Settled(_)));
    let overlay_opacity = move || format!("opacity: {};", swipe.progress());

    view! {
        <div
            class="swipe-card"
            class:settled=settled
            class:committing=move || swipe.is_committing()
            tabindex="0"
            style=move || swipe.card_style()
            on:pointerdown=make_on_pointerdown(swipe)
            on:pointermove=make_on_pointermove(swipe)
            on:pointerup=make_on_pointerup(swipe)
            on:pointercancel=make_on_pointercancel(swipe)
            on:keydown=make_on_keydown(swipe)
        >
            {move || match photo_url.get() {
                Some(url) => view! {
                    <img
                        class="swipe-card-photo"
                        class:loading=move || photo.with(|p| p.is_loading())
                        src=url
                        alt=""
                        draggable="false"
                        on:load=move |_| photo.update(|p| p.image_loaded())
                        on:error=move |_| {
                            tracing::warn!("photo failed to load");
                            photo.update(|p| p.image_failed());
                        }
                    />
                }.into_any(),
                None if photo.with(|p| p.is_failed()) => view! {
                    <div class="swipe-card-photo placeholder failed">"Photo unavailable"</div>
                }.into_any(),
                None => view! { <div class="swipe-card-photo placeholder">"📷"</div> }.into_any(),
            }}
            <div class="swipe-card-name">{item.name.clone()}</div>
            {move || swipe.overlay().map(|overlay| {
                let class = match overlay {
                    Overlay::Keep => "swipe-overlay keep",
                    Overlay::Discard => "swipe-overlay discard",
                };
                view! { <div class=class style=overlay_opacity>{overlay.label()}</div> }
            })}
        </div>
    }
}
