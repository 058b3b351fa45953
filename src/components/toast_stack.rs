//! Toast Stack Component
//!
//! Renders the session's toasts; each can be dismissed early by tapping.

use leptos::prelude::*;

use declutter_core::toast::ToastKind;

use crate::context::use_app;

fn toast_class(kind: ToastKind) -> &'static str {
    match kind {
        ToastKind::Success => "toast toast-success",
        ToastKind::Error => "toast toast-error",
        ToastKind::Info => "toast toast-info",
    }
}

#[component]
pub fn ToastStack() -> impl IntoView {
    let ctx = use_app();

    view! {
        <div class="toast-stack" role="status" aria-live="polite">
            <For
                each=move || ctx.session.with(|s| s.toasts.items().to_vec())
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div
                            class=toast_class(toast.kind)
                            on:click=move |_| ctx.session.update(|s| s.toasts.remove(id))
                        >
                            {toast.message}
                        </div>
                    }
                }
            />
        </div>
    }
}
