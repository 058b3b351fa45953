//! Sign In Component
//!
//! Two-step magic-code sign in: request a code by email, then enter it.

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::input_value;
use crate::commands;
use crate::context::use_app;

#[component]
pub fn SignIn() -> impl IntoView {
    let ctx = use_app();

    let (email, set_email) = signal(String::new());
    let (code, set_code) = signal(String::new());
    let (code_sent, set_code_sent) = signal(false);
    let (busy, set_busy) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);

    let send_code = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let address = email.get().trim().to_string();
        if address.is_empty() {
            return;
        }
        set_busy.set(true);
        set_error.set(None);
        spawn_local(async move {
            match commands::send_magic_code(&address).await {
                Ok(()) => set_code_sent.set(true),
                Err(err) => set_error.set(Some(err)),
            }
            set_busy.set(false);
        });
    };

    let verify_code = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let address = email.get().trim().to_string();
        let entered = code.get().trim().to_string();
        if entered.is_empty() {
            return;
        }
        set_busy.set(true);
        set_error.set(None);
        spawn_local(async move {
            match commands::sign_in_with_magic_code(&address, &entered).await {
                Ok(user) => {
                    tracing::info!(user = %user.id, "signed in");
                    ctx.user.set(Some(user));
                }
                Err(err) => set_error.set(Some(err)),
            }
            set_busy.set(false);
        });
    };

    view! {
        <div class="sign-in">
            <h1>"SuperSwiper"</h1>
            <p class="tagline">"Swipe your way to a tidier home."</p>

            <Show
                when=move || code_sent.get()
                fallback=move || view! {
                    <form class="sign-in-form" on:submit=send_code>
                        <input
                            type="email"
                            placeholder="you@example.com"
                            prop:value=move || email.get()
                            on:input=move |ev| set_email.set(input_value(&ev))
                        />
                        <button type="submit" disabled=move || busy.get()>"Send code"</button>
                    </form>
                }
            >
                <form class="sign-in-form" on:submit=verify_code>
                    <p>"We sent a code to " {move || email.get()}</p>
                    <input
                        type="text"
                        inputmode="numeric"
                        placeholder="123456"
                        prop:value=move || code.get()
                        on:input=move |ev| set_code.set(input_value(&ev))
                    />
                    <button type="submit" disabled=move || busy.get()>"Sign in"</button>
                    <button type="button" class="link-btn" on:click=move |_| {
                        set_code_sent.set(false);
                        set_code.set(String::new());
                    }>
                        "Use another email"
                    </button>
                </form>
            </Show>

            {move || error.get().map(|msg| view! { <p class="error">{msg}</p> })}
        </div>
    }
}
