//! Configuration Error Screen
//!
//! Shown instead of the app when the build has no backend app id.

use leptos::prelude::*;

#[component]
pub fn ConfigError(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="config-error">
            <h1>"Configuration error"</h1>
            <p>{message}</p>
            <p class="hint">"Rebuild with DECLUTTER_APP_ID set to the backend app id."</p>
        </div>
    }
}
