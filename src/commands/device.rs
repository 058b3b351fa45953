//! Device Commands
//!
//! Share sheet, clipboard, notifications and document theming.

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use declutter_core::notifications::PushPayload;
use super::{js_error, Subscription};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "__DECLUTTER__"], js_name = onPushMessage)]
    fn bridge_on_push_message(callback: &Closure<dyn FnMut(JsValue)>) -> js_sys::Function;
}

fn window() -> Result<web_sys::Window, String> {
    web_sys::window().ok_or_else(|| "No window".to_string())
}

/// How shared text left the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareResult {
    Shared,
    Copied,
}

/// Open the native share sheet, falling back to the clipboard
pub async fn share_text(title: &str, text: &str) -> Result<ShareResult, String> {
    let navigator = window()?.navigator();
    let can_share = js_sys::Reflect::has(&navigator, &JsValue::from_str("share")).unwrap_or(false);
    if can_share {
        let data = web_sys::ShareData::new();
        data.set_title(title);
        data.set_text(text);
        match JsFuture::from(navigator.share_with_data(&data)).await {
            Ok(_) => return Ok(ShareResult::Shared),
            Err(err) => tracing::debug!(error = %js_error(err), "share sheet dismissed, copying instead"),
        }
    }
    copy_text(text).await?;
    Ok(ShareResult::Copied)
}

pub async fn copy_text(text: &str) -> Result<(), String> {
    let clipboard = window()?.navigator().clipboard();
    JsFuture::from(clipboard.write_text(text)).await.map_err(js_error)?;
    Ok(())
}

/// Ask for notification permission. Returns whether it was granted.
pub async fn request_notification_permission() -> Result<bool, String> {
    let promise = web_sys::Notification::request_permission().map_err(js_error)?;
    let result = JsFuture::from(promise).await.map_err(js_error)?;
    Ok(result.as_string().as_deref() == Some("granted"))
}

pub fn notification_permission_granted() -> bool {
    web_sys::Notification::permission() == web_sys::NotificationPermission::Granted
}

/// Show a local notification built from a push payload
pub fn show_notification(payload: &PushPayload) -> Result<(), String> {
    let options = web_sys::NotificationOptions::new();
    options.set_body(&payload.body);
    options.set_icon(&payload.icon);
    options.set_badge(&payload.badge);
    options.set_tag(&payload.tag);
    options.set_require_interaction(payload.require_interaction);
    web_sys::Notification::new_with_options(&payload.title, &options).map_err(js_error)?;
    Ok(())
}

/// Receive push messages the service worker forwards to an open page.
/// Each message is merged over the default reminder. Dropping the handle stops listening.
pub fn listen_for_push<F>(mut on_push: F) -> Subscription
where
    F: FnMut(PushPayload) + 'static,
{
    let callback = Closure::<dyn FnMut(JsValue)>::new(move |raw: JsValue| {
        let text = raw
            .as_string()
            .or_else(|| js_sys::JSON::stringify(&raw).ok().map(String::from))
            .unwrap_or_default();
        on_push(PushPayload::from_push(&text));
    });
    let unsubscribe = bridge_on_push_message(&callback);
    Subscription {
        _callback: callback,
        unsubscribe,
    }
}

/// `light` / `dark`, or remove the attribute to follow the system
pub fn apply_theme(theme: &str) {
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    let _ = match theme {
        "light" | "dark" => root.set_attribute("data-theme", theme),
        _ => root.remove_attribute("data-theme"),
    };
}
