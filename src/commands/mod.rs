//! Backend Bridge Wrappers
//!
//! Frontend bindings to the hosted backend, reached through the JS bridge
//! object `window.__DECLUTTER__`, organized by domain.

mod db;
mod auth;
mod files;
mod compress;
mod device;
mod backend;

use wasm_bindgen::prelude::*;

/// Turn a rejected bridge promise into a display string
fn js_error(err: JsValue) -> String {
    if let Some(msg) = err.as_string() {
        return msg;
    }
    js_sys::Reflect::get(&err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", err))
}

// Re-export all public items
pub use db::*;
pub use auth::*;
pub use files::*;
pub use compress::*;
pub use device::*;
pub use backend::*;
