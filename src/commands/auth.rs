//! Auth Commands
//!
//! Magic-code sign in. The code exchange itself happens in the bridge.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use declutter_core::models::User;
use super::js_error;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "__DECLUTTER__"], js_name = sendMagicCode, catch)]
    async fn bridge_send_magic_code(args: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["window", "__DECLUTTER__"], js_name = signInWithMagicCode, catch)]
    async fn bridge_sign_in_with_magic_code(args: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["window", "__DECLUTTER__"], js_name = signOut, catch)]
    async fn bridge_sign_out() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["window", "__DECLUTTER__"], js_name = currentUser, catch)]
    async fn bridge_current_user() -> Result<JsValue, JsValue>;
}

#[derive(Serialize)]
struct EmailArgs<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct SignInArgs<'a> {
    email: &'a str,
    code: &'a str,
}

pub async fn send_magic_code(email: &str) -> Result<(), String> {
    let js_args = serde_wasm_bindgen::to_value(&EmailArgs { email }).map_err(|e| e.to_string())?;
    bridge_send_magic_code(js_args).await.map_err(js_error)?;
    Ok(())
}

pub async fn sign_in_with_magic_code(email: &str, code: &str) -> Result<User, String> {
    let js_args = serde_wasm_bindgen::to_value(&SignInArgs { email, code }).map_err(|e| e.to_string())?;
    let result = bridge_sign_in_with_magic_code(js_args).await.map_err(js_error)?;
    serde_wasm_bindgen::from_value(result).map_err(|e| e.to_string())
}

pub async fn sign_out() -> Result<(), String> {
    bridge_sign_out().await.map_err(js_error)?;
    Ok(())
}

/// `None` when nobody is signed in
pub async fn current_user() -> Result<Option<User>, String> {
    let result = bridge_current_user().await.map_err(js_error)?;
    if result.is_null() || result.is_undefined() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(result).map(Some).map_err(|e| e.to_string())
}
