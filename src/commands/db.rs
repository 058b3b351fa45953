//! Database Commands
//!
//! Transactions, one-shot queries and live subscriptions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::prelude::*;

use declutter_core::tx::{Query, TxOp};
use super::js_error;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "__DECLUTTER__"], js_name = transact, catch)]
    async fn bridge_transact(ops: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["window", "__DECLUTTER__"], js_name = queryOnce, catch)]
    async fn bridge_query_once(query: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["window", "__DECLUTTER__"], js_name = subscribeQuery)]
    fn bridge_subscribe_query(query: JsValue, callback: &Closure<dyn FnMut(JsValue)>) -> js_sys::Function;
}

/// Serialize maps as plain objects, not ES2015 `Map`s
pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue, String> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| e.to_string())
}

#[derive(Debug, Clone, Deserialize)]
struct QueryError {
    message: String,
}

/// Payload delivered to subscription callbacks
#[derive(Debug, Clone, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<QueryError>,
}

// ========================
// Commands
// ========================

pub async fn transact(ops: &[TxOp]) -> Result<(), String> {
    let js_ops = to_js(&ops)?;
    bridge_transact(js_ops).await.map_err(js_error)?;
    Ok(())
}

/// Response data keyed by namespace
pub async fn query_once(query: &Query) -> Result<Value, String> {
    let js_query = to_js(&query.to_json())?;
    let result = bridge_query_once(js_query).await.map_err(js_error)?;
    serde_wasm_bindgen::from_value(result).map_err(|e| e.to_string())
}

/// Live query. Dropping the handle unsubscribes.
pub struct Subscription {
    pub(super) _callback: Closure<dyn FnMut(JsValue)>,
    pub(super) unsubscribe: js_sys::Function,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let _ = self.unsubscribe.call0(&JsValue::NULL);
    }
}

/// Subscribe to `query`; `on_data` receives every snapshot or the error message
pub fn subscribe_query<F>(query: &Query, mut on_data: F) -> Result<Subscription, String>
where
    F: FnMut(Result<Value, String>) + 'static,
{
    let js_query = to_js(&query.to_json())?;
    let callback = Closure::<dyn FnMut(JsValue)>::new(move |resp: JsValue| {
        let parsed = serde_wasm_bindgen::from_value::<QueryResponse>(resp).map_err(|e| e.to_string());
        match parsed {
            Ok(QueryResponse { error: Some(err), .. }) => on_data(Err(err.message)),
            Ok(QueryResponse { data, .. }) => on_data(Ok(data.unwrap_or(Value::Null))),
            Err(err) => on_data(Err(err)),
        }
    });
    let unsubscribe = bridge_subscribe_query(js_query, &callback);
    Ok(Subscription {
        _callback: callback,
        unsubscribe,
    })
}
