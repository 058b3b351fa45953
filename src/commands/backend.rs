//! Bridge-backed Backend
//!
//! Implements the core crate's backend seams on top of the bridge commands.

use async_trait::async_trait;
use serde_json::Value;

use declutter_core::backend::Backend;
use declutter_core::error::{DomainError, DomainResult};
use declutter_core::tx::{Query, TxOp};
use declutter_core::upload::FileStore;

/// The hosted backend as seen through `window.__DECLUTTER__`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsBackend;

#[async_trait(?Send)]
impl Backend for JsBackend {
    async fn transact(&self, ops: Vec<TxOp>) -> DomainResult<()> {
        super::transact(&ops).await.map_err(DomainError::Backend)
    }

    async fn query_once(&self, query: &Query) -> DomainResult<Value> {
        super::query_once(query).await.map_err(DomainError::Backend)
    }
}

#[async_trait(?Send)]
impl FileStore for JsBackend {
    async fn upload_file(&self, name: &str, bytes: Vec<u8>) -> DomainResult<String> {
        super::upload_file(name, &bytes).await.map_err(DomainError::Backend)
    }
}
