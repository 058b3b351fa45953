//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. Filled by the
//! live backend subscriptions in `App`.

use leptos::prelude::*;
use reactive_stores::Store;

use declutter_core::models::{Item, StorageBox, UserStats};

/// Synced backend data with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// All items of the signed-in user, newest first
    pub items: Vec<Item>,
    /// All boxes of the signed-in user
    pub boxes: Vec<StorageBox>,
    pub user_stats: UserStats,
    /// Waiting for the first items snapshot
    pub loading: bool,
    /// Last subscription error, if any
    pub sync_error: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Clear everything owned by the previous user
pub fn store_reset(store: &AppStore) {
    store.items().set(Vec::new());
    store.boxes().set(Vec::new());
    store.user_stats().set(UserStats::default());
    store.sync_error().set(None);
    store.loading().set(true);
}
