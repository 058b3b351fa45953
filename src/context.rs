//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;
use leptos::task::spawn_local;

use declutter_core::config::Preferences;
use declutter_core::models::User;
use declutter_core::session::{Session, SortOutcome};
use declutter_core::sorting::SortService;
use declutter_core::storage::KeyValueStore;
use declutter_core::toast::{ToastKind, TOAST_DURATION_MS};
use declutter_core::undo::SortRecord;
use declutter_core::upload::{process_pending, QueueCell, UploadFile, UploadQueue};

use crate::commands::{BrowserCompressor, JsBackend};
use crate::storage::BrowserStorage;

/// How long the confetti and milestone bursts stay on screen
const CELEBRATION_MS: u32 = 2500;

/// Item name given to freshly uploaded photos
const DEFAULT_ITEM_NAME: &str = "Item";

/// Upload queue held in a signal; every mutation publishes a new snapshot
#[derive(Clone, Copy)]
pub struct QueueSignal(pub RwSignal<UploadQueue>);

impl QueueCell for QueueSignal {
    fn snapshot(&self) -> UploadQueue {
        self.0.get_untracked()
    }

    fn replace(&self, queue: UploadQueue) {
        self.0.set(queue);
    }
}

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Signed-in user, `None` while signed out
    pub user: RwSignal<Option<User>>,
    /// Streak, XP, undo history, achievements and toasts
    pub session: RwSignal<Session>,
    pub queue: RwSignal<UploadQueue>,
    /// True while the queue driver is running
    pub processing: RwSignal<bool>,
    pub prefs: RwSignal<Preferences>,
    storage: StoredValue<BrowserStorage, LocalStorage>,
}

impl AppContext {
    pub fn new() -> Self {
        let storage = BrowserStorage::open();
        let session = Session::load(&storage);
        let prefs = Preferences::load(&storage);
        Self {
            user: RwSignal::new(None),
            session: RwSignal::new(session),
            queue: RwSignal::new(UploadQueue::new()),
            processing: RwSignal::new(false),
            prefs: RwSignal::new(prefs),
            storage: StoredValue::new_local(storage),
        }
    }

    pub fn with_storage<R>(&self, f: impl FnOnce(&dyn KeyValueStore) -> R) -> R {
        self.storage.with_value(|s| f(s))
    }

    pub fn user_id(&self) -> Option<String> {
        self.user.with_untracked(|u| u.as_ref().map(|u| u.id.clone()))
    }

    /// Writes on behalf of the current user
    pub fn sort_service(&self) -> SortService<'static, JsBackend> {
        SortService::new(&JsBackend, self.user_id())
    }

    // ========================
    // Toasts
    // ========================

    /// Show a toast and schedule its removal
    pub fn toast(&self, kind: ToastKind, message: impl Into<String>) {
        let message = message.into();
        let Some(id) = self.session.try_update(|s| s.toasts.add(message, kind)) else {
            return;
        };
        self.schedule_toast_removal(id);
    }

    fn schedule_toast_removal(&self, id: u64) {
        let session = self.session;
        gloo_timers::callback::Timeout::new(TOAST_DURATION_MS, move || {
            session.try_update(|s| s.toasts.remove(id));
        })
        .forget();
    }

    pub fn toast_error(&self, message: impl Into<String>) {
        self.toast(ToastKind::Error, message);
    }

    /// Toasts the session itself raised are scheduled for removal too
    fn expire_session_toasts(&self, before: u64) {
        let fresh: Vec<u64> = self.session.with_untracked(|s| {
            s.toasts.items().iter().map(|t| t.id).filter(|id| *id > before).collect()
        });
        for id in fresh {
            self.schedule_toast_removal(id);
        }
    }

    fn last_toast_id(&self) -> u64 {
        self.session
            .with_untracked(|s| s.toasts.items().last().map(|t| t.id).unwrap_or(0))
    }

    // ========================
    // Session bookkeeping
    // ========================

    /// Count a sort the backend accepted and feed the new sorted count
    pub fn record_sort(&self, record: SortRecord, items_sorted: u32) -> SortOutcome {
        let before = self.last_toast_id();
        let outcome = self
            .storage
            .with_value(|store| {
                self.session.try_update(|s| {
                    let outcome = s.record_sort(record, store);
                    s.items_sorted_changed(items_sorted, store);
                    outcome
                })
            })
            .unwrap_or_default();
        self.expire_session_toasts(before);
        if outcome.confetti || outcome.milestone {
            self.schedule_celebration_reset();
        }
        outcome
    }

    fn schedule_celebration_reset(&self) {
        let session = self.session;
        gloo_timers::callback::Timeout::new(CELEBRATION_MS, move || {
            session.try_update(|s| {
                s.streak.clear_confetti_trigger();
                s.xp.clear_milestone_trigger();
                s.xp.clear_last_earned();
            });
        })
        .forget();
    }

    /// Revert the newest sort on the backend, then in the session
    pub fn undo_last(&self) {
        let Some(action) = self.session.try_update(|s| s.begin_undo()).flatten() else {
            return;
        };
        let ctx = *self;
        spawn_local(async move {
            let before = ctx.last_toast_id();
            match ctx.sort_service().undo_sort(&action).await {
                Ok(()) => ctx.session.update(|s| s.confirm_undo(&action)),
                Err(err) => ctx.session.update(|s| s.undo_failed(action, &err)),
            }
            ctx.expire_session_toasts(before);
        });
    }

    pub fn save_prefs(&self, prefs: Preferences) {
        self.with_storage(|store| prefs.save(store));
        self.prefs.set(prefs);
    }

    // ========================
    // Upload queue
    // ========================

    pub fn enqueue_uploads(&self, files: Vec<UploadFile>) {
        if files.is_empty() {
            return;
        }
        self.queue.update(|q| {
            q.enqueue(files);
        });
        self.process_uploads();
    }

    pub fn retry_failed_uploads(&self) {
        if self.queue.try_update(|q| q.retry_failed()).unwrap_or(0) > 0 {
            self.process_uploads();
        }
    }

    /// Drive the queue serially; uploaded photos become unsorted items
    pub fn process_uploads(&self) {
        if self.processing.get_untracked() {
            return;
        }
        self.processing.set(true);
        let ctx = *self;
        spawn_local(async move {
            let cell = QueueSignal(ctx.queue);
            let drained = process_pending(&cell, &BrowserCompressor, &JsBackend, |_, file_id| async move {
                if let Err(err) = ctx.sort_service().create_item(&file_id, DEFAULT_ITEM_NAME).await {
                    tracing::error!(error = %err, "failed to create item for upload");
                    ctx.toast_error(err.user_message());
                }
            })
            .await;
            if let Err(err) = drained {
                tracing::warn!(error = %err, "upload queue stopped");
            }
            ctx.processing.set(false);
        });
    }
}

/// Get the app context
pub fn use_app() -> AppContext {
    expect_context::<AppContext>()
}
