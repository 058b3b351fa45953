//! Upload Queue
//!
//! Files wait in submission order and are processed one at a time:
//! `pending -> compressing -> uploading -> success | failed`.
//!
//! The queue never advances on its own; a driver calls
//! [`process_queue_item`] or [`process_pending`]. The item list lives behind
//! an `Arc` that is replaced on every mutation, so a snapshot handed to the
//! UI never changes under it.

use std::cell::RefCell;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::compression::Compressor;
use crate::error::{DomainError, DomainResult};

/// Stable identity of a queue entry
pub type UploadId = u64;

/// Longest file name shown before truncation
const MAX_DISPLAY_NAME: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Pending,
    Compressing,
    Uploading,
    Success,
    Failed,
}

impl UploadStatus {
    /// Label shown next to a queue entry
    pub fn label(&self) -> &'static str {
        match self {
            UploadStatus::Pending => "Waiting",
            UploadStatus::Compressing => "Compressing",
            UploadStatus::Uploading => "Uploading",
            UploadStatus::Success => "Done",
            UploadStatus::Failed => "Failed",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, UploadStatus::Compressing | UploadStatus::Uploading)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, UploadStatus::Success | UploadStatus::Failed)
    }
}

/// A file picked by the user, already read into memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    name: String,
    mime_type: String,
    bytes: Arc<Vec<u8>>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: Arc::new(bytes),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Name shortened to fit the progress list, keeping the extension
    pub fn display_name(&self) -> String {
        truncate_file_name(&self.name, MAX_DISPLAY_NAME)
    }
}

/// One file's progress through compression and upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadItem {
    pub id: UploadId,
    pub file: UploadFile,
    pub status: UploadStatus,
    pub error: Option<String>,
    /// Storage id returned by the backend on success
    pub file_id: Option<String>,
}

/// Final counts of a [`process_pending`] run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Upload stage of the pipeline
#[async_trait(?Send)]
pub trait FileStore {
    /// Store `bytes` under `name`, returning the durable file id
    async fn upload_file(&self, name: &str, bytes: Vec<u8>) -> DomainResult<String>;
}

/// Ordered upload queue with copy-on-write item storage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadQueue {
    items: Arc<Vec<UploadItem>>,
    next_id: UploadId,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consistent snapshot of the entries
    pub fn items(&self) -> Arc<Vec<UploadItem>> {
        Arc::clone(&self.items)
    }

    pub fn get(&self, id: UploadId) -> Option<&UploadItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn count(&self, status: UploadStatus) -> usize {
        self.items.iter().filter(|i| i.status == status).count()
    }

    pub fn has_failed(&self) -> bool {
        self.count(UploadStatus::Failed) > 0
    }

    /// The entry currently compressing or uploading, if any
    pub fn active(&self) -> Option<&UploadItem> {
        self.items.iter().find(|i| i.status.is_active())
    }

    pub fn next_pending(&self) -> Option<UploadId> {
        self.items
            .iter()
            .find(|i| i.status == UploadStatus::Pending)
            .map(|i| i.id)
    }

    /// Append files as pending entries, preserving submission order
    pub fn enqueue(&mut self, files: Vec<UploadFile>) -> Vec<UploadId> {
        let mut items = self.items.as_ref().clone();
        let mut ids = Vec::with_capacity(files.len());
        for file in files {
            self.next_id += 1;
            ids.push(self.next_id);
            items.push(UploadItem {
                id: self.next_id,
                file,
                status: UploadStatus::Pending,
                error: None,
                file_id: None,
            });
        }
        self.items = Arc::new(items);
        ids
    }

    /// `pending -> compressing`. Only one entry may be active at a time.
    pub fn start_compressing(&mut self, id: UploadId) -> DomainResult<UploadFile> {
        if let Some(active) = self.active() {
            if active.id != id {
                return Err(DomainError::Conflict(format!(
                    "upload {} is still {}",
                    active.id,
                    active.status.label().to_lowercase()
                )));
            }
        }
        let item = self
            .get(id)
            .ok_or_else(|| DomainError::NotFound(format!("upload {}", id)))?;
        if item.status != UploadStatus::Pending {
            return Err(DomainError::Conflict(format!(
                "upload {} is {}, not pending",
                id,
                item.status.label().to_lowercase()
            )));
        }
        let file = item.file.clone();
        self.replace(id, |item| item.status = UploadStatus::Compressing);
        Ok(file)
    }

    /// `compressing -> uploading`
    pub fn start_uploading(&mut self, id: UploadId) {
        self.replace(id, |item| {
            if item.status == UploadStatus::Compressing {
                item.status = UploadStatus::Uploading;
            }
        });
    }

    pub fn mark_success(&mut self, id: UploadId, file_id: String) {
        self.replace(id, |item| {
            item.status = UploadStatus::Success;
            item.error = None;
            item.file_id = Some(file_id);
        });
    }

    pub fn mark_failed(&mut self, id: UploadId, error: String) {
        self.replace(id, |item| {
            item.status = UploadStatus::Failed;
            item.error = Some(error);
        });
    }

    /// Move every failed entry back to pending with its error cleared.
    /// Returns how many were reset.
    pub fn retry_failed(&mut self) -> usize {
        let failed = self.count(UploadStatus::Failed);
        if failed == 0 {
            return 0;
        }
        let items = self
            .items
            .iter()
            .cloned()
            .map(|mut item| {
                if item.status == UploadStatus::Failed {
                    item.status = UploadStatus::Pending;
                    item.error = None;
                }
                item
            })
            .collect();
        self.items = Arc::new(items);
        failed
    }

    /// Drop successful entries, keeping everything else in order
    pub fn clear_completed(&mut self) {
        let items = self
            .items
            .iter()
            .filter(|i| i.status != UploadStatus::Success)
            .cloned()
            .collect();
        self.items = Arc::new(items);
    }

    pub fn clear_queue(&mut self) {
        self.items = Arc::new(Vec::new());
    }

    fn replace(&mut self, id: UploadId, f: impl FnOnce(&mut UploadItem)) {
        let mut items = self.items.as_ref().clone();
        if let Some(item) = items.iter_mut().find(|i| i.id == id) {
            f(item);
        }
        self.items = Arc::new(items);
    }
}

// ========================
// Queue Processing
// ========================

/// Shared home of the queue while a processor is suspended.
///
/// Readers take snapshots; writers replace the whole queue.
pub trait QueueCell {
    fn snapshot(&self) -> UploadQueue;
    fn replace(&self, queue: UploadQueue);

    fn mutate<R>(&self, f: impl FnOnce(&mut UploadQueue) -> R) -> R {
        let mut queue = self.snapshot();
        let result = f(&mut queue);
        self.replace(queue);
        result
    }
}

impl QueueCell for RefCell<UploadQueue> {
    fn snapshot(&self) -> UploadQueue {
        self.borrow().clone()
    }

    fn replace(&self, queue: UploadQueue) {
        *self.borrow_mut() = queue;
    }
}

/// Random storage name for a compressed photo
pub fn upload_file_name() -> String {
    format!("{}.jpg", uuid::Uuid::new_v4())
}

/// Run one entry through compression and upload.
///
/// A failure at either stage settles the entry as failed with the error
/// message; other entries are untouched. Returns the final status, or an
/// error when the entry could not be started at all.
pub async fn process_queue_item<Q, C, S>(
    queue: &Q,
    id: UploadId,
    compressor: &C,
    store: &S,
) -> DomainResult<UploadStatus>
where
    Q: QueueCell + ?Sized,
    C: Compressor + ?Sized,
    S: FileStore + ?Sized,
{
    let file = queue.mutate(|q| q.start_compressing(id))?;
    info!(upload = id, name = file.name(), "compressing");

    let compressed = match compressor.compress(&file).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(upload = id, error = %err, "compression failed");
            queue.mutate(|q| q.mark_failed(id, err.user_message()));
            return Ok(UploadStatus::Failed);
        }
    };

    queue.mutate(|q| q.start_uploading(id));
    let name = upload_file_name();

    match store.upload_file(&name, compressed).await {
        Ok(file_id) => {
            info!(upload = id, file_id = %file_id, "uploaded");
            queue.mutate(|q| q.mark_success(id, file_id));
            Ok(UploadStatus::Success)
        }
        Err(err) => {
            warn!(upload = id, error = %err, "upload failed");
            queue.mutate(|q| q.mark_failed(id, err.user_message()));
            Ok(UploadStatus::Failed)
        }
    }
}

/// Serially process pending entries until none are left.
///
/// `on_uploaded` runs with the entry id and storage file id after each
/// successful upload, before the next entry starts.
pub async fn process_pending<Q, C, S, F, Fut>(
    queue: &Q,
    compressor: &C,
    store: &S,
    mut on_uploaded: F,
) -> DomainResult<ProcessSummary>
where
    Q: QueueCell + ?Sized,
    C: Compressor + ?Sized,
    S: FileStore + ?Sized,
    F: FnMut(UploadId, String) -> Fut,
    Fut: Future<Output = ()>,
{
    let mut summary = ProcessSummary::default();
    while let Some(id) = queue.snapshot().next_pending() {
        match process_queue_item(queue, id, compressor, store).await? {
            UploadStatus::Success => {
                summary.succeeded += 1;
                let file_id = queue.snapshot().get(id).and_then(|i| i.file_id.clone());
                if let Some(file_id) = file_id {
                    on_uploaded(id, file_id).await;
                }
            }
            _ => summary.failed += 1,
        }
    }
    info!(succeeded = summary.succeeded, failed = summary.failed, "upload queue drained");
    Ok(summary)
}

/// Shorten `name` to at most `max` characters, keeping its extension
pub fn truncate_file_name(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        return name.to_string();
    }
    let ext = match name.rfind('.') {
        Some(pos) if pos > 0 => &name[pos..],
        _ => "",
    };
    let keep = max.saturating_sub(ext.chars().count() + 3).max(1);
    let stem: String = name.chars().take(keep).collect();
    format!("{}...{}", stem, ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct PassThrough;

    #[async_trait(?Send)]
    impl Compressor for PassThrough {
        async fn compress(&self, file: &UploadFile) -> DomainResult<Vec<u8>> {
            if file.name().starts_with("corrupt") {
                return Err(DomainError::InvalidInput("cannot decode".to_string()));
            }
            Ok(file.bytes().to_vec())
        }
    }

    /// Records the queue state seen at upload time
    struct RecordingStore<'a> {
        queue: &'a RefCell<UploadQueue>,
        seen: RefCell<Vec<UploadStatus>>,
        fail: bool,
    }

    #[async_trait(?Send)]
    impl<'a> FileStore for RecordingStore<'a> {
        async fn upload_file(&self, name: &str, _bytes: Vec<u8>) -> DomainResult<String> {
            if let Some(active) = self.queue.borrow().active() {
                self.seen.borrow_mut().push(active.status);
            }
            if self.fail {
                return Err(DomainError::Backend("Network error".to_string()));
            }
            Ok(format!("file-{}", name))
        }
    }

    fn file(name: &str) -> UploadFile {
        UploadFile::new(name, "image/jpeg", vec![1, 2, 3])
    }

    fn store_for(queue: &RefCell<UploadQueue>, fail: bool) -> RecordingStore<'_> {
        RecordingStore { queue, seen: RefCell::new(Vec::new()), fail }
    }

    #[test]
    fn test_enqueue_preserves_order_as_pending() {
        let mut queue = UploadQueue::new();
        let ids = queue.enqueue(vec![file("a.jpg"), file("b.jpg")]);

        let items = queue.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].file.name(), "a.jpg");
        assert_eq!(items[1].file.name(), "b.jpg");
        assert!(items.iter().all(|i| i.status == UploadStatus::Pending));
        assert_eq!(ids, vec![items[0].id, items[1].id]);
    }

    #[test]
    fn test_snapshot_is_not_mutated() {
        let mut queue = UploadQueue::new();
        let ids = queue.enqueue(vec![file("a.jpg")]);
        let before = queue.items();

        queue.start_compressing(ids[0]).unwrap();

        assert_eq!(before[0].status, UploadStatus::Pending);
        assert_eq!(queue.items()[0].status, UploadStatus::Compressing);
    }

    #[test]
    fn test_only_one_active_item() {
        let mut queue = UploadQueue::new();
        let ids = queue.enqueue(vec![file("a.jpg"), file("b.jpg")]);

        queue.start_compressing(ids[0]).unwrap();
        let err = queue.start_compressing(ids[1]).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(queue.get(ids[1]).unwrap().status, UploadStatus::Pending);
    }

    #[tokio::test]
    async fn test_process_success_walks_every_stage() {
        let queue = RefCell::new(UploadQueue::new());
        let ids = queue.borrow_mut().enqueue(vec![file("a.jpg"), file("b.jpg")]);
        let store = store_for(&queue, false);

        let status = process_queue_item(&queue, ids[0], &PassThrough, &store).await.unwrap();

        assert_eq!(status, UploadStatus::Success);
        assert_eq!(*store.seen.borrow(), vec![UploadStatus::Uploading]);
        let q = queue.borrow();
        let done = q.get(ids[0]).unwrap();
        assert_eq!(done.status, UploadStatus::Success);
        assert!(done.file_id.as_deref().unwrap().ends_with(".jpg"));
        assert_eq!(q.get(ids[1]).unwrap().status, UploadStatus::Pending);
    }

    #[tokio::test]
    async fn test_upload_failure_captures_message() {
        let queue = RefCell::new(UploadQueue::new());
        let ids = queue.borrow_mut().enqueue(vec![file("a.jpg"), file("b.jpg")]);
        let store = store_for(&queue, true);

        let status = process_queue_item(&queue, ids[0], &PassThrough, &store).await.unwrap();

        assert_eq!(status, UploadStatus::Failed);
        let q = queue.borrow();
        assert_eq!(q.get(ids[0]).unwrap().error.as_deref(), Some("Network error"));
        assert_eq!(q.get(ids[1]).unwrap().status, UploadStatus::Pending);
        assert!(q.active().is_none());
    }

    #[tokio::test]
    async fn test_compression_failure_skips_upload() {
        let queue = RefCell::new(UploadQueue::new());
        let ids = queue.borrow_mut().enqueue(vec![file("corrupt.jpg")]);
        let store = store_for(&queue, false);

        let status = process_queue_item(&queue, ids[0], &PassThrough, &store).await.unwrap();

        assert_eq!(status, UploadStatus::Failed);
        assert!(store.seen.borrow().is_empty());
        let q = queue.borrow();
        assert_eq!(q.get(ids[0]).unwrap().error.as_deref(), Some("Invalid input: cannot decode"));
    }

    #[tokio::test]
    async fn test_process_pending_is_serial() {
        let queue = RefCell::new(UploadQueue::new());
        queue.borrow_mut().enqueue(vec![file("a.jpg"), file("corrupt.jpg"), file("c.jpg")]);
        let store = store_for(&queue, false);

        let uploaded = RefCell::new(Vec::new());

        let summary = process_pending(&queue, &PassThrough, &store, |id, file_id| {
            uploaded.borrow_mut().push((id, file_id));
            async {}
        })
        .await
        .unwrap();

        assert_eq!(summary, ProcessSummary { succeeded: 2, failed: 1 });
        // Every upload saw exactly one active entry
        assert_eq!(store.seen.borrow().len(), 2);
        assert_eq!(queue.borrow().next_pending(), None);
        assert_eq!(uploaded.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_hook_runs_before_next_entry_starts() {
        let queue = RefCell::new(UploadQueue::new());
        let ids = queue.borrow_mut().enqueue(vec![file("a.jpg"), file("b.jpg")]);
        let store = store_for(&queue, false);
        let next_status = RefCell::new(Vec::new());

        process_pending(&queue, &PassThrough, &store, |id, file_id| {
            assert!(file_id.starts_with("file-"));
            let other = if id == ids[0] { ids[1] } else { ids[0] };
            next_status.borrow_mut().push(queue.borrow().get(other).map(|i| i.status));
            async {}
        })
        .await
        .unwrap();

        assert_eq!(
            *next_status.borrow(),
            vec![Some(UploadStatus::Pending), Some(UploadStatus::Success)]
        );
    }

    #[test]
    fn test_retry_failed_only_touches_failed() {
        let mut queue = UploadQueue::new();
        let ids = queue.enqueue(vec![file("a.jpg"), file("b.jpg"), file("c.jpg")]);
        queue.mark_success(ids[0], "f1".to_string());
        queue.mark_failed(ids[1], "boom".to_string());

        assert_eq!(queue.retry_failed(), 1);

        assert_eq!(queue.get(ids[0]).unwrap().status, UploadStatus::Success);
        let retried = queue.get(ids[1]).unwrap();
        assert_eq!(retried.status, UploadStatus::Pending);
        assert_eq!(retried.error, None);
        assert_eq!(retried.id, ids[1]);
        assert_eq!(queue.get(ids[2]).unwrap().status, UploadStatus::Pending);
        assert_eq!(queue.retry_failed(), 0);
    }

    #[test]
    fn test_clear_completed_and_clear_queue() {
        let mut queue = UploadQueue::new();
        let ids = queue.enqueue(vec![file("a.jpg"), file("b.jpg"), file("c.jpg")]);
        queue.mark_success(ids[0], "f1".to_string());
        queue.mark_failed(ids[2], "boom".to_string());

        queue.clear_completed();
        let remaining: Vec<_> = queue.items().iter().map(|i| i.id).collect();
        assert_eq!(remaining, vec![ids[1], ids[2]]);

        queue.clear_queue();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_ids_stay_unique_after_clear() {
        let mut queue = UploadQueue::new();
        let first = queue.enqueue(vec![file("a.jpg")]);
        queue.clear_queue();
        let second = queue.enqueue(vec![file("b.jpg")]);
        assert_ne!(first[0], second[0]);
    }

    #[test]
    fn test_truncate_file_name() {
        assert_eq!(truncate_file_name("short.jpg", 20), "short.jpg");
        let long = truncate_file_name("very-long-filename-that-should-be-truncated.jpg", 20);
        assert!(long.contains("..."));
        assert!(long.ends_with(".jpg"));
        assert_eq!(long.chars().count(), 20);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(UploadStatus::Pending.label(), "Waiting");
        assert_eq!(UploadStatus::Success.label(), "Done");
        assert!(UploadStatus::Uploading.is_active());
        assert!(UploadStatus::Failed.is_settled());
    }
}
