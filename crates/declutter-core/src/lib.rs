//! Declutter Core
//!
//! Platform-independent state of the declutter app: the upload queue and
//! photo compression, sorting writes against the hosted backend, undo
//! history and the gamification counters.

pub mod achievements;
pub mod backend;
pub mod compression;
pub mod config;
pub mod dialog;
pub mod error;
pub mod models;
pub mod notifications;
pub mod photo;
pub mod session;
pub mod share;
pub mod sorting;
pub mod stats;
pub mod storage;
pub mod streak;
pub mod toast;
pub mod tx;
pub mod undo;
pub mod upload;
pub mod xp;

pub use backend::{Backend, MemoryBackend};
pub use error::{DomainError, DomainResult};
pub use models::{DiscardCategory, Item, ItemStatus, StorageBox, User, UserStats};
pub use session::{Session, SortOutcome};
pub use sorting::{Destination, SortService};
pub use storage::{KeyValueStore, MemoryStore};
pub use upload::{FileStore, QueueCell, UploadFile, UploadQueue, UploadStatus};
