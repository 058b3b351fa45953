//! Toast Notifications
//!
//! Short-lived messages. The UI schedules removal after `TOAST_DURATION_MS`.

use serde::{Deserialize, Serialize};

pub const TOAST_DURATION_MS: u32 = 4000;

pub type ToastId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toasts {
    items: Vec<Toast>,
    last_id: ToastId,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }

    /// Add a toast, returning its id for scheduled removal
    pub fn add(&mut self, message: impl Into<String>, kind: ToastKind) -> ToastId {
        self.last_id += 1;
        self.items.push(Toast {
            id: self.last_id,
            message: message.into(),
            kind,
        });
        self.last_id
    }

    pub fn success(&mut self, message: impl Into<String>) -> ToastId {
        self.add(message, ToastKind::Success)
    }

    pub fn error(&mut self, message: impl Into<String>) -> ToastId {
        self.add(message, ToastKind::Error)
    }

    pub fn info(&mut self, message: impl Into<String>) -> ToastId {
        self.add(message, ToastKind::Info)
    }

    /// Unknown ids are ignored
    pub fn remove(&mut self, id: ToastId) {
        self.items.retain(|t| t.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_increase_and_remove() {
        let mut toasts = Toasts::new();
        let a = toasts.success("saved");
        let b = toasts.error("failed");
        assert!(b > a);
        assert_eq!(toasts.items().len(), 2);

        toasts.remove(a);
        assert_eq!(toasts.items()[0].kind, ToastKind::Error);
        toasts.remove(999);
        assert_eq!(toasts.items().len(), 1);
    }
}
