use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// How long a toast stays on screen
pub const TOAST_TTL: Duration = Duration::from_secs(3);

/// Oldest toasts are dropped past this many
const MAX_TOASTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub created_at: Instant,
}

impl Toast {
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.duration_since(self.created_at) > ttl
    }
}

/// Transient notification queue shared by the handlers and the view
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    toasts: Arc<Mutex<VecDeque<Toast>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message.into());
    }

    fn push(&self, kind: ToastKind, message: String) {
        let mut toasts = self.toasts.lock().unwrap_or_else(|e| e.into_inner());
        toasts.push_back(Toast {
            kind,
            message,
            created_at: Instant::now(),
        });
        while toasts.len() > MAX_TOASTS {
            toasts.pop_front();
        }
    }

    /// Most recent toast, if any is still queued
    pub fn latest(&self) -> Option<Toast> {
        let toasts = self.toasts.lock().unwrap_or_else(|e| e.into_inner());
        toasts.back().cloned()
    }

    /// Drop toasts older than `ttl`
    pub fn clear_expired(&self, ttl: Duration) {
        let now = Instant::now();
        let mut toasts = self.toasts.lock().unwrap_or_else(|e| e.into_inner());
        toasts.retain(|toast| !toast.is_expired(now, ttl));
    }
}
