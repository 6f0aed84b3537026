// User-facing notifications raised by store operations.
// Defines the notifier seam and a timestamped in-memory log for the status line.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Default,
    Warning,
    Error,
}

/// A single notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            severity,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Receives notifications from the store.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Notifier that keeps a bounded history of messages.
#[derive(Debug)]
pub struct NotificationLog {
    messages: Mutex<Vec<Notification>>,
    capacity: usize,
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl NotificationLog {
    const DEFAULT_CAPACITY: usize = 100;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    /// Most recent notification.
    pub fn latest(&self) -> Option<Notification> {
        self.messages.lock().ok()?.last().cloned()
    }

    /// All retained notifications, oldest first.
    pub fn all(&self) -> Vec<Notification> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    /// Number of retained notifications with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.messages
            .lock()
            .map(|messages| messages.iter().filter(|n| n.severity == severity).count())
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.messages.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Default => log::info!("{}", message),
            Severity::Warning => log::warn!("{}", message),
            Severity::Error => log::error!("{}", message),
        }

        if let Ok(mut messages) = self.messages.lock() {
            messages.push(Notification::new(message, severity));
            if messages.len() > self.capacity {
                let excess = messages.len() - self.capacity;
                messages.drain(..excess);
            }
        }
    }
}
