//! User-visible notice delivery.
//!
//! A notice is a blocking alert: a literal message the
//! user acknowledges. Front ends implement `Notifier` to show it.

use std::sync::Mutex;

use glimpse_core::types::Notice;

/// Sink for user-visible notices.
pub trait Notifier: Send + Sync {
    /// Show `notice` to the user.
    fn notify(&self, notice: Notice);
}

/// Notifier that records every notice, for tests and headless use.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices raised so far, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// The most recent notice, if any.
    pub fn last(&self) -> Option<Notice> {
        self.notices().last().copied()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut guard) = self.notices.lock() {
            guard.push(notice);
        }
    }
}
