//! Driven port for user-facing notices.

use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    /// Neutral information.
    Info,
    /// A mutation completed.
    Success,
    /// A request was refused or only partly honoured.
    Warning,
    /// A collaborator failed.
    Error,
}

impl NoticeLevel {
    /// Lower-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sink for transient user notices (toasts in a graphical client).
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Surface `message` at `level`.
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Notifier that records every notice, for tests and batch callers that
/// print notices after the fact.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeLevel, String)>>,
}

impl RecordingNotifier {
    /// Remove and return every recorded notice, oldest first.
    #[must_use]
    pub fn take(&self) -> Vec<(NoticeLevel, String)> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Copy of the recorded notices.
    #[must_use]
    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_owned()));
    }
}
