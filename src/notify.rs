//! 用户通知：向宿主应用发送警告与错误提示（尽力而为，不影响错误传播）。
//!
//! User-facing notifications.
//!
//! The client reports failures to the embedding application through a
//! [`Notifier`]. Notifications are fire-and-forget side effects; the failure is
//! still returned to the caller.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Notice`] | A warning or error message |
//! | [`Notifier`] | Trait for notification destinations |
//! | [`NoopNotifier`] | Default, drops everything |
//! | [`ConsoleNotifier`] | Prints to stderr |
//! | [`InMemoryNotifier`] | Records notices, for tests and batch tools |

use std::sync::{Arc, RwLock};

/// Shown for connect failures and server errors.
pub const TRY_AGAIN_LATER: &str =
    "The Crossref service could not be reached. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Warning(m) | Notice::Error(m) => m,
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Notice::Warning(_))
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);

    fn warning(&self, message: &str) {
        self.notify(Notice::Warning(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notify(Notice::Error(message.to_string()));
    }
}

pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notice: Notice) {}
}

pub fn noop_notifier() -> Arc<dyn Notifier> {
    Arc::new(NoopNotifier)
}

/// Console notifier for command-line use.
pub struct ConsoleNotifier {
    prefix: String,
}

impl ConsoleNotifier {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn format(&self, notice: &Notice) -> String {
        let level = if notice.is_warning() { "warning" } else { "error" };
        format!("{} {}: {}", self.prefix, level, notice.message())
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new("[crossref]")
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("{}", self.format(&notice));
    }
}

/// In-memory notifier; keeps the most recent `max` notices.
pub struct InMemoryNotifier {
    notices: Arc<RwLock<Vec<Notice>>>,
    max_notices: usize,
}

impl InMemoryNotifier {
    pub fn new(max: usize) -> Self {
        Self {
            notices: Arc::new(RwLock::new(Vec::new())),
            max_notices: max.max(1),
        }
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .read()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(Notice::is_warning)
            .map(|n| n.message().to_string())
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|n| !n.is_warning())
            .map(|n| n.message().to_string())
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut n) = self.notices.write() {
            n.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.notices.read().map(|n| n.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryNotifier {
    fn default() -> Self {
        Self::new(256)
    }
}

impl Notifier for InMemoryNotifier {
    fn notify(&self, notice: Notice) {
        // Poisoned lock: drop the notice, never panic the request path.
        if let Ok(mut notices) = self.notices.write() {
            notices.push(notice);
            if notices.len() > self.max_notices {
                notices.remove(0);
            }
        }
    }
}
