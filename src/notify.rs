//! Session-scoped notification queue with cancellable auto-dismiss timers.
//!
//! Every timed notification owns a `tokio` task that removes it when its
//! lifetime ends. Removing or clearing notifications aborts the matching
//! timers, and dropping the service aborts whatever is still pending.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::FlyerError;

const DEFAULT_LIFETIME: Duration = Duration::from_secs(5);
const ERROR_LIFETIME: Duration = Duration::from_secs(8);
const VALIDATION_LIFETIME: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "notification-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NotificationKind {
    fn default_lifetime(self) -> Duration {
        match self {
            NotificationKind::Error => ERROR_LIFETIME,
            _ => DEFAULT_LIFETIME,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: Option<String>,
    pub message: String,
    /// `None` for persistent notifications.
    pub lifetime: Option<Duration>,
    pub dismissible: bool,
}

/// Optional settings for [`NotificationService::add`].
#[derive(Debug, Clone, Default)]
pub struct NotificationOptions {
    pub title: Option<String>,
    /// Overrides the kind's default lifetime. A zero lifetime never expires.
    pub lifetime: Option<Duration>,
    /// Defaults to `true`.
    pub dismissible: Option<bool>,
    /// Never auto-dismiss.
    pub persistent: bool,
}

impl NotificationOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    notifications: Vec<Notification>,
    timers: HashMap<NotificationId, JoinHandle<()>>,
}

impl Inner {
    fn remove(&mut self, id: NotificationId) -> bool {
        if let Some(timer) = self.timers.remove(&id) {
            timer.abort();
        }
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id != id);
        self.notifications.len() != before
    }
}

/// Notification queue owned by one session.
pub struct NotificationService {
    runtime: Handle,
    inner: Arc<Mutex<Inner>>,
}

impl NotificationService {
    /// Create a service whose timers run on `runtime`.
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Create a service on the runtime of the calling task, if any.
    pub fn from_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a notification and start its dismissal timer.
    pub fn add(
        &self,
        kind: NotificationKind,
        message: impl Into<String>,
        options: NotificationOptions,
    ) -> NotificationId {
        let lifetime = if options.persistent {
            None
        } else {
            Some(options.lifetime.unwrap_or_else(|| kind.default_lifetime()))
                .filter(|d| !d.is_zero())
        };

        let mut inner = self.lock();
        inner.next_id += 1;
        let id = NotificationId(inner.next_id);
        inner.notifications.push(Notification {
            id,
            kind,
            title: options.title,
            message: message.into(),
            lifetime,
            dismissible: options.dismissible.unwrap_or(true),
        });

        if let Some(lifetime) = lifetime {
            let timer = self.runtime.spawn(expire(Arc::downgrade(&self.inner), id, lifetime));
            inner.timers.insert(id, timer);
        }
        id
    }

    /// Remove a notification and cancel its timer. Returns whether it was
    /// still queued.
    pub fn remove(&self, id: NotificationId) -> bool {
        self.lock().remove(id)
    }

    /// Remove everything and cancel every pending timer.
    pub fn clear(&self) {
        let mut inner = self.lock();
        for (_, timer) in inner.timers.drain() {
            timer.abort();
        }
        inner.notifications.clear();
    }

    /// Replace the message of a queued notification.
    pub fn update(&self, id: NotificationId, message: impl Into<String>) -> bool {
        let mut inner = self.lock();
        match inner.notifications.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.message = message.into();
                true
            }
            None => false,
        }
    }

    /// Snapshot of the queued notifications, oldest first.
    pub fn list(&self) -> Vec<Notification> {
        self.lock().notifications.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().notifications.is_empty()
    }

    /// Number of timers still pending.
    pub fn pending_timers(&self) -> usize {
        self.lock().timers.len()
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.add(NotificationKind::Success, message, NotificationOptions::default())
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.add(NotificationKind::Info, message, NotificationOptions::default())
    }

    pub fn warning(&self, message: impl Into<String>) -> NotificationId {
        self.add(NotificationKind::Warning, message, NotificationOptions::default())
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.add(NotificationKind::Error, message, NotificationOptions::default())
    }

    pub fn validation_error(&self, message: impl Into<String>) -> NotificationId {
        self.add(
            NotificationKind::Error,
            message,
            NotificationOptions {
                title: Some("Invalid input".to_string()),
                lifetime: Some(VALIDATION_LIFETIME),
                ..NotificationOptions::default()
            },
        )
    }

    /// Surface a failed pipeline run as a single error notification.
    pub fn report_failure(&self, error: &FlyerError) -> NotificationId {
        match error {
            FlyerError::Validation(reason) => self.validation_error(reason.clone()),
            other => self.add(
                NotificationKind::Error,
                other.to_string(),
                NotificationOptions::titled(other.headline()),
            ),
        }
    }
}

impl Drop for NotificationService {
    fn drop(&mut self) {
        let mut inner = self.lock();
        for (_, timer) in inner.timers.drain() {
            timer.abort();
        }
    }
}

async fn expire(inner: Weak<Mutex<Inner>>, id: NotificationId, lifetime: Duration) {
    tokio::time::sleep(lifetime).await;
    if let Some(inner) = inner.upgrade() {
        let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
        // Drop our own handle first so `remove` does not abort this task.
        inner.timers.remove(&id);
        inner.remove(id);
    }
}
