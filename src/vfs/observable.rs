/*!
 * Watch Registry - Event System for File Watching
 * Explicit per-prefix subscriber lists with synchronous dispatch
 */

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use super::path;

/// File system events that can be observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum FileEvent {
    /// File or directory was created
    Created { path: String },

    /// File contents or metadata were modified
    Modified { path: String },

    /// File or directory was deleted
    Deleted { path: String },

    /// File or directory was renamed/moved
    Renamed { from: String, to: String },
}

impl FileEvent {
    /// Get the primary path involved in this event
    pub fn path(&self) -> &str {
        match self {
            FileEvent::Created { path } => path,
            FileEvent::Modified { path } => path,
            FileEvent::Deleted { path } => path,
            FileEvent::Renamed { from, .. } => from,
        }
    }

    /// Whether the event touches anything at or below `prefix`
    fn concerns(&self, prefix: &str) -> bool {
        match self {
            FileEvent::Renamed { from, to } => {
                path::is_ancestor(prefix, from) || path::is_ancestor(prefix, to)
            }
            other => path::is_ancestor(prefix, other.path()),
        }
    }
}

/// Callback invoked for every matching event
pub type WatchHandler = Arc<dyn Fn(&FileEvent) + Send + Sync>;

struct Subscriber {
    id: u64,
    prefix: String,
    handler: WatchHandler,
}

#[derive(Default)]
struct Subscribers {
    next_id: AtomicU64,
    list: RwLock<Vec<Subscriber>>,
}

/// Registry of path watchers
///
/// Handlers run synchronously on the mutating call, after the registry
/// lock is released, so a handler may itself call back into the VFS.
/// No events are replayed to late subscribers.
#[derive(Clone, Default)]
pub struct WatchRegistry {
    inner: Arc<Subscribers>,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for events at or below a normalized prefix
    pub fn subscribe(&self, prefix: String, handler: WatchHandler) -> WatchGuard {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.list.write().push(Subscriber {
            id,
            prefix,
            handler,
        });
        WatchGuard {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver an event to every matching subscriber
    pub fn emit(&self, event: FileEvent) {
        let targets: Vec<WatchHandler> = self
            .inner
            .list
            .read()
            .iter()
            .filter(|s| event.concerns(&s.prefix))
            .map(|s| Arc::clone(&s.handler))
            .collect();

        for handler in targets {
            handler(&event);
        }
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.inner.list.read().len()
    }
}

impl fmt::Debug for WatchRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchRegistry")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Subscription handle; dropping it unsubscribes
#[must_use = "dropping the guard immediately unsubscribes the watcher"]
pub struct WatchGuard {
    id: u64,
    registry: Weak<Subscribers>,
}

impl WatchGuard {
    /// Remove the subscription now
    pub fn unsubscribe(self) {
        drop(self);
    }

    fn detach(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.list.write().retain(|s| s.id != self.id);
        }
    }
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for WatchGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchGuard").field("id", &self.id).finish()
    }
}
