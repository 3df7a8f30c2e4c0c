//! Typed in-process pub/sub for cross-view synchronization.
//!
//! Views that have no shared parent state communicate through a `ViewBus`
//! created once at application bootstrap and injected into each view.
//! Delivery is synchronous and at-most-once per publish; there is no replay,
//! so a view that mounts after a publish must rely on its own batch fetch.

use std::sync::{Arc, Mutex, Weak};

use crate::model::JobId;

/// Payload for a successful save-toggle, regardless of originating view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedStatusChanged {
    pub job_id: JobId,
    pub saved: bool,
}

/// Published when a job detail view is dismissed, so list views can re-fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobViewClosed {
    pub job_id: JobId,
}

/// Published when any operation observes an expired session (HTTP 401).
/// The login-redirect collaborator subscribes to this once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionExpired;

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Slots<T: 'static> {
    next_id: u64,
    handlers: Vec<(u64, Handler<T>)>,
}

impl<T: 'static> Default for Slots<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
        }
    }
}

/// A single typed topic. Publisher and subscriber share the payload type,
/// so the two sides cannot silently drift apart.
pub struct Topic<T: 'static> {
    slots: Arc<Mutex<Slots<T>>>,
}

impl<T: 'static> Default for Topic<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Clone for Topic<T> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
        }
    }
}

impl<T: 'static> Topic<T> {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(Slots::default())),
        }
    }

    /// Registers a handler. Dropping the returned [`Subscription`] removes it.
    pub fn subscribe(&self, handler: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = {
            let mut slots = self.slots.lock().unwrap();
            let id = slots.next_id;
            slots.next_id += 1;
            slots.handlers.push((id, Arc::new(handler)));
            id
        };

        let weak: Weak<Mutex<Slots<T>>> = Arc::downgrade(&self.slots);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(slots) = weak.upgrade() {
                    slots
                        .lock()
                        .unwrap()
                        .handlers
                        .retain(|(handler_id, _)| *handler_id != id);
                }
            })),
        }
    }

    /// Delivers `payload` to every current subscriber, synchronously.
    ///
    /// Handlers are cloned out of the lock before invocation, so a handler
    /// may subscribe or publish without deadlocking. Subscribers must not
    /// perform long-running work inline.
    pub fn publish(&self, payload: &T) {
        let handlers: Vec<Handler<T>> = self
            .slots
            .lock()
            .unwrap()
            .handlers
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in handlers {
            handler(payload);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.slots.lock().unwrap().handlers.len()
    }
}

/// RAII handle for a topic subscription; unsubscribes on drop.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Explicitly unsubscribes now instead of at drop.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// The cross-view event channel: one instance per application, created at
/// bootstrap and injected into views. No DOM globals, no string topics.
#[derive(Clone, Default)]
pub struct ViewBus {
    pub saved_status_changed: Topic<SavedStatusChanged>,
    pub job_view_closed: Topic<JobViewClosed>,
    pub session_expired: Topic<SessionExpired>,
}

impl ViewBus {
    pub fn new() -> Self {
        Self::default()
    }
}
