//! FormBus — the form scope's event channel.
//!
//! Listeners are stored as `Arc<dyn Fn(&FormEvent)>` so snapshots are cheap.
//! Snapshot-on-emit semantics mean:
//!   - A listener removed *during* emission is still called in that round.
//!   - A listener added *during* emission is NOT called until the next emit.
//!
//! All methods take `&self` (interior mutability via `parking_lot::Mutex`),
//! and the lock is never held while a listener runs, so listeners may call
//! `on()`/`off()` reentrantly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

/// An event broadcast on a form scope.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// Named server signal with an arbitrary payload, consumable by any
    /// interested widget.
    Signal { name: String, data: Option<Value> },
    /// The user re-entered edit mode on a field.
    Edit,
    /// A nested partial update was parked for the owning widget to
    /// reconcile once it is not mid-edit.
    NestedValues { field: String, values: Value },
}

/// A listener ID returned by [`FormBus::on`], used with [`FormBus::off`].
pub type ListenerId = u64;

/// Closure type for form event listeners.
pub type ListenerFn = dyn Fn(&FormEvent) + Send + Sync;

/// Synchronous pub/sub channel owned by a form session.
pub struct FormBus {
    listeners: Mutex<Vec<(ListenerId, Arc<ListenerFn>)>>,
    next_id: AtomicU64,
}

impl FormBus {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register `callback` and return its [`ListenerId`].
    pub fn on(&self, callback: impl Fn(&FormEvent) + Send + Sync + 'static) -> ListenerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, Arc::new(callback)));
        id
    }

    /// Remove the listener identified by `id`; safe to call twice.
    pub fn off(&self, id: ListenerId) {
        self.listeners.lock().retain(|(lid, _)| *lid != id);
    }

    /// Emit `event` to all currently registered listeners.
    pub fn emit(&self, event: &FormEvent) {
        let snapshot: Vec<Arc<ListenerFn>> = {
            let guard = self.listeners.lock();
            guard.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        // Lock released — callbacks may call on()/off().
        for cb in snapshot {
            cb(event);
        }
    }

    /// Broadcast a named signal with an optional payload.
    pub fn emit_signal(&self, name: impl Into<String>, data: Option<Value>) {
        self.emit(&FormEvent::Signal {
            name: name.into(),
            data,
        });
    }

    /// Number of currently registered listeners.
    pub fn size(&self) -> usize {
        self.listeners.lock().len()
    }
}

impl Default for FormBus {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
