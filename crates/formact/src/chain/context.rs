//! Execution context — the payload sent along with every remote action.
//!
//! Computed per invocation from the view parameters and the session's
//! context (or raw record snapshot), refreshed lazily and invalidated after
//! any save or value merge.

use parking_lot::Mutex;
use serde_json::Value;

use crate::form::FormSession;
use crate::record::Record;

/// The UI element a handler is bound to.
#[derive(Debug, Clone, Default)]
pub struct TriggerElement {
    pub name: String,
    /// Button triggers carry their name as `_signal` in the context.
    pub is_button: bool,
}

impl TriggerElement {
    pub fn button(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_button: true,
        }
    }

    pub fn field(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_button: false,
        }
    }
}

/// Lazily rebuilt context cache.
#[derive(Default)]
pub struct ContextCell {
    cached: Mutex<Option<Record>>,
}

impl ContextCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current context, rebuilding it when stale.
    pub fn get(&self, session: &dyn FormSession, element: &TriggerElement) -> Record {
        let mut cached = self.cached.lock();
        if let Some(context) = cached.as_ref() {
            return context.clone();
        }
        let context = build_context(session, element);
        *cached = Some(context.clone());
        context
    }

    /// Mark the context stale; the next [`get`](Self::get) rebuilds it.
    pub fn invalidate(&self) {
        *self.cached.lock() = None;
    }
}

/// Merge view parameters with the session context; the session wins on
/// conflicting keys. Button triggers name themselves as `_signal`.
pub fn build_context(session: &dyn FormSession, element: &TriggerElement) -> Record {
    let mut context = session.view_params();
    let inner = session.context().unwrap_or_else(|| session.record());
    for (key, value) in inner {
        context.insert(key, value);
    }
    if element.is_button {
        context.insert("_signal".to_string(), Value::String(element.name.clone()));
    }
    context
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
