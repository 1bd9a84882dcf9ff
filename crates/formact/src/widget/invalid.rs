//! Inline validation errors with one-shot reset semantics.
//!
//! Attaching an error marks the bound widget invalid and arms a reset hook
//! interposed into the widget's value-change and formatting pipelines. The
//! hook fires once — on the next pipeline pass or when the user re-enters
//! edit mode anywhere on the form — removing itself, restoring validity and
//! clearing the inline message.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::form::{FormBus, FormEvent};

use super::WidgetHandle;

type Unlisten = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct State {
    invalid: bool,
    message: Option<String>,
    reset: Option<Unlisten>,
}

/// Per-widget validity state shared between the engine and the toolkit.
///
/// The toolkit reads [`is_invalid`](Self::is_invalid) /
/// [`message`](Self::message) for display and routes its value pipelines
/// through [`pipe_change`](Self::pipe_change) and
/// [`pipe_format`](Self::pipe_format).
#[derive(Default)]
pub struct ValidityControl {
    state: Mutex<State>,
}

impl ValidityControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_invalid(&self) -> bool {
        self.state.lock().invalid
    }

    /// The inline error message, while one is attached.
    pub fn message(&self) -> Option<String> {
        self.state.lock().message.clone()
    }

    pub fn set_validity(&self, valid: bool) {
        self.state.lock().invalid = !valid;
    }

    /// Whether a reset hook is currently armed.
    pub fn reset_armed(&self) -> bool {
        self.state.lock().reset.is_some()
    }

    fn arm(&self, message: &str, unlisten: Unlisten) {
        let mut state = self.state.lock();
        state.message = Some(message.to_string());
        state.reset = Some(unlisten);
    }

    /// Fire the one-shot reset: restore validity, clear the message and
    /// detach from the form's edit events. No-op when nothing is armed.
    pub fn reset(&self) {
        let hook = {
            let mut state = self.state.lock();
            match state.reset.take() {
                Some(hook) => {
                    state.invalid = false;
                    state.message = None;
                    Some(hook)
                }
                None => None,
            }
        };
        // Run outside the lock — the unlisten closure calls back into the bus.
        if let Some(unlisten) = hook {
            unlisten();
        }
    }

    /// Value-change pipeline stage; resets once, passes the value through.
    pub fn pipe_change(&self, value: Value) -> Value {
        self.reset();
        value
    }

    /// Formatting pipeline stage; resets once, passes the value through.
    pub fn pipe_format(&self, value: Value) -> Value {
        self.reset();
        value
    }
}

/// Attach an inline validation error to a widget.
///
/// Skipped when the widget exposes no validity controller or a reset hook
/// is already armed. Widgets in a non-editable mode keep their validity;
/// the message and reset hook are still recorded so a later edit clears
/// the attachment.
pub fn attach_error(bus: &Arc<FormBus>, widget: &Arc<dyn WidgetHandle>, message: &str) {
    let Some(ctrl) = widget.validity() else {
        return;
    };
    if ctrl.reset_armed() {
        return;
    }

    let listener = {
        let ctrl = Arc::clone(&ctrl);
        bus.on(move |event| {
            if matches!(event, FormEvent::Edit) {
                ctrl.reset();
            }
        })
    };
    let unlisten = {
        let bus = Arc::clone(bus);
        Box::new(move || bus.off(listener))
    };
    ctrl.arm(message, unlisten);

    if widget.is_editable() {
        ctrl.set_validity(false);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
