//! FormRegistry — explicit widget discovery keyed by logical path/name.
//!
//! Replaces DOM queries with a per-form registry. Lookup is scoped to the
//! owning form's toolbar region plus the form body, and resolves in a fixed
//! order: nested path (active field-path prefix + name), exact path, then
//! plain name. The first non-empty match wins; an empty result is a no-op
//! for every caller, never an error.

use std::sync::Arc;

use parking_lot::Mutex;

use super::WidgetHandle;

/// Region a widget is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Toolbar,
    Body,
}

struct Registered {
    #[allow(dead_code)]
    region: Region,
    handle: Arc<dyn WidgetHandle>,
}

/// Registry of the live widgets bound to one form.
#[derive(Default)]
pub struct FormRegistry {
    widgets: Mutex<Vec<Registered>>,
}

impl FormRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a widget handle. Registration order defines the repetition
    /// index used by the attribute applier for same-named matches.
    pub fn register(&self, region: Region, handle: Arc<dyn WidgetHandle>) {
        self.widgets.lock().push(Registered { region, handle });
    }

    /// Remove every widget bound to `name` (by plain name or exact path).
    pub fn unregister(&self, name: &str) {
        self.widgets
            .lock()
            .retain(|w| w.handle.name() != name && w.handle.path() != Some(name));
    }

    /// Resolve a logical field/column name to the widgets bound to it.
    pub fn locate(&self, name: &str, prefix: Option<&str>) -> Vec<Arc<dyn WidgetHandle>> {
        let widgets = self.widgets.lock();

        if let Some(prefix) = prefix {
            let nested = format!("{prefix}.{name}");
            let matches = collect(&widgets, |w| w.path() == Some(nested.as_str()));
            if !matches.is_empty() {
                return matches;
            }
        }

        let matches = collect(&widgets, |w| w.path() == Some(name));
        if !matches.is_empty() {
            return matches;
        }

        collect(&widgets, |w| w.name() == name)
    }

    /// Number of registered widgets.
    pub fn size(&self) -> usize {
        self.widgets.lock().len()
    }
}

fn collect(
    widgets: &[Registered],
    matches: impl Fn(&dyn WidgetHandle) -> bool,
) -> Vec<Arc<dyn WidgetHandle>> {
    widgets
        .iter()
        .filter(|w| matches(w.handle.as_ref()))
        .map(|w| Arc::clone(&w.handle))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
