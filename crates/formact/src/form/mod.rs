//! The form session — the live form this engine mutates.
//!
//! [`FormSession`] is the seam between the engine and the surrounding form
//! view: record state, validation, editing, reload and the pre-save veto.
//! Most hooks have passthrough defaults so a minimal session only provides
//! its model, record storage and event bus.

pub mod bus;

pub use bus::{FormBus, FormEvent, ListenerId};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{SavePrevented, TransportError};
use crate::record::Record;

/// The owning form's state and capabilities.
#[async_trait]
pub trait FormSession: Send + Sync {
    /// Entity model the form edits.
    fn model(&self) -> String;

    /// Identifier used to anchor popup navigation to this form.
    fn form_name(&self) -> String {
        self.model()
    }

    /// Active nested field-path prefix, when the form edits a sub-record.
    fn field_prefix(&self) -> Option<String> {
        None
    }

    /// Snapshot of the current record.
    fn record(&self) -> Record;

    /// Mutate the current record in place.
    fn update_record(&self, update: &mut dyn FnMut(&mut Record));

    /// Session-computed execution context; `None` falls back to the raw
    /// record snapshot.
    fn context(&self) -> Option<Record> {
        None
    }

    /// Static context carried by the view parameters, merged under the
    /// session context.
    fn view_params(&self) -> Record {
        Record::new()
    }

    /// Original (last persisted) record values, sent along on save.
    fn original(&self) -> Option<Record> {
        None
    }

    fn is_valid(&self) -> bool {
        true
    }

    fn is_dirty(&self) -> bool {
        true
    }

    /// Show the form's own validation notice; return false to fall back to
    /// the generic notification.
    fn show_error_notice(&self) -> bool {
        false
    }

    /// Pre-save veto, consulted by the `sync` action prefix.
    fn before_save(&self) -> Result<(), SavePrevented> {
        Ok(())
    }

    /// Called after server values were merged into the record.
    fn change_notify(&self, _values: &Record) {}

    /// Load a (re-)fetched record into the form.
    fn edit_record(&self, _record: Record) {}

    /// Refresh navigation/route state after a save.
    fn update_route(&self) {}

    /// The form's completion collaborator (`canClose`).
    fn on_close(&self) {}

    /// Event channel of this form scope.
    fn bus(&self) -> Arc<FormBus>;

    /// Reload the record from the server.
    async fn reload(&self) {}

    /// Session-level save hook; return true when the save was handled and
    /// the generic persistence path must be skipped.
    async fn save_hook(&self, _values: &Record) -> bool {
        false
    }

    /// Session override for re-reading a saved record; `None` falls back to
    /// the persistence collaborator.
    async fn read_override(&self, _id: &Value) -> Option<Result<Record, TransportError>> {
        None
    }
}
