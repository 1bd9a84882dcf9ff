//! formact — client-side action-response interpreter for form views.
//!
//! Interprets server-issued action responses — declarative instructions
//! describing field attribute changes, value updates, validation errors,
//! navigation and save/reload directives — and applies them to a live
//! form's record and widgets. Responses arrive as ordered chains; each
//! item's asynchronous effects settle before the next item runs, and an
//! item may substitute a follow-up action for the rest of its chain.

pub mod chain;
pub mod error;
pub mod export;
pub mod form;
pub mod handler;
pub mod protocol;
pub mod record;
pub mod services;
pub mod widget;

pub use chain::{ChainRunner, TriggerElement};
pub use error::{ActionError, Result, SavePrevented, TransportError};
pub use form::{FormBus, FormEvent, FormSession};
pub use handler::{handler, ActionHandler, HandlerOptions, Trigger};
pub use protocol::{ActionResponse, ResponseItem, ViewDescriptor};
pub use record::merge::{merge, MergeOutcome, NestedUpdate};
pub use record::Record;
pub use services::Services;
pub use widget::{FormRegistry, Region, ValidityControl, WidgetHandle, WidgetKind};
