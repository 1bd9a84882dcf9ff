use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// SavePrevented
// ---------------------------------------------------------------------------

/// Raised by a form session's pre-save check to veto the action.
///
/// The optional message is shown in a blocking dialog before the chain
/// rejects; a `None` message rejects silently.
#[derive(Debug, Clone, Default)]
pub struct SavePrevented {
    pub message: Option<String>,
}

impl SavePrevented {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// Veto without a user-visible message.
    pub fn silent() -> Self {
        Self { message: None }
    }
}

impl fmt::Display for SavePrevented {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(m) => write!(f, "Save prevented: {m}"),
            None => write!(f, "Save prevented"),
        }
    }
}

impl std::error::Error for SavePrevented {}

// ---------------------------------------------------------------------------
// TransportError
// ---------------------------------------------------------------------------

/// Network-level failure from the remote action invoker or the data source.
///
/// Wraps arbitrary error strings from the transport layer; this engine does
/// not recover transport failures, it surfaces them to the caller.
#[derive(Debug, Clone)]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TransportError {}

// ---------------------------------------------------------------------------
// ActionError — top-level rollup
// ---------------------------------------------------------------------------

/// Failure of a triggered action chain.
///
/// Every trigger resolves a single `Result<(), ActionError>`; informational
/// directives (flash/info/notify) never produce errors.
#[derive(Debug, Error)]
pub enum ActionError {
    /// No action text was provided to a handler (fails fast at construction).
    #[error("No action provided.")]
    NoAction,

    /// The record failed client-side validation before save.
    #[error("Please correct the invalid form values.")]
    Validation,

    /// Server-declared per-field errors, attached inline to widgets.
    #[error("Action failed with field errors: [{}]", format_fields(.0))]
    FieldErrors(BTreeMap<String, String>),

    /// Server-declared blocking error, shown as a modal.
    #[error("{0}")]
    Blocking(String),

    /// The user declined a confirmation.
    #[error("Action cancelled")]
    Declined,

    /// A pre-save check vetoed the action.
    #[error(transparent)]
    Prevented(#[from] SavePrevented),

    /// Transport/network failure of a remote collaborator.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

fn format_fields(errors: &BTreeMap<String, String>) -> String {
    errors
        .keys()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience alias — the default error type is `ActionError`.
pub type Result<T, E = ActionError> = std::result::Result<T, E>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
