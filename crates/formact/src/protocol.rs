//! Wire protocol for server-issued action responses.
//!
//! A remote action returns an ordered list of [`ResponseItem`]s — tagged
//! records of optional directives. The directives are not mutually
//! exclusive; the chain runner enforces a fixed evaluation priority.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::record::{truthy, Record};

// ============================================================================
// ResponseItem
// ============================================================================

/// One server-described instruction.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResponseItem {
    /// Message shown in a non-blocking dialog.
    pub flash: Option<String>,
    /// Alias of `flash` used by older servers.
    pub info: Option<String>,
    /// Toast notification.
    pub notify: Option<String>,
    /// Blocking error dialog; aborts the chain after acknowledgment.
    pub error: Option<String>,
    /// Confirmable warning dialog.
    pub alert: Option<String>,
    /// Follow-up action run when an `error` is acknowledged or an `alert`
    /// is declined.
    pub action: Option<String>,
    /// Next action to chain to, substituting the remaining items.
    pub pending: Option<String>,
    /// Field name → message; attaches inline validation errors.
    pub errors: Option<BTreeMap<String, String>>,
    /// Partial record to merge into the current record.
    pub values: Option<Record>,
    /// Reload the whole record from the server.
    pub reload: bool,
    /// Run the save fast-path.
    pub save: bool,
    /// Event name broadcast to the form scope.
    pub signal: Option<String>,
    #[serde(rename = "signal-data")]
    pub signal_data: Option<Value>,
    /// Server file token for a transient download.
    pub export_file: Option<String>,
    /// Field name → attribute mutations.
    pub attrs: Option<BTreeMap<String, BTreeMap<String, Value>>>,
    /// Navigation descriptor.
    pub view: Option<ViewDescriptor>,
    /// Notify the form's completion collaborator.
    pub can_close: bool,
}

impl ResponseItem {
    /// The non-blocking message to show, if any (`flash` wins over `info`).
    pub fn flash_message(&self) -> Option<&str> {
        self.flash.as_deref().or(self.info.as_deref())
    }
}

// ============================================================================
// ActionResponse
// ============================================================================

/// The full payload of one remote action invocation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ActionResponse {
    pub data: Vec<ResponseItem>,
    /// Top-level field errors; spliced in front of `data` before chaining.
    pub errors: Option<BTreeMap<String, String>>,
}

impl ActionResponse {
    /// The ordered chain to process: a top-level `errors` object becomes a
    /// synthetic first item so it aborts before anything else runs.
    pub fn into_items(self) -> Vec<ResponseItem> {
        let mut items = self.data;
        if let Some(errors) = self.errors {
            items.insert(
                0,
                ResponseItem {
                    errors: Some(errors),
                    ..ResponseItem::default()
                },
            );
        }
        items
    }
}

// ============================================================================
// View descriptors
// ============================================================================

/// Navigation descriptor handed to the navigation collaborator.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewDescriptor {
    pub title: Option<String>,
    pub model: Option<String>,
    pub resource: Option<String>,
    pub view_type: Option<String>,
    pub views: Vec<ViewEntry>,
    pub params: Option<Map<String, Value>>,
    /// Unique action id tagged during normalization.
    pub action: Option<String>,
    /// Identifier of the form scope a popup is anchored to.
    #[serde(skip)]
    pub popup_parent: Option<String>,
    /// Descriptor fields this engine does not interpret, passed through to
    /// the navigation collaborator.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of a descriptor's `views` list.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ViewEntry {
    #[serde(rename = "type")]
    pub view_type: String,
    pub resource: Option<String>,
    pub title: Option<String>,
}

impl ViewEntry {
    pub fn of(view_type: impl Into<String>) -> Self {
        Self {
            view_type: view_type.into(),
            resource: None,
            title: None,
        }
    }
}

static ACTION_SEQ: AtomicU64 = AtomicU64::new(1);

fn next_action_id() -> String {
    format!("$act{}", ACTION_SEQ.fetch_add(1, Ordering::Relaxed))
}

/// Normalize a navigation descriptor in place.
///
/// Defaults the view type to `grid`, resolves `model` from `resource` for
/// record-oriented types, synthesizes the `views` list (with `resource` and
/// `title` for `html` views), guarantees both `grid` and `form` entries for
/// record-oriented navigation, tags a unique action id, and anchors popup
/// navigation to the triggering form.
pub fn normalize_view(view: &mut ViewDescriptor, anchor: Option<&str>) {
    view.action = Some(next_action_id());

    let view_type = view.view_type.get_or_insert_with(|| "grid".to_string()).clone();
    let record_oriented = view_type == "grid" || view_type == "form";

    if record_oriented && view.model.is_none() {
        view.model = view.resource.clone();
    }

    if view.views.is_empty() {
        let mut entry = ViewEntry::of(view_type.clone());
        if view_type == "html" {
            entry.resource = view.resource.clone();
            entry.title = view.title.clone();
        }
        view.views.push(entry);
    }

    if record_oriented {
        for required in ["grid", "form"] {
            if !view.views.iter().any(|v| v.view_type == required) {
                view.views.push(ViewEntry::of(required));
            }
        }
    }

    let popup = view
        .params
        .as_ref()
        .and_then(|p| p.get("popup"))
        .is_some_and(truthy);
    if popup {
        view.popup_parent = anchor.map(str::to_string);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
