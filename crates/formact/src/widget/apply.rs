//! AttributeApplier — dispatch one attribute mutation map to a widget.
//!
//! Special-cased widget kinds take priority: list columns and tab panes
//! recognize only a subset of attributes and short-circuit the generic set;
//! relational-list titles handle `title` specially and then fall through.
//! For repeated matches of the same logical name, only the first match may
//! have its value driven (`repetition index > 0` skips the `value` family),
//! preventing duplicate-field value storms.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::record::truthy;

use super::{WidgetHandle, WidgetKind};

/// Apply `attrs` to one widget; `index` is the widget's position among the
/// matches of the same logical name.
pub fn apply_attrs(widget: &Arc<dyn WidgetHandle>, attrs: &BTreeMap<String, Value>, index: usize) {
    match widget.kind() {
        WidgetKind::ListColumn => {
            apply_column(widget, attrs);
            return;
        }
        WidgetKind::TabPane => {
            apply_tab(widget, attrs);
            return;
        }
        WidgetKind::RelationalTitle => {
            if let Some(title) = attrs.get("title") {
                widget.set_title(&as_text(title));
            }
        }
        WidgetKind::Generic | WidgetKind::Embedded => {}
    }

    for (attr, value) in attrs {
        if index > 0 && (attr == "value" || attr.starts_with("value:")) {
            continue;
        }
        match attr.as_str() {
            "required" | "readonly" | "hidden" | "collapse" => {
                widget.set_attr(attr, value);
            }
            "title" => {
                widget.set_label_html(&as_text(value));
                widget.set_attr("title", value);
            }
            // accepted on the wire, no widget support yet
            "color" => {}
            "domain" => {
                widget.set_domain(value);
            }
            "refresh" => {
                widget.refresh_scope();
            }
            "url" | "url:set" => {
                if widget.kind() == WidgetKind::Embedded {
                    widget.set_embedded_url(&as_text(value));
                }
            }
            "value" | "value:set" => {
                widget.set_value(value);
            }
            "value:add" => {
                widget.fetch_and_select(value);
            }
            "value:del" => {
                widget.remove_items(value);
            }
            other => {
                debug!(attr = other, widget = widget.name(), "ignoring unknown attribute");
            }
        }
    }
}

/// List columns recognize `hidden` (show/hide) and `title` (rename).
/// Renaming is applied asynchronously to avoid layout thrash while the
/// surrounding chain is still mutating the view.
fn apply_column(widget: &Arc<dyn WidgetHandle>, attrs: &BTreeMap<String, Value>) {
    for (attr, value) in attrs {
        match attr.as_str() {
            "hidden" => widget.show_column(!truthy(value)),
            "title" => {
                let widget = Arc::clone(widget);
                let title = as_text(value);
                tokio::spawn(async move {
                    tokio::task::yield_now().await;
                    widget.set_column_title(&title);
                });
            }
            _ => {}
        }
    }
}

/// Tab panes recognize `hidden` and `title`, nothing else.
fn apply_tab(widget: &Arc<dyn WidgetHandle>, attrs: &BTreeMap<String, Value>) {
    for (attr, value) in attrs {
        match attr.as_str() {
            "hidden" => widget.set_attr("hidden", value),
            "title" => widget.set_title(&as_text(value)),
            _ => {}
        }
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
