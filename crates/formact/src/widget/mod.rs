//! Widget seam — capability-exposing handles to rendered form fields.
//!
//! The visual toolkit lives outside this crate; it registers one
//! [`WidgetHandle`] per rendered field or region. Capability methods default
//! to no-ops (returning `false` where the applier needs to know the
//! capability is absent), so a toolkit only implements what a widget
//! actually supports.

pub mod apply;
pub mod invalid;
pub mod registry;

pub use invalid::ValidityControl;
pub use registry::{FormRegistry, Region};

use std::sync::Arc;

use serde_json::Value;

/// Widget kinds with special-cased attribute handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    /// Ordinary field widget.
    Generic,
    /// Column of a relational list — only show/hide and rename apply.
    ListColumn,
    /// Title of a relational list panel.
    RelationalTitle,
    /// Notebook/tab pane — only hide and rename apply.
    TabPane,
    /// Embedded-content widget, target of `url` attributes.
    Embedded,
}

/// External handle to one rendered widget.
pub trait WidgetHandle: Send + Sync {
    /// Plain field name the widget is bound to.
    fn name(&self) -> &str;

    /// Logical (possibly dotted) path, when distinct from the name.
    fn path(&self) -> Option<&str> {
        None
    }

    fn kind(&self) -> WidgetKind {
        WidgetKind::Generic
    }

    /// Generic attribute sink (`required`, `readonly`, `hidden`,
    /// `collapse`, `title`).
    fn set_attr(&self, _name: &str, _value: &Value) {}

    /// Display title of relational panels and tab panes.
    fn set_title(&self, _title: &str) {}

    /// Visible label of a field, updated alongside the `title` attribute.
    fn set_label_html(&self, _html: &str) {}

    /// Returns false when the widget has no domain setter.
    fn set_domain(&self, _domain: &Value) -> bool {
        false
    }

    /// Returns false when the widget has no value setter.
    fn set_value(&self, _value: &Value) -> bool {
        false
    }

    /// Fetch the described records and append them to the selection
    /// (`value:add`). Returns false when unsupported.
    fn fetch_and_select(&self, _value: &Value) -> bool {
        false
    }

    /// Remove records by reference (`value:del`). Returns false when
    /// unsupported.
    fn remove_items(&self, _value: &Value) -> bool {
        false
    }

    /// Navigate an embedded-content widget (`url` / `url:set`).
    fn set_embedded_url(&self, _url: &str) {}

    /// Show or hide a list column.
    fn show_column(&self, _visible: bool) {}

    /// Rename a list column.
    fn set_column_title(&self, _title: &str) {}

    /// Broadcast a refresh request to the widget's sub-scope.
    fn refresh_scope(&self) {}

    /// Validity controller, when the widget participates in inline
    /// validation.
    fn validity(&self) -> Option<Arc<ValidityControl>> {
        None
    }

    /// False when the widget is in a non-editable mode.
    fn is_editable(&self) -> bool {
        true
    }
}
