//! Collaborator interfaces consumed by the engine.
//!
//! The visual toolkit, transport, dialogs, notifications, navigation and
//! spinner visuals live outside this crate; they are injected as trait
//! objects at construction, never discovered through an ambient hierarchy.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::protocol::{ActionResponse, ViewDescriptor};
use crate::record::Record;

// ============================================================================
// ActionInvoker — remote action transport
// ============================================================================

/// Invokes a named server-side action with a model and execution context.
#[async_trait]
pub trait ActionInvoker: Send + Sync {
    async fn invoke(
        &self,
        action: &str,
        model: &str,
        context: &Record,
    ) -> Result<ActionResponse, TransportError>;
}

// ============================================================================
// Dialogs / Notify — user-facing messaging
// ============================================================================

/// Options for a confirmation dialog.
#[derive(Debug, Clone, Default)]
pub struct ConfirmOptions {
    pub title: Option<String>,
    /// Render yes/no buttons instead of ok/cancel.
    pub yes_no: bool,
}

/// Modal dialog service. `confirm` and `error` resolve only once the user
/// has answered or acknowledged — they are chain suspension points.
#[async_trait]
pub trait Dialogs: Send + Sync {
    async fn confirm(&self, message: &str, options: ConfirmOptions) -> bool;
    async fn error(&self, message: &str);
    /// Non-blocking informational dialog.
    fn say(&self, message: &str);
}

/// Options for an error notification.
#[derive(Debug, Clone, Default)]
pub struct NotifyOptions {
    pub title: Option<String>,
}

/// Toast/banner notifications, fire-and-forget.
pub trait Notify: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str, options: NotifyOptions);
}

// ============================================================================
// Navigator — tab/view navigation
// ============================================================================

/// Opens a normalized navigation descriptor in the surrounding application.
pub trait Navigator: Send + Sync {
    fn open_tab(&self, view: ViewDescriptor);
}

// ============================================================================
// DataSource — record persistence
// ============================================================================

/// Persistence collaborator for the save fast-path.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn save(&self, record: &Record) -> Result<Record, TransportError>;
    async fn read(&self, id: &Value) -> Result<Record, TransportError>;
}

// ============================================================================
// Ui / UiScheduler — blocking overlay and settle points
// ============================================================================

/// UI side effects with no completion semantics.
pub trait Ui: Send + Sync {
    /// Blocking overlay; unblocks on its own once actions complete.
    fn block(&self);
    /// Re-run layout after record values changed.
    fn adjust_layout(&self);
}

/// Cooperative scheduling seams of the single UI thread.
#[async_trait]
pub trait UiScheduler: Send + Sync {
    /// Yield until the current batch of synchronous mutations has settled.
    async fn next_tick(&self);
    /// Wait until in-flight UI work (requests, layout) has drained.
    async fn settle(&self);
    async fn delay_ms(&self, ms: u64);
}

/// Default scheduler backed by the tokio timer.
#[derive(Debug, Default)]
pub struct TokioScheduler;

#[async_trait]
impl UiScheduler for TokioScheduler {
    async fn next_tick(&self) {
        tokio::task::yield_now().await;
    }

    async fn settle(&self) {
        tokio::task::yield_now().await;
    }

    async fn delay_ms(&self, ms: u64) {
        tokio::time::sleep(tokio::time::Duration::from_millis(ms)).await;
    }
}

// ============================================================================
// DownloadFrame — transient file downloads
// ============================================================================

/// Hidden download target navigated to a file URL, cleared after a grace
/// period.
pub trait DownloadFrame: Send + Sync {
    fn open(&self, url: &str);
    fn clear(&self);
}

// ============================================================================
// Services bundle
// ============================================================================

/// All collaborators, bundled for injection into the chain runner.
#[derive(Clone)]
pub struct Services {
    pub invoker: Arc<dyn ActionInvoker>,
    pub dialogs: Arc<dyn Dialogs>,
    pub notify: Arc<dyn Notify>,
    pub navigator: Arc<dyn Navigator>,
    pub data_source: Arc<dyn DataSource>,
    pub ui: Arc<dyn Ui>,
    pub scheduler: Arc<dyn UiScheduler>,
    pub download: Arc<dyn DownloadFrame>,
}
