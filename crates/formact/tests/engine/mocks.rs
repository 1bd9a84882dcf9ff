//! Shared mock collaborators for the engine tests.
//!
//! Every mock appends to one shared timeline so tests can assert ordering
//! across collaborators, not just per-mock call counts.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use formact::chain::TriggerElement;
use formact::error::{SavePrevented, TransportError};
use formact::form::{FormBus, FormSession};
use formact::protocol::{ActionResponse, ViewDescriptor};
use formact::record::Record;
use formact::services::{
    ActionInvoker, ConfirmOptions, DataSource, Dialogs, DownloadFrame, Navigator, Notify,
    NotifyOptions, Services, TokioScheduler, Ui,
};
use formact::widget::{FormRegistry, Region, ValidityControl, WidgetHandle, WidgetKind};
use formact::{ActionHandler, ChainRunner, HandlerOptions};

pub type Timeline = Arc<Mutex<Vec<String>>>;

fn push(timeline: &Timeline, entry: impl Into<String>) {
    timeline.lock().push(entry.into());
}

// ============================================================================
// Mock session
// ============================================================================

pub struct MockSession {
    timeline: Timeline,
    pub bus: Arc<FormBus>,
    pub record: Mutex<Record>,
    pub valid: Mutex<bool>,
    pub dirty: Mutex<bool>,
    pub notice_handled: Mutex<bool>,
    pub prevent_save: Mutex<Option<SavePrevented>>,
    pub original: Mutex<Option<Record>>,
    pub save_hook_handled: Mutex<bool>,
    pub read_override: Mutex<Option<Record>>,
}

impl MockSession {
    pub fn new(timeline: Timeline) -> Arc<Self> {
        Arc::new(Self {
            timeline,
            bus: Arc::new(FormBus::new()),
            record: Mutex::new(
                serde_json::json!({"id": 1, "version": 0, "name": "draft"})
                    .as_object()
                    .cloned()
                    .unwrap_or_default(),
            ),
            valid: Mutex::new(true),
            dirty: Mutex::new(true),
            notice_handled: Mutex::new(false),
            prevent_save: Mutex::new(None),
            original: Mutex::new(None),
            save_hook_handled: Mutex::new(false),
            read_override: Mutex::new(None),
        })
    }
}

#[async_trait]
impl FormSession for MockSession {
    fn model(&self) -> String {
        "com.app.Order".to_string()
    }

    fn record(&self) -> Record {
        self.record.lock().clone()
    }

    fn update_record(&self, update: &mut dyn FnMut(&mut Record)) {
        update(&mut self.record.lock());
        push(&self.timeline, "session-record-updated");
    }

    fn original(&self) -> Option<Record> {
        self.original.lock().clone()
    }

    fn is_valid(&self) -> bool {
        *self.valid.lock()
    }

    fn is_dirty(&self) -> bool {
        *self.dirty.lock()
    }

    fn show_error_notice(&self) -> bool {
        *self.notice_handled.lock()
    }

    fn before_save(&self) -> Result<(), SavePrevented> {
        push(&self.timeline, "session-before-save");
        match self.prevent_save.lock().clone() {
            Some(prevented) => Err(prevented),
            None => Ok(()),
        }
    }

    fn change_notify(&self, _values: &Record) {
        push(&self.timeline, "session-change-notify");
    }

    fn edit_record(&self, record: Record) {
        push(&self.timeline, format!("session-edit:{}", Value::Object(record)));
    }

    fn update_route(&self) {
        push(&self.timeline, "session-route");
    }

    fn on_close(&self) {
        push(&self.timeline, "session-close");
    }

    fn bus(&self) -> Arc<FormBus> {
        Arc::clone(&self.bus)
    }

    async fn reload(&self) {
        push(&self.timeline, "session-reload");
    }

    async fn save_hook(&self, _values: &Record) -> bool {
        if *self.save_hook_handled.lock() {
            push(&self.timeline, "session-save-hook");
            true
        } else {
            false
        }
    }

    async fn read_override(&self, _id: &Value) -> Option<Result<Record, TransportError>> {
        self.read_override.lock().clone().map(|record| {
            push(&self.timeline, "session-read-override");
            Ok(record)
        })
    }
}

// ============================================================================
// Mock collaborators
// ============================================================================

pub struct MockInvoker {
    timeline: Timeline,
    pub responses: Mutex<HashMap<String, ActionResponse>>,
    pub contexts: Mutex<Vec<Record>>,
    pub fail_with: Mutex<Option<String>>,
}

impl MockInvoker {
    pub fn respond(&self, action: &str, response: Value) {
        let response: ActionResponse =
            serde_json::from_value(response).expect("mock response must parse");
        self.responses.lock().insert(action.to_string(), response);
    }

    pub fn calls(&self, timeline: &Timeline) -> Vec<String> {
        timeline
            .lock()
            .iter()
            .filter_map(|e| e.strip_prefix("invoke:").map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl ActionInvoker for MockInvoker {
    async fn invoke(
        &self,
        action: &str,
        model: &str,
        context: &Record,
    ) -> Result<ActionResponse, TransportError> {
        push(&self.timeline, format!("invoke:{action}"));
        push(&self.timeline, format!("invoke-model:{model}"));
        self.contexts.lock().push(context.clone());
        if let Some(message) = self.fail_with.lock().clone() {
            return Err(TransportError::new(message));
        }
        Ok(self
            .responses
            .lock()
            .get(action)
            .cloned()
            .unwrap_or_default())
    }
}

pub struct MockDialogs {
    timeline: Timeline,
    pub confirm_with: Mutex<bool>,
}

#[async_trait]
impl Dialogs for MockDialogs {
    async fn confirm(&self, message: &str, options: ConfirmOptions) -> bool {
        push(
            &self.timeline,
            format!("confirm:{message}:{}", options.title.as_deref().unwrap_or("")),
        );
        *self.confirm_with.lock()
    }

    async fn error(&self, message: &str) {
        push(&self.timeline, format!("error-dialog:{message}"));
    }

    fn say(&self, message: &str) {
        push(&self.timeline, format!("say:{message}"));
    }
}

pub struct MockNotify {
    timeline: Timeline,
}

impl Notify for MockNotify {
    fn info(&self, message: &str) {
        push(&self.timeline, format!("notify-info:{message}"));
    }

    fn error(&self, message: &str, options: NotifyOptions) {
        push(
            &self.timeline,
            format!("notify-error:{}:{message}", options.title.as_deref().unwrap_or("")),
        );
    }
}

pub struct MockNavigator {
    timeline: Timeline,
    pub opened: Mutex<Vec<ViewDescriptor>>,
}

impl Navigator for MockNavigator {
    fn open_tab(&self, view: ViewDescriptor) {
        push(&self.timeline, "open-tab");
        self.opened.lock().push(view);
    }
}

pub struct MockDataSource {
    timeline: Timeline,
    pub saved: Mutex<Vec<Record>>,
    pub read_result: Mutex<Option<Record>>,
}

#[async_trait]
impl DataSource for MockDataSource {
    async fn save(&self, record: &Record) -> Result<Record, TransportError> {
        push(&self.timeline, "ds-save");
        self.saved.lock().push(record.clone());
        let mut saved = record.clone();
        saved.remove("_original");
        saved.insert("id".to_string(), serde_json::json!(1));
        saved.insert("version".to_string(), serde_json::json!(1));
        Ok(saved)
    }

    async fn read(&self, id: &Value) -> Result<Record, TransportError> {
        push(&self.timeline, format!("ds-read:{id}"));
        Ok(self.read_result.lock().clone().unwrap_or_else(|| {
            serde_json::json!({"id": 1, "version": 1, "name": "saved"})
                .as_object()
                .cloned()
                .unwrap_or_default()
        }))
    }
}

pub struct MockUi {
    timeline: Timeline,
}

impl Ui for MockUi {
    fn block(&self) {
        push(&self.timeline, "ui-block");
    }

    fn adjust_layout(&self) {
        push(&self.timeline, "ui-adjust");
    }
}

pub struct MockFrame {
    timeline: Timeline,
}

impl DownloadFrame for MockFrame {
    fn open(&self, url: &str) {
        push(&self.timeline, format!("frame-open:{url}"));
    }

    fn clear(&self) {
        push(&self.timeline, "frame-clear");
    }
}

// ============================================================================
// Mock widget
// ============================================================================

pub struct MockWidget {
    timeline: Timeline,
    name: String,
    path: Option<String>,
    kind: WidgetKind,
    pub ctrl: Option<Arc<ValidityControl>>,
}

impl MockWidget {
    pub fn field(timeline: &Timeline, name: &str) -> Arc<Self> {
        Arc::new(Self {
            timeline: Arc::clone(timeline),
            name: name.to_string(),
            path: None,
            kind: WidgetKind::Generic,
            ctrl: Some(Arc::new(ValidityControl::new())),
        })
    }
}

impl WidgetHandle for MockWidget {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn kind(&self) -> WidgetKind {
        self.kind
    }

    fn set_attr(&self, name: &str, value: &Value) {
        push(&self.timeline, format!("widget-attr:{}:{name}={value}", self.name));
    }

    fn set_value(&self, value: &Value) -> bool {
        push(&self.timeline, format!("widget-value:{}:{value}", self.name));
        true
    }

    fn validity(&self) -> Option<Arc<ValidityControl>> {
        self.ctrl.clone()
    }
}

// ============================================================================
// Test bed
// ============================================================================

pub struct TestBed {
    pub timeline: Timeline,
    pub session: Arc<MockSession>,
    pub registry: Arc<FormRegistry>,
    pub invoker: Arc<MockInvoker>,
    pub dialogs: Arc<MockDialogs>,
    pub navigator: Arc<MockNavigator>,
    pub data_source: Arc<MockDataSource>,
    pub services: Services,
}

impl TestBed {
    pub fn new() -> Self {
        let timeline: Timeline = Arc::new(Mutex::new(Vec::new()));
        let session = MockSession::new(Arc::clone(&timeline));
        let registry = Arc::new(FormRegistry::new());
        let invoker = Arc::new(MockInvoker {
            timeline: Arc::clone(&timeline),
            responses: Mutex::new(HashMap::new()),
            contexts: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
        });
        let dialogs = Arc::new(MockDialogs {
            timeline: Arc::clone(&timeline),
            confirm_with: Mutex::new(true),
        });
        let navigator = Arc::new(MockNavigator {
            timeline: Arc::clone(&timeline),
            opened: Mutex::new(Vec::new()),
        });
        let data_source = Arc::new(MockDataSource {
            timeline: Arc::clone(&timeline),
            saved: Mutex::new(Vec::new()),
            read_result: Mutex::new(None),
        });
        let services = Services {
            invoker: invoker.clone(),
            dialogs: dialogs.clone(),
            notify: Arc::new(MockNotify {
                timeline: Arc::clone(&timeline),
            }),
            navigator: navigator.clone(),
            data_source: data_source.clone(),
            ui: Arc::new(MockUi {
                timeline: Arc::clone(&timeline),
            }),
            scheduler: Arc::new(TokioScheduler),
            download: Arc::new(MockFrame {
                timeline: Arc::clone(&timeline),
            }),
        };
        Self {
            timeline,
            session,
            registry,
            invoker,
            dialogs,
            navigator,
            data_source,
            services,
        }
    }

    pub fn runner(&self) -> ChainRunner {
        ChainRunner::new(
            self.session.clone(),
            self.services.clone(),
            Arc::clone(&self.registry),
            TriggerElement::default(),
        )
    }

    pub fn handler(&self, options: HandlerOptions) -> formact::Result<ActionHandler> {
        ActionHandler::new(
            self.session.clone(),
            self.services.clone(),
            Arc::clone(&self.registry),
            options,
        )
    }

    pub fn register_field(&self, name: &str) -> Arc<MockWidget> {
        let widget = MockWidget::field(&self.timeline, name);
        self.registry.register(Region::Body, widget.clone());
        widget
    }

    pub fn timeline(&self) -> Vec<String> {
        self.timeline.lock().clone()
    }

    pub fn entries_with(&self, prefix: &str) -> Vec<String> {
        self.timeline
            .lock()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub fn position_of(&self, entry: &str) -> Option<usize> {
        self.timeline.lock().iter().position(|e| e == entry)
    }

    pub fn invoked(&self) -> Vec<String> {
        self.invoker.calls(&self.timeline)
    }
}
