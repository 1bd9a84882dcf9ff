//! ActionChainRunner — the state machine walking an action chain.
//!
//! Items are processed strictly in order: item *i+1* does not start until
//! item *i*'s asynchronous effects (dialogs, saves, reloads) have settled.
//! Each item's directives are evaluated in a fixed priority; a `pending`
//! action name abandons the remaining items and substitutes a brand-new
//! chain for that action inside the same surrounding loop. A rejection
//! anywhere short-circuits all subsequent items and propagates to the
//! original trigger's promise.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::chain::context::{ContextCell, TriggerElement};
use crate::error::{ActionError, Result};
use crate::export;
use crate::form::{FormEvent, FormSession};
use crate::protocol::{normalize_view, ResponseItem};
use crate::record::merge::{merge, MergeOutcome};
use crate::record::ID;
use crate::services::{ConfirmOptions, NotifyOptions, Services};
use crate::widget::apply::apply_attrs;
use crate::widget::invalid::attach_error;
use crate::widget::FormRegistry;

type BoxedFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Runs action chains against one form session.
pub struct ChainRunner {
    pub(crate) session: Arc<dyn FormSession>,
    pub(crate) services: Services,
    pub(crate) registry: Arc<FormRegistry>,
    pub(crate) context: ContextCell,
    pub(crate) element: TriggerElement,
}

impl ChainRunner {
    pub fn new(
        session: Arc<dyn FormSession>,
        services: Services,
        registry: Arc<FormRegistry>,
        element: TriggerElement,
    ) -> Self {
        Self {
            session,
            services,
            registry,
            context: ContextCell::new(),
            element,
        }
    }

    /// Run the given action text to completion.
    pub async fn run(&self, action: &str) -> Result<()> {
        self.run_action(action.trim().to_string()).await
    }

    /// Execute one action: resolve the `sync` marker and the `save`
    /// special case, otherwise invoke the remote action and process its
    /// chain. Boxed because chains recurse through `pending` and follow-up
    /// actions.
    fn run_action(&self, action: String) -> BoxedFuture<'_, Result<()>> {
        Box::pin(async move {
            self.block_ui();

            if action.is_empty() {
                return Ok(());
            }

            if let Some(rest) = split_sync_prefix(&action) {
                if let Err(prevented) = self.session.before_save() {
                    if let Some(message) = &prevented.message {
                        self.services.dialogs.error(message).await;
                    }
                    return Err(ActionError::Prevented(prevented));
                }
                return self.run_action(rest).await;
            }

            if action == "save" {
                return self.save().await;
            }

            let context = self.context.get(self.session.as_ref(), &self.element);
            let model = context
                .get("_model")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| self.session.model());

            debug!(action = %action, model = %model, "invoking remote action");
            let response = self
                .services
                .invoker
                .invoke(&action, &model, &context)
                .await?;
            self.run_chain(response.into_items()).await
        })
    }

    /// Walk the ordered item list, waiting for the UI to settle between
    /// items and substituting a new chain when an item yields `pending`.
    fn run_chain(&self, items: Vec<ResponseItem>) -> BoxedFuture<'_, Result<()>> {
        Box::pin(async move {
            for item in items {
                let pending = self.run_single(&item).await?;
                if let Some(next) = pending {
                    return self.run_action(next).await;
                }
                self.services.scheduler.settle().await;
            }
            Ok(())
        })
    }

    /// Evaluate one item's directives in fixed priority. Returns the
    /// `pending` action name when the remaining chain must be substituted.
    async fn run_single(&self, item: &ResponseItem) -> Result<Option<String>> {
        if let Some(message) = item.flash_message() {
            self.services.dialogs.say(message);
        }
        if let Some(message) = &item.notify {
            self.services.notify.info(message);
        }

        if let Some(message) = &item.error {
            self.services.dialogs.error(message).await;
            if let Some(action) = &item.action {
                // recovery action runs for its side effects; the chain
                // still rejects with the original error
                let _ = self.run_action(action.clone()).await;
            }
            return Err(ActionError::Blocking(message.clone()));
        }

        if let Some(message) = &item.alert {
            let confirmed = self
                .services
                .dialogs
                .confirm(
                    message,
                    ConfirmOptions {
                        title: Some("Warning".to_string()),
                        yes_no: false,
                    },
                )
                .await;
            if confirmed {
                return Ok(item.pending.clone());
            }
            if let Some(action) = &item.action {
                let _ = self.run_action(action.clone()).await;
            }
            return Err(ActionError::Declined);
        }

        if let Some(errors) = &item.errors {
            if !errors.is_empty() {
                let prefix = self.session.field_prefix();
                let bus = self.session.bus();
                for (field, message) in errors {
                    // only the first bound widget carries the inline error
                    if let Some(widget) =
                        self.registry.locate(field, prefix.as_deref()).first()
                    {
                        attach_error(&bus, widget, message);
                    }
                }
                return Err(ActionError::FieldErrors(errors.clone()));
            }
        }

        if let Some(values) = &item.values {
            let mut outcome = MergeOutcome::default();
            self.session
                .update_record(&mut |record| outcome = merge(values, record));
            if outcome.changed {
                let bus = self.session.bus();
                for deferred in outcome.deferred {
                    bus.emit(&FormEvent::NestedValues {
                        field: deferred.field,
                        values: deferred.values,
                    });
                }
                self.session.change_notify(values);
            }
            self.context.invalidate();
            self.services.ui.adjust_layout();
        }

        if item.reload {
            self.context.invalidate();
            self.session.reload().await;
            return Ok(item.pending.clone());
        }

        if item.save {
            // let same-tick mutations settle before reading the record
            self.services.scheduler.next_tick().await;
            self.save().await?;
            self.services.scheduler.delay_ms(100).await;
            self.services.scheduler.settle().await;
            return Ok(item.pending.clone());
        }

        if let Some(signal) = &item.signal {
            self.session
                .bus()
                .emit_signal(signal.clone(), item.signal_data.clone());
        }

        if let Some(token) = &item.export_file {
            export::download(&self.services.download, token);
        }

        if let Some(attrs) = &item.attrs {
            let prefix = self.session.field_prefix();
            for (name, attr_map) in attrs {
                let widgets = self.registry.locate(name, prefix.as_deref());
                for (index, widget) in widgets.iter().enumerate() {
                    apply_attrs(widget, attr_map, index);
                }
            }
        }

        if let Some(view) = &item.view {
            let mut view = view.clone();
            let anchor = self.session.form_name();
            normalize_view(&mut view, Some(&anchor));
            self.services.navigator.open_tab(view);
        }

        if item.can_close {
            self.session.on_close();
        }

        Ok(item.pending.clone())
    }

    /// The save fast-path: local validation, dirty-check, persist,
    /// re-fetch and load the saved record back into the form.
    pub async fn save(&self) -> Result<()> {
        self.block_ui();

        if !self.session.is_valid() {
            if !self.session.show_error_notice() {
                self.services.notify.error(
                    "Please correct the invalid form values.",
                    NotifyOptions {
                        title: Some("Validation error".to_string()),
                    },
                );
            }
            return Err(ActionError::Validation);
        }
        if !self.session.is_dirty() {
            return Ok(());
        }

        let mut values = self.session.record();
        if let Some(original) = self.session.original() {
            values.insert("_original".to_string(), Value::Object(original));
        }
        self.context.invalidate();

        if self.session.save_hook(&values).await {
            return Ok(());
        }

        let saved = self.services.data_source.save(&values).await?;
        let id = saved.get(ID).cloned().unwrap_or(Value::Null);
        let record = match self.session.read_override(&id).await {
            Some(read) => read?,
            None => self.services.data_source.read(&id).await?,
        };
        self.session.edit_record(record);
        self.session.update_route();
        Ok(())
    }

    /// Schedule the blocking overlay with a short activation delay so
    /// instant chains never flash it.
    fn block_ui(&self) {
        let ui = Arc::clone(&self.services.ui);
        tokio::spawn(async move {
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
            ui.block();
        });
    }
}

/// Recognize the `sync` action marker: a bare `sync`, or `sync` followed by
/// a comma-separated continuation. Returns the remaining action text.
fn split_sync_prefix(action: &str) -> Option<String> {
    let rest = action.strip_prefix("sync")?;
    let rest = rest.trim_start();
    if rest.is_empty() {
        return Some(String::new());
    }
    rest.strip_prefix(',')
        .map(|after| after.trim_start().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
