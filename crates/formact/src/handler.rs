//! ActionHandler — the entry point bound to a UI event.
//!
//! One handler is constructed per (element, action) binding and exposes the
//! six event triggers. All of them funnel into [`handle`](ActionHandler::handle),
//! which interprets the bound action text through the chain runner; the
//! handler adds the click-time confirmation gate and the change-time tick
//! deferral on top.

use std::sync::Arc;

use crate::chain::{ChainRunner, TriggerElement};
use crate::error::{ActionError, Result};
use crate::form::FormSession;
use crate::services::{ConfirmOptions, Services};
use crate::widget::FormRegistry;

/// Event triggers a handler can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Load,
    New,
    Save,
    Select,
    Click,
    Change,
}

/// Static binding options of one handler.
#[derive(Debug, Clone, Default)]
pub struct HandlerOptions {
    /// Action text (required; possibly a comma-separated sequence with a
    /// leading `sync` marker).
    pub action: String,
    pub element: TriggerElement,
    /// Whether the binding allows implicit saves (consumed by form-level
    /// gating around this engine).
    pub can_save: bool,
    /// Confirmation prompt shown before click-triggered execution.
    pub prompt: Option<String>,
}

/// Handler for one bound action.
pub struct ActionHandler {
    runner: ChainRunner,
    action: String,
    can_save: bool,
    prompt: Option<String>,
}

impl ActionHandler {
    /// Fails fast with [`ActionError::NoAction`] when no action text is
    /// provided.
    pub fn new(
        session: Arc<dyn FormSession>,
        services: Services,
        registry: Arc<FormRegistry>,
        options: HandlerOptions,
    ) -> Result<Self> {
        let action = options.action.trim().to_string();
        if action.is_empty() {
            return Err(ActionError::NoAction);
        }
        Ok(Self {
            runner: ChainRunner::new(session, services, registry, options.element),
            action,
            can_save: options.can_save,
            prompt: options.prompt,
        })
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn can_save(&self) -> bool {
        self.can_save
    }

    /// Dispatch by trigger, the handler-side binding table.
    pub async fn fire(&self, trigger: Trigger) -> Result<()> {
        match trigger {
            Trigger::Load => self.on_load().await,
            Trigger::New => self.on_new().await,
            Trigger::Save => self.on_save().await,
            Trigger::Select => self.on_select().await,
            Trigger::Click => self.on_click().await,
            Trigger::Change => self.on_change().await,
        }
    }

    pub async fn on_load(&self) -> Result<()> {
        self.handle().await
    }

    pub async fn on_new(&self) -> Result<()> {
        self.handle().await
    }

    pub async fn on_save(&self) -> Result<()> {
        self.handle().await
    }

    pub async fn on_select(&self) -> Result<()> {
        self.handle().await
    }

    /// Click trigger; gated by the optional confirmation prompt.
    pub async fn on_click(&self) -> Result<()> {
        if let Some(prompt) = &self.prompt {
            let confirmed = self
                .runner
                .services
                .dialogs
                .confirm(prompt, ConfirmOptions::default())
                .await;
            if !confirmed {
                return Err(ActionError::Declined);
            }
        }
        self.handle().await
    }

    /// Change trigger; deferred to the next tick so other same-tick
    /// mutations settle before the action reads the record.
    pub async fn on_change(&self) -> Result<()> {
        self.runner.services.scheduler.next_tick().await;
        self.handle().await
    }

    /// Interpret the bound action text.
    pub async fn handle(&self) -> Result<()> {
        self.runner.run(&self.action).await
    }

    /// The save fast-path, exposed for form-level callers.
    pub async fn save(&self) -> Result<()> {
        self.runner.save().await
    }
}

/// Build a handler bound to `element`, mirroring how view definitions
/// attach their event actions.
pub fn handler(
    session: Arc<dyn FormSession>,
    services: Services,
    registry: Arc<FormRegistry>,
    options: HandlerOptions,
) -> Result<ActionHandler> {
    ActionHandler::new(session, services, registry, options)
}
