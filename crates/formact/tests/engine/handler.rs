//! ActionHandler tests — trigger bindings, prompt gate, construction.

use formact::chain::TriggerElement;
use formact::error::ActionError;
use formact::{HandlerOptions, Trigger};
use serde_json::json;

use super::mocks::TestBed;

fn options(action: &str) -> HandlerOptions {
    HandlerOptions {
        action: action.to_string(),
        ..HandlerOptions::default()
    }
}

#[tokio::test]
async fn missing_action_fails_at_construction() {
    let bed = TestBed::new();
    let err = match bed.handler(options("   ")) {
        Err(err) => err,
        Ok(_) => panic!("construction must fail without an action"),
    };
    assert!(matches!(err, ActionError::NoAction));
}

#[tokio::test]
async fn action_text_is_trimmed() {
    let bed = TestBed::new();
    bed.invoker.respond("compute", json!({"data": []}));
    let handler = bed.handler(options("  compute  ")).unwrap();
    assert_eq!(handler.action(), "compute");
    handler.on_load().await.unwrap();
    assert_eq!(bed.invoked(), vec!["compute"]);
}

#[tokio::test]
async fn click_prompt_declined_rejects_without_invoking() {
    let bed = TestBed::new();
    *bed.dialogs.confirm_with.lock() = false;
    let handler = bed
        .handler(HandlerOptions {
            action: "dangerous".to_string(),
            prompt: Some("Are you sure?".to_string()),
            ..HandlerOptions::default()
        })
        .unwrap();

    let err = handler.on_click().await.unwrap_err();
    assert!(matches!(err, ActionError::Declined));
    assert!(bed.invoked().is_empty());
    assert_eq!(bed.entries_with("confirm:"), vec!["confirm:Are you sure?:"]);
}

#[tokio::test]
async fn click_prompt_confirmed_runs_the_action() {
    let bed = TestBed::new();
    bed.invoker.respond("dangerous", json!({"data": []}));
    let handler = bed
        .handler(HandlerOptions {
            action: "dangerous".to_string(),
            prompt: Some("Are you sure?".to_string()),
            ..HandlerOptions::default()
        })
        .unwrap();

    handler.on_click().await.unwrap();
    assert_eq!(bed.invoked(), vec!["dangerous"]);
}

#[tokio::test]
async fn click_without_prompt_runs_directly() {
    let bed = TestBed::new();
    bed.invoker.respond("plain", json!({"data": []}));
    let handler = bed.handler(options("plain")).unwrap();
    handler.on_click().await.unwrap();
    assert_eq!(bed.invoked(), vec!["plain"]);
    assert!(bed.entries_with("confirm:").is_empty());
}

#[tokio::test]
async fn change_trigger_defers_then_runs() {
    let bed = TestBed::new();
    bed.invoker.respond("onchange", json!({"data": []}));
    let handler = bed.handler(options("onchange")).unwrap();
    handler.on_change().await.unwrap();
    assert_eq!(bed.invoked(), vec!["onchange"]);
}

#[tokio::test]
async fn fire_dispatches_every_trigger() {
    let bed = TestBed::new();
    bed.invoker.respond("act", json!({"data": []}));
    let handler = bed.handler(options("act")).unwrap();

    for trigger in [
        Trigger::Load,
        Trigger::New,
        Trigger::Save,
        Trigger::Select,
        Trigger::Click,
        Trigger::Change,
    ] {
        handler.fire(trigger).await.unwrap();
    }
    assert_eq!(bed.invoked().len(), 6);
}

#[tokio::test]
async fn button_trigger_carries_signal_in_context() {
    let bed = TestBed::new();
    bed.invoker.respond("workflow.send", json!({"data": []}));
    let handler = bed
        .handler(HandlerOptions {
            action: "workflow.send".to_string(),
            element: TriggerElement::button("btn-send"),
            ..HandlerOptions::default()
        })
        .unwrap();

    handler.on_click().await.unwrap();

    let contexts = bed.invoker.contexts.lock();
    assert_eq!(contexts[0].get("_signal"), Some(&json!("btn-send")));
    // the _signal key is context-only, never merged back into the record
    assert_eq!(bed.session.record.lock().get("_signal"), None);
}

#[tokio::test]
async fn handler_exposes_the_save_fast_path() {
    let bed = TestBed::new();
    let handler = bed.handler(options("unused")).unwrap();
    handler.save().await.unwrap();
    assert_eq!(bed.entries_with("ds-save").len(), 1);
    assert!(bed.invoked().is_empty());
}

#[tokio::test]
async fn can_save_option_is_exposed() {
    let bed = TestBed::new();
    let handler = bed
        .handler(HandlerOptions {
            action: "act".to_string(),
            can_save: true,
            ..HandlerOptions::default()
        })
        .unwrap();
    assert!(handler.can_save());
}
