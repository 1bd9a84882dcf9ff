//! Save fast-path tests — validation, dirty-check, persistence round trip.

use formact::error::ActionError;
use serde_json::json;

use super::mocks::TestBed;

#[tokio::test]
async fn invalid_record_rejects_with_generic_notice() {
    let bed = TestBed::new();
    *bed.session.valid.lock() = false;

    let err = bed.runner().save().await.unwrap_err();
    assert!(matches!(err, ActionError::Validation));
    assert_eq!(
        bed.entries_with("notify-error:"),
        vec!["notify-error:Validation error:Please correct the invalid form values."]
    );
    assert!(bed.entries_with("ds-save").is_empty(), "no network call on local failure");
}

#[tokio::test]
async fn invalid_record_uses_the_form_notice_when_available() {
    let bed = TestBed::new();
    *bed.session.valid.lock() = false;
    *bed.session.notice_handled.lock() = true;

    let err = bed.runner().save().await.unwrap_err();
    assert!(matches!(err, ActionError::Validation));
    assert!(bed.entries_with("notify-error:").is_empty());
}

#[tokio::test]
async fn clean_record_resolves_without_network() {
    let bed = TestBed::new();
    *bed.session.dirty.lock() = false;

    bed.runner().save().await.unwrap();
    assert!(bed.entries_with("ds-save").is_empty());
    assert!(bed.entries_with("ds-read").is_empty());
}

#[tokio::test]
async fn dirty_record_saves_rereads_and_loads() {
    let bed = TestBed::new();

    bed.runner().save().await.unwrap();

    let save = bed.position_of("ds-save").expect("persisted");
    let read = bed.entries_with("ds-read:").first().cloned().expect("re-read");
    let read_pos = bed.position_of(&read).unwrap();
    let edit = bed
        .timeline()
        .iter()
        .position(|e| e.starts_with("session-edit:"))
        .expect("record loaded into the form");
    let route = bed.position_of("session-route").expect("route updated");
    assert!(save < read_pos && read_pos < edit && edit < route);
    assert_eq!(read, "ds-read:1");
}

#[tokio::test]
async fn original_values_are_sent_along() {
    let bed = TestBed::new();
    *bed.session.original.lock() = json!({"id": 1, "name": "persisted"})
        .as_object()
        .cloned();

    bed.runner().save().await.unwrap();

    let saved = bed.data_source.saved.lock();
    assert_eq!(
        saved[0].get("_original"),
        Some(&json!({"id": 1, "name": "persisted"}))
    );
}

#[tokio::test]
async fn session_save_hook_skips_generic_persistence() {
    let bed = TestBed::new();
    *bed.session.save_hook_handled.lock() = true;

    bed.runner().save().await.unwrap();

    assert_eq!(bed.entries_with("session-save-hook").len(), 1);
    assert!(bed.entries_with("ds-save").is_empty());
}

#[tokio::test]
async fn session_read_override_skips_data_source_read() {
    let bed = TestBed::new();
    *bed.session.read_override.lock() = json!({"id": 1, "version": 1, "name": "custom"})
        .as_object()
        .cloned();

    bed.runner().save().await.unwrap();

    assert_eq!(bed.entries_with("session-read-override").len(), 1);
    assert_eq!(bed.entries_with("ds-save").len(), 1);
    assert!(bed.entries_with("ds-read:").is_empty());
}
