//! Behaviour of the summary step against fake collaborators.

mod common;

use common::{did_key, management_key, Harness, DID, RECORDED_URL};
use did_wizard::components::summary::{
    RecordOutcome, SummaryComponent, RECORD_BUTTON_LABEL, RECORD_BUTTON_LABEL_SHORT,
    VAULT_PASSWORD_PROMPT,
};
use did_wizard::error::{RecordError, UNEXPECTED_SAVE_ERROR};
use did_wizard::models::did::DIDDocument;
use did_wizard::services::workflow::MANAGE_DIDS_ROUTE;
use did_wizard::store::Action;
use did_wizard::ui::{DialogKind, ModalSize};
use tokio_test::{assert_pending, assert_ready};

#[test]
fn test_preview_is_pretty_printed_draft() {
    let harness = Harness::builder().build();
    let summary = SummaryComponent::initialize(harness.context()).unwrap();

    assert_eq!(summary.did_id(), DID);
    assert_eq!(
        summary.entry_preview(),
        serde_json::to_string_pretty(summary.entry()).unwrap()
    );
    let parsed: DIDDocument = serde_json::from_str(summary.entry_preview()).unwrap();
    assert_eq!(&parsed, summary.entry());
    assert!(summary.entry_preview().contains("\n  \"managementKey\""));
}

#[test]
fn test_draft_generated_once_per_activation() {
    let harness = Harness::builder().build();
    let summary = SummaryComponent::initialize(harness.context()).unwrap();
    harness
        .store
        .dispatch(Action::AddDidKey(did_key("late-addition")));

    assert_eq!(summary.entry().did_key.len(), 1);
    assert_eq!(
        harness
            .log
            .calls()
            .iter()
            .filter(|c| c.starts_with("generate_entry"))
            .count(),
        1
    );
    assert!(harness.log.contains("generate_entry:CreateDIDEntry"));
}

#[test]
fn test_button_label_follows_device() {
    let desktop = Harness::builder().build();
    let summary = SummaryComponent::initialize(desktop.context()).unwrap();
    assert_eq!(summary.button_label(), RECORD_BUTTON_LABEL);

    let mobile = Harness::builder().mobile().build();
    let summary = SummaryComponent::initialize(mobile.context()).unwrap();
    assert_eq!(summary.button_label(), RECORD_BUTTON_LABEL_SHORT);
}

#[tokio::test]
async fn test_cancelled_dialog_calls_nothing() {
    for answer in [None, Some("")] {
        let harness = Harness::builder().dialog_answers(vec![answer]).build();
        let summary = SummaryComponent::initialize(harness.context()).unwrap();

        let outcome = summary.record_on_chain().await;
        assert!(matches!(outcome, RecordOutcome::Cancelled));
        assert!(!harness.log.contains("can_decrypt_vault"));
        assert!(!harness.log.contains("record_create_entry_on_chain"));
        assert!(!harness.log.contains("save_did_to_vault"));
        assert!(!harness.log.contains("spinner.show"));
    }
}

#[tokio::test]
async fn test_dialog_opened_with_password_prompt() {
    let harness = Harness::builder().build();
    let summary = SummaryComponent::initialize(harness.context()).unwrap();
    summary.record_on_chain().await;

    let opened = harness.dialogs.opened_with.lock().unwrap().clone();
    assert_eq!(
        opened,
        vec![(
            DialogKind::Password,
            ModalSize::ExtraExtraLarge,
            VAULT_PASSWORD_PROMPT.to_string()
        )]
    );
}

#[tokio::test]
async fn test_wrong_password_stops_before_ledger() {
    let harness = Harness::builder().unlock_fails().build();
    let summary = SummaryComponent::initialize(harness.context()).unwrap();

    let outcome = summary.record_on_chain().await;
    assert!(matches!(
        outcome,
        RecordOutcome::Failed(RecordError::VaultLocked(_))
    ));
    assert!(!harness.log.contains("record_create_entry_on_chain"));
    assert!(!harness.log.contains("save_did_to_vault"));
    assert!(!harness.spinner_visible());
    assert_eq!(
        *harness.notifier.errors.lock().unwrap(),
        vec!["Invalid vault password".to_string()]
    );
}

#[tokio::test]
async fn test_ledger_error_leaves_vault_untouched() {
    let harness = Harness::builder()
        .ledger_rejects("Entry size exceeds the limit")
        .build();
    let summary = SummaryComponent::initialize(harness.context()).unwrap();

    let outcome = summary.record_on_chain().await;
    assert!(matches!(outcome, RecordOutcome::Failed(RecordError::Ledger(_))));
    assert!(!harness.log.contains("save_did_to_vault"));
    assert!(!harness.log.contains("workflow.next"));
    assert!(!harness.spinner_visible());
    assert_eq!(
        *harness.notifier.errors.lock().unwrap(),
        vec!["Entry size exceeds the limit".to_string()]
    );
}

#[tokio::test]
async fn test_success_advances_with_url_and_did() {
    let harness = Harness::builder().build();
    let summary = SummaryComponent::initialize(harness.context()).unwrap();

    let outcome = summary.record_on_chain().await;
    let context = match outcome {
        RecordOutcome::Recorded(context) => context,
        other => panic!("expected Recorded, got {:?}", other),
    };
    assert_eq!(context.get("url"), Some(RECORDED_URL));
    assert_eq!(context.get("didId"), Some(DID));
    assert_eq!(context.query_params().len(), 2);

    assert_eq!(*harness.workflow.advanced_with.lock().unwrap(), vec![context]);
    assert!(harness.notifier.errors.lock().unwrap().is_empty());
    assert!(harness.router.routes.lock().unwrap().is_empty());
    assert!(!harness.spinner_visible());

    assert_eq!(
        harness.log.calls(),
        vec![
            "generate_entry:CreateDIDEntry",
            "dialog.open",
            "spinner.show",
            "can_decrypt_vault",
            "record_create_entry_on_chain",
            "save_did_to_vault",
            "spinner.hide",
            "clear_data",
            "workflow.next",
        ]
    );
}

#[tokio::test]
async fn test_saved_keys_match_submitted_draft() {
    let harness = Harness::builder().build();
    let summary = SummaryComponent::initialize(harness.context()).unwrap();
    summary.record_on_chain().await;

    let submitted = harness.identity.submitted.lock().unwrap().clone();
    assert_eq!(submitted, vec![summary.entry().clone()]);

    let saved = harness.vault.saved.lock().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].did_id, DID);
    assert_eq!(&saved[0].document, summary.entry());
    assert_eq!(saved[0].management_keys, vec![management_key("management-0")]);
    assert_eq!(saved[0].did_keys, vec![did_key("signing-0")]);
    assert_eq!(saved[0].password, "vault-password");
    assert!(summary
        .entry()
        .carries_keys(&saved[0].management_keys, &saved[0].did_keys));
}

#[tokio::test]
async fn test_save_failure_redirects_to_manage_dids() {
    let harness = Harness::builder().save_fails().build();
    let summary = SummaryComponent::initialize(harness.context()).unwrap();

    let outcome = summary.record_on_chain().await;
    assert!(matches!(
        outcome,
        RecordOutcome::Failed(RecordError::Persistence(_))
    ));
    assert_eq!(
        *harness.router.routes.lock().unwrap(),
        vec![MANAGE_DIDS_ROUTE.to_string()]
    );
    assert!(!harness.log.contains("workflow.next"));
    assert!(!harness.log.contains("clear_data"));
    assert!(!harness.spinner_visible());
    assert_eq!(
        *harness.notifier.errors.lock().unwrap(),
        vec![UNEXPECTED_SAVE_ERROR.to_string()]
    );
}

#[tokio::test]
async fn test_second_trigger_while_in_flight_is_rejected() {
    let harness = Harness::builder().dialog_answers(vec![]).build();
    let summary = SummaryComponent::initialize(harness.context()).unwrap();

    let mut first = tokio_test::task::spawn(summary.record_on_chain());
    assert_pending!(first.poll());
    assert!(summary.is_recording());

    let second = summary.record_on_chain().await;
    assert!(matches!(second, RecordOutcome::AlreadyInFlight));
    assert_eq!(
        harness
            .log
            .calls()
            .iter()
            .filter(|c| *c == "dialog.open")
            .count(),
        1
    );

    harness.dialogs.answer_pending(None);
    assert!(first.is_woken());
    let outcome = assert_ready!(first.poll());
    assert!(matches!(outcome, RecordOutcome::Cancelled));
    drop(first);
    assert!(!summary.is_recording());
}

#[tokio::test]
async fn test_can_record_again_after_failure() {
    let harness = Harness::builder()
        .unlock_fails()
        .dialog_answers(vec![Some("first"), Some("second")])
        .build();
    let summary = SummaryComponent::initialize(harness.context()).unwrap();

    summary.record_on_chain().await;
    summary.record_on_chain().await;
    assert_eq!(
        harness
            .log
            .calls()
            .iter()
            .filter(|c| *c == "can_decrypt_vault")
            .count(),
        2
    );
}

#[test]
fn test_go_to_previous_moves_back() {
    let harness = Harness::builder().build();
    let summary = SummaryComponent::initialize(harness.context()).unwrap();
    summary.go_to_previous();
    assert!(harness.log.contains("workflow.previous"));
}

#[test]
fn test_destroy_releases_subscription() {
    let harness = Harness::builder().build();
    let mut summary = SummaryComponent::initialize(harness.context()).unwrap();
    assert!(summary.is_subscribed());
    assert_eq!(harness.store.subscriber_count(), 1);

    summary.destroy();
    assert!(!summary.is_subscribed());
    assert_eq!(harness.store.subscriber_count(), 0);
}

#[test]
fn test_drop_releases_subscription() {
    let harness = Harness::builder().build();
    let summary = SummaryComponent::initialize(harness.context()).unwrap();
    drop(summary);
    assert_eq!(harness.store.subscriber_count(), 0);
}
