//! Debounced autosave and restore, on a paused clock.

#![allow(clippy::unwrap_used)]

mod common;

use common::{QUIET, RecordingSubmitter, environment, set, settle, valid_draft};
use event_wizard::persistence::AUTOSAVE;
use event_wizard::{
    CollaboratorError, DraftField, PersistedDraft, SessionOptions, WizardAction, WizardSession,
};
use event_wizard_core::environment::Clock;
use event_wizard_runtime::StoreError;
use event_wizard_testing::{InMemoryDraftSlot, test_clock};
use std::time::Duration;
use tokio::time::sleep;

const TICK: Duration = Duration::from_millis(10);

async fn start(slot: &InMemoryDraftSlot) -> WizardSession {
    WizardSession::start(
        environment(slot, RecordingSubmitter::accepting()),
        SessionOptions::create(),
    )
    .await
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn titled_draft_survives_reload() {
    let slot = InMemoryDraftSlot::new();

    let first = start(&slot).await;
    first.send(set(DraftField::Title, "Tech Summit")).await.unwrap();
    sleep(QUIET + TICK).await;
    settle().await;
    first.teardown().await.unwrap();

    let saved = PersistedDraft::decode(&slot.contents().unwrap()).unwrap();
    assert_eq!(saved.saved_at, test_clock().now());

    let second = start(&slot).await;
    assert!(second.state(|s| s.draft_restored).await);
    assert_eq!(second.state(|s| s.draft.title.clone()).await, "Tech Summit");
}

#[tokio::test(start_paused = true)]
async fn rapid_edits_write_once_after_quiet_period() {
    let slot = InMemoryDraftSlot::new();
    let session = start(&slot).await;

    session.send(set(DraftField::Title, "T")).await.unwrap();
    sleep(QUIET / 2).await;
    session.send(set(DraftField::Title, "Te")).await.unwrap();
    sleep(QUIET / 2).await;
    session.send(set(DraftField::Title, "Tech")).await.unwrap();
    sleep(QUIET - TICK).await;
    settle().await;
    assert_eq!(slot.save_count(), 0);
    assert_eq!(session.store().live_tasks(AUTOSAVE), 1);

    sleep(TICK * 2).await;
    settle().await;
    assert_eq!(slot.save_count(), 1);
    let saved = PersistedDraft::decode(&slot.contents().unwrap()).unwrap();
    assert_eq!(saved.draft.title, "Tech");
    assert!(session.state(|s| s.last_saved_at.is_some()).await);
}

#[tokio::test(start_paused = true)]
async fn untitled_drafts_are_not_saved() {
    let slot = InMemoryDraftSlot::new();
    let session = start(&slot).await;

    session.send(set(DraftField::Description, "No title yet")).await.unwrap();
    sleep(QUIET * 2).await;
    settle().await;
    assert_eq!(slot.save_count(), 0);

    // Blanking the title cancels a pending save.
    session.send(set(DraftField::Title, "Tech")).await.unwrap();
    session.send(set(DraftField::Title, "  ")).await.unwrap();
    sleep(QUIET * 2).await;
    settle().await;
    assert_eq!(slot.save_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn teardown_cancels_pending_save() {
    let slot = InMemoryDraftSlot::new();
    let session = start(&slot).await;

    session.send(set(DraftField::Title, "Tech Summit")).await.unwrap();
    session.teardown().await.unwrap();
    sleep(QUIET * 3).await;
    settle().await;

    assert_eq!(slot.save_count(), 0);
    assert!(session.is_closed());
    assert!(matches!(
        session.send(set(DraftField::Title, "late")).await,
        Err(StoreError::ShutdownInProgress)
    ));
}

#[tokio::test(start_paused = true)]
async fn failed_writes_are_skipped() {
    let slot = InMemoryDraftSlot::new();
    slot.fail_writes(true);
    let session = start(&slot).await;

    session.send(set(DraftField::Title, "Tech Summit")).await.unwrap();
    sleep(QUIET + TICK).await;
    settle().await;
    assert_eq!(slot.contents(), None);
    assert!(session.state(|s| s.last_saved_at.is_none()).await);

    slot.fail_writes(false);
    session.send(set(DraftField::Title, "Tech Summit!")).await.unwrap();
    sleep(QUIET + TICK).await;
    settle().await;
    assert_eq!(slot.save_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn successful_submit_cancels_pending_save() {
    let slot = InMemoryDraftSlot::new();
    let session = start(&slot).await;

    session
        .send(WizardAction::ReplaceDraft(valid_draft()))
        .await
        .unwrap();
    session.submit().await.unwrap();
    sleep(QUIET * 2).await;
    settle().await;

    assert_eq!(slot.save_count(), 0);
    assert_eq!(slot.contents(), None);
    assert_eq!(session.store().live_tasks(AUTOSAVE), 0);
}

#[tokio::test(start_paused = true)]
async fn discard_clears_restored_draft() {
    let slot = InMemoryDraftSlot::with_contents(
        PersistedDraft::new(valid_draft(), test_clock().now())
            .encode()
            .unwrap(),
    );
    let session = start(&slot).await;
    assert!(session.state(|s| s.draft_restored).await);

    session.send(WizardAction::DiscardDraft).await.unwrap();
    settle().await;

    assert_eq!(slot.contents(), None);
    assert!(!session.state(|s| s.draft_restored).await);
    assert!(session.state(|s| s.draft.title.is_empty()).await);
}

#[tokio::test(start_paused = true)]
async fn autosave_due_mid_submit_never_resurrects_the_draft() {
    let slot = InMemoryDraftSlot::new();
    let (submitter, gate) = RecordingSubmitter::gated();
    let session = WizardSession::start(environment(&slot, submitter), SessionOptions::create())
        .await
        .unwrap();

    session
        .send(WizardAction::ReplaceDraft(valid_draft()))
        .await
        .unwrap();
    let submit = {
        let session = session.clone();
        tokio::spawn(async move { session.submit().await })
    };
    while !session.state(|s| s.is_busy()).await {
        tokio::task::yield_now().await;
    }

    sleep(QUIET + TICK).await;
    settle().await;
    assert_eq!(slot.save_count(), 0);
    assert!(session.state(|s| s.is_busy()).await);

    gate.add_permits(1);
    submit.await.unwrap().unwrap();
    sleep(QUIET * 2).await;
    settle().await;

    assert_eq!(slot.save_count(), 0);
    assert_eq!(slot.contents(), None);
}

#[tokio::test(start_paused = true)]
async fn failed_submit_saves_the_draft_afterwards() {
    let slot = InMemoryDraftSlot::new();
    let submitter = RecordingSubmitter::failing(CollaboratorError::Unavailable("timeout".into()));
    let session = WizardSession::start(environment(&slot, submitter), SessionOptions::create())
        .await
        .unwrap();

    session
        .send(WizardAction::ReplaceDraft(valid_draft()))
        .await
        .unwrap();
    assert!(session.submit().await.is_err());
    sleep(QUIET + TICK).await;
    settle().await;

    assert_eq!(slot.save_count(), 1);
}
