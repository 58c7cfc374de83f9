//! Scripted demo of the event wizard.
//!
//! Starts a create-mode session against a file-backed draft slot, replays a
//! handful of edits, and shows the wizard blocking, routing, and finally
//! accepting a submission.

use anyhow::Context;
use event_wizard::{
    CollaboratorFuture, DraftField, DraftFlag, EventDraft, EventSubmitter, FileDraftSlot,
    FileImageLoader, PendingUpload, SessionOptions, SubmitError, TicketField, WizardAction,
    WizardConfig, WizardEnvironment, WizardSession,
};
use event_wizard_core::environment::SystemClock;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Submitter that only logs what it receives
struct LoggingSubmitter;

impl EventSubmitter for LoggingSubmitter {
    fn submit(
        &self,
        draft: EventDraft,
        cover: Option<PendingUpload>,
    ) -> CollaboratorFuture<'_, ()> {
        Box::pin(async move {
            info!(
                title = %draft.title,
                tiers = draft.tickets.len(),
                cover = ?cover.as_ref().and_then(PendingUpload::file_name),
                "Event accepted"
            );
            Ok(())
        })
    }
}

fn set(field: DraftField, value: &str) -> WizardAction {
    WizardAction::SetField {
        field,
        value: value.to_string(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = WizardConfig::from_env();
    config.validate()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(draft_path = %config.draft_path.display(), "Starting event wizard demo");

    let env = WizardEnvironment::new(
        Arc::new(SystemClock),
        Arc::new(FileDraftSlot::new(&config.draft_path)),
        Arc::new(LoggingSubmitter),
        Arc::new(FileImageLoader::new(config.max_image_bytes)),
    )
    .with_autosave_interval(config.autosave_interval);

    let session = WizardSession::start(
        env,
        SessionOptions::create().with_store_config(config.store_config()),
    )
    .await
    .context("failed to start wizard session")?;

    if session.state(|s| s.draft_restored).await {
        println!("Restored a saved draft; starting fresh for the demo.");
        session.send(WizardAction::DiscardDraft).await?;
    }

    println!("=== Event Wizard Demo ===\n");
    session.send(set(DraftField::Title, "Rust Meetup")).await?;
    session.send(WizardAction::ToggleFlag(DraftFlag::IsPaid)).await?;
    session.send(WizardAction::AddTicketTier).await?;

    println!("Submitting an incomplete draft...");
    match session.submit().await {
        Err(SubmitError::Invalid { errors, section }) => {
            println!("Blocked. Jumped to {section:?}:");
            for (path, message) in errors.iter() {
                println!("  {path}: {message}");
            }
        },
        other => println!("Unexpected outcome: {other:?}"),
    }

    println!("\nFilling in the rest...");
    for action in [
        set(DraftField::Description, "Monthly talks and pizza"),
        set(DraftField::Location, "Community Hall, 12 Main St"),
        set(DraftField::StartDate, "2025-09-18"),
        set(DraftField::StartTime, "18:30"),
        set(DraftField::EndDate, "2025-09-18"),
        set(DraftField::EndTime, "21:00"),
        WizardAction::AddTag("rust".to_string()),
        WizardAction::UpdateTicketTier {
            index: 0,
            field: TicketField::Name,
            value: "General".to_string(),
        },
        WizardAction::UpdateTicketTier {
            index: 0,
            field: TicketField::Price,
            value: "5".to_string(),
        },
        WizardAction::UpdateTicketTier {
            index: 0,
            field: TicketField::Quantity,
            value: "80".to_string(),
        },
    ] {
        session.send(action).await?;
    }

    match session.submit().await {
        Ok(()) => println!("Submitted."),
        Err(error) => println!("Not submitted: {error}"),
    }

    session.teardown().await?;
    Ok(())
}
