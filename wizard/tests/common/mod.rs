//! Shared fakes for wizard integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::panic)]

use event_wizard::{
    CollaboratorError, CollaboratorFuture, CoverImage, DraftField, EventDraft, EventDraftPatch,
    EventId, EventSubmitter, ImageLoader, InitialDataLoader, PendingUpload, WizardAction,
    WizardEnvironment,
};
use event_wizard_testing::{InMemoryDraftSlot, test_clock};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

/// Autosave quiet period used by every test environment
pub const QUIET: Duration = Duration::from_millis(1000);

/// What the fake backend does with a submission
#[derive(Clone, Debug)]
pub enum Outcome {
    Accept,
    Reject(CollaboratorError),
    Panic,
}

/// Backend fake that records every submission
pub struct RecordingSubmitter {
    outcome: Mutex<Outcome>,
    calls: Mutex<Vec<(EventDraft, Option<PendingUpload>)>>,
    gate: Option<Arc<Semaphore>>,
}

impl RecordingSubmitter {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self::with_outcome(Outcome::Accept))
    }

    pub fn failing(error: CollaboratorError) -> Arc<Self> {
        Arc::new(Self::with_outcome(Outcome::Reject(error)))
    }

    pub fn panicking() -> Arc<Self> {
        Arc::new(Self::with_outcome(Outcome::Panic))
    }

    /// Accepts, but only once a permit is added to the returned semaphore
    pub fn gated() -> (Arc<Self>, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let submitter = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::with_outcome(Outcome::Accept)
        };
        (Arc::new(submitter), gate)
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome: Mutex::new(outcome),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn set_outcome(&self, outcome: Outcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub fn calls(&self) -> Vec<(EventDraft, Option<PendingUpload>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl EventSubmitter for RecordingSubmitter {
    fn submit(
        &self,
        draft: EventDraft,
        cover: Option<PendingUpload>,
    ) -> CollaboratorFuture<'_, ()> {
        Box::pin(async move {
            self.calls.lock().unwrap().push((draft, cover));
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
            let outcome = self.outcome.lock().unwrap().clone();
            match outcome {
                Outcome::Accept => Ok(()),
                Outcome::Reject(error) => Err(error),
                Outcome::Panic => panic!("backend exploded"),
            }
        })
    }
}

/// Loader returning a fixed patch, or failing when none is set
pub struct StaticLoader(pub Option<EventDraftPatch>);

impl InitialDataLoader for StaticLoader {
    fn load<'a>(&'a self, id: &'a EventId) -> CollaboratorFuture<'a, EventDraftPatch> {
        Box::pin(async move {
            self.0
                .clone()
                .ok_or_else(|| CollaboratorError::NotFound(id.to_string()))
        })
    }
}

/// Image loader that echoes the file name into the preview
pub struct EchoImages;

impl ImageLoader for EchoImages {
    fn load_preview<'a>(&'a self, path: &'a Path) -> CollaboratorFuture<'a, CoverImage> {
        Box::pin(async move {
            let file_name = path.file_name().unwrap().to_string_lossy().into_owned();
            Ok(CoverImage {
                preview: format!("data:image/png;base64,{file_name}"),
                file_name,
            })
        })
    }
}

pub fn environment(
    slot: &InMemoryDraftSlot,
    submitter: Arc<RecordingSubmitter>,
) -> WizardEnvironment {
    WizardEnvironment::new(
        Arc::new(test_clock()),
        Arc::new(slot.clone()),
        submitter,
        Arc::new(EchoImages),
    )
    .with_autosave_interval(QUIET)
}

pub fn set(field: DraftField, value: &str) -> WizardAction {
    WizardAction::SetField {
        field,
        value: value.to_string(),
    }
}

/// A draft that passes validation
pub fn valid_draft() -> EventDraft {
    EventDraft {
        title: "Tech Summit".into(),
        description: "Two days of talks".into(),
        location: "Convention Center".into(),
        start_date: "2025-10-12".into(),
        start_time: "09:00".into(),
        end_date: "2025-10-13".into(),
        end_time: "17:00".into(),
        ..EventDraft::default()
    }
}

/// Let spawned effect tasks run to completion on the current-thread runtime
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
