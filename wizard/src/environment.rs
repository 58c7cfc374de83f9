//! Injected collaborators.
//!
//! The reducer never performs I/O itself. Everything outside the wizard
//! (the clock, the draft slot, the backend that accepts a finished event, the
//! loader for an existing event, and image previews) sits behind a trait
//! here, so tests swap in deterministic fakes.

use crate::draft::{CoverImage, EventDraft, EventDraftPatch, EventId};
use event_wizard_core::draft_slot::DraftSlot;
use event_wizard_core::environment::Clock;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors reported by collaborators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The backend refused the request
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// The backend could not be reached
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The requested event does not exist
    #[error("Event not found: {0}")]
    NotFound(String),

    /// Local input was unusable (e.g. an oversized image)
    #[error("Invalid input: {0}")]
    Invalid(String),

    /// Local I/O failed
    #[error("I/O error: {0}")]
    Io(String),
}

/// Boxed future returned by collaborator methods
pub type CollaboratorFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, CollaboratorError>> + Send + 'a>>;

/// The cover image file selected for upload on submit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingUpload {
    /// Local file path
    pub path: PathBuf,
}

impl PendingUpload {
    /// Upload for the file at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Final path component, if any
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }
}

/// Accepts a finished event (create or update)
pub trait EventSubmitter: Send + Sync {
    /// Persist the event, uploading `cover` if one was selected
    fn submit(
        &self,
        draft: EventDraft,
        cover: Option<PendingUpload>,
    ) -> CollaboratorFuture<'_, ()>;
}

/// Loads an existing event for editing
pub trait InitialDataLoader: Send + Sync {
    /// Fetch the stored fields of event `id`
    fn load<'a>(&'a self, id: &'a EventId) -> CollaboratorFuture<'a, EventDraftPatch>;
}

/// Produces a displayable preview for a selected image file
pub trait ImageLoader: Send + Sync {
    /// Build a preview of the image at `path`
    fn load_preview<'a>(&'a self, path: &'a Path) -> CollaboratorFuture<'a, CoverImage>;
}

/// Everything the wizard reducer depends on
#[derive(Clone)]
pub struct WizardEnvironment {
    /// Timestamps for saved drafts
    pub clock: Arc<dyn Clock>,
    /// Where the create-mode draft is persisted
    pub slot: Arc<dyn DraftSlot>,
    /// Backend receiving submitted events
    pub submitter: Arc<dyn EventSubmitter>,
    /// Image preview builder
    pub images: Arc<dyn ImageLoader>,
    /// Loader for edit mode; `None` when the host only creates events
    pub loader: Option<Arc<dyn InitialDataLoader>>,
    /// Quiet period before an edit is persisted
    pub autosave_interval: Duration,
}

impl WizardEnvironment {
    /// Default quiet period before autosave
    pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_millis(1000);

    /// Environment with the required collaborators
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        slot: Arc<dyn DraftSlot>,
        submitter: Arc<dyn EventSubmitter>,
        images: Arc<dyn ImageLoader>,
    ) -> Self {
        Self {
            clock,
            slot,
            submitter,
            images,
            loader: None,
            autosave_interval: Self::DEFAULT_AUTOSAVE_INTERVAL,
        }
    }

    /// Attach the edit-mode loader
    #[must_use]
    pub fn with_loader(mut self, loader: Arc<dyn InitialDataLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Override the autosave quiet period
    #[must_use]
    pub const fn with_autosave_interval(mut self, interval: Duration) -> Self {
        self.autosave_interval = interval;
        self
    }
}

impl std::fmt::Debug for WizardEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardEnvironment")
            .field("has_loader", &self.loader.is_some())
            .field("autosave_interval", &self.autosave_interval)
            .finish_non_exhaustive()
    }
}
