//! Wizard state and actions.

use crate::draft::{
    CoverImage, DraftField, DraftFlag, EventCategory, EventDraft, EventId, TicketField,
};
use crate::environment::PendingUpload;
use crate::sections::{Section, SectionRouter};
use crate::validation::ValidationErrors;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Whether the wizard creates a new event or edits an existing one
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionMode {
    /// New event; the draft is autosaved and restored
    #[default]
    Create,
    /// Existing event; the draft slot is never touched
    Edit(EventId),
}

impl SessionMode {
    /// `true` in create mode
    #[must_use]
    pub const fn is_create(&self) -> bool {
        matches!(self, Self::Create)
    }
}

/// Submission lifecycle
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    /// Form is editable
    #[default]
    Editing,
    /// Waiting on the submitter; the form is locked
    Submitting,
    /// The submitter accepted the event
    Succeeded,
    /// The submitter failed; the message is shown to the user
    Failed(String),
}

/// State of one wizard session
#[derive(Clone, Debug, Default)]
pub struct WizardState {
    /// Create or edit
    pub mode: SessionMode,
    /// Current form values
    pub draft: EventDraft,
    /// Errors on screen.
    ///
    /// Replaced wholesale on submit, pruned one path at a time by edits.
    pub errors: ValidationErrors,
    /// Section on screen
    pub router: SectionRouter,
    /// Submission lifecycle
    pub phase: SubmitPhase,
    /// The draft came from the slot rather than a blank form
    pub draft_restored: bool,
    /// Cover file to upload on submit
    pub pending_upload: Option<PendingUpload>,
    /// Path of the image whose preview is being built
    pub image_loading: Option<PathBuf>,
    /// Why the last preview failed
    pub image_error: Option<String>,
    /// When autosave last succeeded
    pub last_saved_at: Option<DateTime<Utc>>,
}

impl WizardState {
    /// Blank form in `mode`
    #[must_use]
    pub fn new(mode: SessionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Seed the form with `draft`
    #[must_use]
    pub fn with_draft(mut self, draft: EventDraft, restored: bool) -> Self {
        self.draft = draft;
        self.draft_restored = restored;
        self
    }

    /// A submission is in flight; controls are disabled
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self.phase, SubmitPhase::Submitting)
    }

    /// Section on screen
    #[must_use]
    pub const fn active_section(&self) -> Section {
        self.router.active()
    }
}

/// Everything that can happen in the wizard
#[derive(Clone, Debug, PartialEq)]
pub enum WizardAction {
    // Form edits
    /// Overwrite a text field
    SetField {
        /// Field to change
        field: DraftField,
        /// Raw text as typed
        value: String,
    },
    /// Pick a category
    SetCategory(EventCategory),
    /// Flip a boolean field
    ToggleFlag(DraftFlag),
    /// Add a tag
    AddTag(String),
    /// Remove a tag
    RemoveTag(String),
    /// Append a blank tier
    AddTicketTier,
    /// Overwrite one field of a tier
    UpdateTicketTier {
        /// Tier position
        index: usize,
        /// Field to change
        field: TicketField,
        /// Raw text as typed
        value: String,
    },
    /// Remove a tier; later tiers shift down
    RemoveTicketTier {
        /// Tier position
        index: usize,
    },
    /// Replace the whole form
    ReplaceDraft(EventDraft),

    // Cover image
    /// The user picked an image file
    SelectCoverImage {
        /// Local file path
        path: PathBuf,
    },
    /// Preview for `path` is ready
    CoverImageLoaded {
        /// Path the preview was built from
        path: PathBuf,
        /// The preview
        image: CoverImage,
    },
    /// Preview for `path` could not be built
    CoverImageFailed {
        /// Path the preview was requested for
        path: PathBuf,
        /// Why it failed
        error: String,
    },
    /// Drop the cover image
    RemoveCoverImage,

    // Navigation
    /// Show a section
    GoToSection(Section),
    /// Show the next section
    NextSection,
    /// Show the previous section
    PreviousSection,
    /// Recompute the error map
    Validate,

    // Persistence
    /// Autosave quiet period elapsed
    AutosaveElapsed,
    /// Slot write finished
    DraftSaved {
        /// Timestamp written into the envelope
        at: DateTime<Utc>,
    },
    /// Slot write failed
    DraftSaveFailed {
        /// Why
        error: String,
    },
    /// Throw away the saved draft and start blank
    DiscardDraft,

    // Submission
    /// Validate and, if clean, submit
    Submit,
    /// The submitter accepted the event
    SubmitSucceeded,
    /// The submitter failed (error or panic)
    SubmitFailed {
        /// Message for the user
        error: String,
    },
}
