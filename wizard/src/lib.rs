//! Event creation wizard engine.
//!
//! Holds an in-progress event definition while a user fills in a multi-section
//! form, and coordinates everything around it:
//!
//! - Field validation with per-field messages ([`validation`])
//! - Routing blocked submissions to the first section with an error ([`sections`])
//! - Debounced autosave to a single draft slot, restored on the next visit ([`persistence`])
//! - Submission through an injected backend with a busy lock ([`reducer`], [`session`])
//!
//! Rendering, networking, and image transcoding are out of scope; they sit
//! behind the traits in [`environment`].
//!
//! # Quick Start
//!
//! ```no_run
//! use event_wizard::{
//!     DraftField, FileDraftSlot, FileImageLoader, SessionOptions, WizardAction,
//!     WizardEnvironment, WizardSession,
//! };
//! # use event_wizard::{CollaboratorFuture, EventDraft, EventSubmitter, PendingUpload};
//! use event_wizard_core::environment::SystemClock;
//! use std::sync::Arc;
//!
//! # struct Backend;
//! # impl EventSubmitter for Backend {
//! #     fn submit(&self, _: EventDraft, _: Option<PendingUpload>) -> CollaboratorFuture<'_, ()> {
//! #         Box::pin(async { Ok(()) })
//! #     }
//! # }
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = WizardEnvironment::new(
//!     Arc::new(SystemClock),
//!     Arc::new(FileDraftSlot::new(".event-wizard/draft.json")),
//!     Arc::new(Backend),
//!     Arc::new(FileImageLoader::default()),
//! );
//! let session = WizardSession::start(env, SessionOptions::create()).await?;
//!
//! session
//!     .send(WizardAction::SetField {
//!         field: DraftField::Title,
//!         value: "Rust Meetup".to_string(),
//!     })
//!     .await?;
//!
//! if let Err(error) = session.submit().await {
//!     println!("Not submitted: {error}");
//! }
//! session.teardown().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod draft;
pub mod environment;
pub mod file_slot;
pub mod image;
pub mod persistence;
pub mod reducer;
pub mod sections;
pub mod session;
pub mod state;
pub mod tickets;
pub mod validation;

// Re-export commonly used types
pub use config::{ConfigError, WizardConfig};
pub use draft::{
    CoverImage, DraftField, DraftFlag, EventCategory, EventDraft, EventDraftPatch, EventId,
    TicketField, TicketTier,
};
pub use environment::{
    CollaboratorError, CollaboratorFuture, EventSubmitter, ImageLoader, InitialDataLoader,
    PendingUpload, WizardEnvironment,
};
pub use file_slot::FileDraftSlot;
pub use image::FileImageLoader;
pub use persistence::{AUTOSAVE, DRAFT_WRITE, PersistedDraft};
pub use reducer::WizardReducer;
pub use sections::{Section, SectionRouter};
pub use session::{SessionError, SessionOptions, SubmitError, WizardSession};
pub use state::{SessionMode, SubmitPhase, WizardAction, WizardState};
pub use validation::{ValidationErrors, validate};
