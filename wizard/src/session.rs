//! A running wizard: bootstrap, action dispatch, submit, teardown.

use crate::draft::{EventDraft, EventDraftPatch, EventId};
use crate::environment::{CollaboratorError, WizardEnvironment};
use crate::persistence;
use crate::reducer::WizardReducer;
use crate::sections::Section;
use crate::state::{SessionMode, SubmitPhase, WizardAction, WizardState};
use crate::validation::ValidationErrors;
use event_wizard_runtime::{EffectHandle, Store, StoreConfig, StoreError};
use thiserror::Error;

/// Store type behind a session
pub type WizardStore = Store<WizardState, WizardAction, WizardEnvironment, WizardReducer>;

/// Session lifecycle errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// Edit mode needs an [`InitialDataLoader`](crate::environment::InitialDataLoader)
    #[error("Edit mode requires an initial data loader")]
    MissingLoader,

    /// The event to edit could not be loaded
    #[error("Failed to load event {id}: {source}")]
    InitialData {
        /// Event being edited
        id: EventId,
        /// Loader failure
        source: CollaboratorError,
    },

    /// The session has been torn down
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Why [`WizardSession::submit`] did not succeed
#[derive(Error, Debug)]
pub enum SubmitError {
    /// The draft has validation errors; nothing was sent
    #[error("Draft has {} validation error(s)", .errors.len())]
    Invalid {
        /// Full error map, also shown in the form
        errors: ValidationErrors,
        /// Section the wizard jumped to
        section: Option<Section>,
    },

    /// The submitter failed
    #[error("Submission rejected: {0}")]
    Rejected(String),

    /// Another submission is already in flight
    #[error("A submission is already in progress")]
    Busy,

    /// The form was edited before the outcome could be read
    #[error("Submission outcome was superseded by a later edit")]
    Superseded,

    /// The session has been torn down
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// How to start a session
#[derive(Clone, Debug, Default)]
pub struct SessionOptions {
    /// Create or edit
    pub mode: SessionMode,
    /// Values to seed the form with; skips the loader and the draft slot
    pub initial_data: Option<EventDraftPatch>,
    /// Store settings
    pub store: StoreConfig,
}

impl SessionOptions {
    /// Options for creating a new event
    #[must_use]
    pub fn create() -> Self {
        Self::default()
    }

    /// Options for editing event `id`
    #[must_use]
    pub fn edit(id: EventId) -> Self {
        Self {
            mode: SessionMode::Edit(id),
            ..Self::default()
        }
    }

    /// Seed the form with `data`
    #[must_use]
    pub fn with_initial_data(mut self, data: EventDraftPatch) -> Self {
        self.initial_data = Some(data);
        self
    }

    /// Use `config` for the underlying store
    #[must_use]
    pub fn with_store_config(mut self, config: StoreConfig) -> Self {
        self.store = config;
        self
    }
}

/// One open wizard
///
/// # Example
///
/// ```ignore
/// let session = WizardSession::start(env, SessionOptions::create()).await?;
/// session.send(WizardAction::SetField { field: DraftField::Title, value: "Meetup".into() }).await?;
/// match session.submit().await {
///     Ok(()) => println!("created"),
///     Err(SubmitError::Invalid { section, .. }) => println!("fix {section:?}"),
///     Err(other) => println!("{other}"),
/// }
/// session.teardown().await?;
/// ```
#[derive(Clone)]
pub struct WizardSession {
    store: WizardStore,
}

impl WizardSession {
    /// Open a session.
    ///
    /// The form is seeded, in order of preference, from `initial_data`, from
    /// the loader (edit mode), or from the draft slot (create mode).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingLoader`] or
    /// [`SessionError::InitialData`] when edit mode has no initial data and
    /// it cannot be loaded. A missing or corrupt saved draft is not an error.
    #[tracing::instrument(skip(env, options), fields(mode = ?options.mode))]
    pub async fn start(
        env: WizardEnvironment,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        let SessionOptions {
            mode,
            initial_data,
            store,
        } = options;

        let (draft, restored) = match (mode, initial_data) {
            (_, Some(patch)) => (patch.into_draft(), false),
            (SessionMode::Edit(id), None) => {
                let loader = env.loader.as_ref().ok_or(SessionError::MissingLoader)?;
                let patch = loader
                    .load(&id)
                    .await
                    .map_err(|source| SessionError::InitialData { id, source })?;
                (patch.into_draft(), false)
            },
            (SessionMode::Create, None) => match persistence::restore(env.slot.as_ref()).await {
                Some(saved) => (saved.draft, true),
                None => (EventDraft::default(), false),
            },
        };

        tracing::info!(restored, "Wizard session started");

        let state = WizardState::new(mode).with_draft(draft, restored);
        Ok(Self {
            store: Store::with_config(state, WizardReducer::new(), env, store),
        })
    }

    /// Dispatch an action
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after teardown.
    pub async fn send(&self, action: WizardAction) -> Result<EffectHandle, StoreError> {
        self.store.send(action).await
    }

    /// Read the current state
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&WizardState) -> T,
    {
        self.store.state(f).await
    }

    /// Recompute the error map and return it
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after teardown.
    pub async fn validate(&self) -> Result<ValidationErrors, StoreError> {
        self.store.send(WizardAction::Validate).await?;
        Ok(self.store.state(|s| s.errors.clone()).await)
    }

    /// Validate, then submit and wait for the outcome
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Invalid`] if validation blocked the submission
    /// - [`SubmitError::Rejected`] if the submitter failed
    /// - [`SubmitError::Busy`] if another submission is in flight
    /// - [`SubmitError::Store`] after teardown
    pub async fn submit(&self) -> Result<(), SubmitError> {
        let mut handle = self.store.send(WizardAction::Submit).await?;
        handle.wait().await;

        self.store
            .state(|s| match &s.phase {
                SubmitPhase::Succeeded => Ok(()),
                SubmitPhase::Failed(message) => Err(SubmitError::Rejected(message.clone())),
                SubmitPhase::Submitting => Err(SubmitError::Busy),
                SubmitPhase::Editing if !s.errors.is_empty() => Err(SubmitError::Invalid {
                    errors: s.errors.clone(),
                    section: crate::sections::first_error_section(&s.errors),
                }),
                SubmitPhase::Editing => Err(SubmitError::Superseded),
            })
            .await
    }

    /// End the session. Pending autosave timers are cancelled; nothing is
    /// written afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects outlive the
    /// configured shutdown timeout.
    pub async fn teardown(&self) -> Result<(), StoreError> {
        self.store.teardown().await
    }

    /// Whether teardown has started
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.store.is_shut_down()
    }

    /// Underlying store
    #[must_use]
    pub const fn store(&self) -> &WizardStore {
        &self.store
    }
}

impl std::fmt::Debug for WizardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardSession")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
