//! The wizard reducer.
//!
//! Form edits, navigation, autosave, and submission all go through
//! [`WizardReducer::reduce`]. It mutates [`WizardState`] synchronously and
//! describes any I/O as effects for the store to run:
//!
//! - every draft edit in create mode (re)arms the [`AUTOSAVE`] debounce timer,
//!   or cancels it once the title is blank again
//! - the timer firing produces a slot write registered as [`DRAFT_WRITE`]
//! - `Submit` either blocks with the full error map or calls the submitter
//!   in a future that turns both errors and panics into `SubmitFailed`

use crate::draft::EventDraft;
use crate::environment::{PendingUpload, WizardEnvironment};
use crate::persistence::{AUTOSAVE, DRAFT_WRITE, PersistedDraft, autosave_enabled};
use crate::state::{SubmitPhase, WizardAction, WizardState};
use crate::tickets;
use crate::validation::{ticket_path, validate};
use event_wizard_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

type Effects = SmallVec<[Effect<WizardAction>; 4]>;

/// Reducer for one wizard session
#[derive(Clone, Debug, Default)]
pub struct WizardReducer;

impl WizardReducer {
    /// Creates a new `WizardReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Actions that change the form, which is locked while submitting
    const fn is_form_edit(action: &WizardAction) -> bool {
        matches!(
            action,
            WizardAction::SetField { .. }
                | WizardAction::SetCategory(_)
                | WizardAction::ToggleFlag(_)
                | WizardAction::AddTag(_)
                | WizardAction::RemoveTag(_)
                | WizardAction::AddTicketTier
                | WizardAction::UpdateTicketTier { .. }
                | WizardAction::RemoveTicketTier { .. }
                | WizardAction::ReplaceDraft(_)
                | WizardAction::SelectCoverImage { .. }
                | WizardAction::RemoveCoverImage
                | WizardAction::DiscardDraft
        )
    }

    /// Common tail of every accepted draft edit.
    ///
    /// A finished submission goes back to `Editing`; an in-flight one keeps
    /// the lock until its outcome arrives.
    fn after_edit(state: &mut WizardState, env: &WizardEnvironment) -> Effects {
        if matches!(state.phase, SubmitPhase::Succeeded | SubmitPhase::Failed(_)) {
            state.phase = SubmitPhase::Editing;
        }
        smallvec![Self::schedule_autosave(state, env)]
    }

    fn schedule_autosave(state: &WizardState, env: &WizardEnvironment) -> Effect<WizardAction> {
        if !state.mode.is_create() {
            return Effect::None;
        }
        if autosave_enabled(&state.mode, &state.draft) {
            Effect::debounce(AUTOSAVE, env.autosave_interval, WizardAction::AutosaveElapsed)
        } else {
            Effect::Cancel(AUTOSAVE)
        }
    }

    fn write_draft(env: &WizardEnvironment, state: &WizardState) -> Effects {
        let at = env.clock.now();
        let raw = match PersistedDraft::new(state.draft.clone(), at).encode() {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!(%error, "Could not encode draft, skipping autosave");
                metrics::counter!("wizard.draft.save_failed").increment(1);
                return SmallVec::new();
            },
        };

        let slot = Arc::clone(&env.slot);
        let write = Effect::Future(Box::pin(async move {
            Some(match slot.save(raw).await {
                Ok(()) => WizardAction::DraftSaved { at },
                Err(error) => WizardAction::DraftSaveFailed {
                    error: error.to_string(),
                },
            })
        }));
        smallvec![write.cancellable(DRAFT_WRITE)]
    }

    /// Stop pending autosave work and empty the slot
    fn forget_saved_draft(env: &WizardEnvironment) -> Effects {
        let slot = Arc::clone(&env.slot);
        smallvec![
            Effect::Cancel(AUTOSAVE),
            Effect::Cancel(DRAFT_WRITE),
            Effect::Future(Box::pin(async move {
                if let Err(error) = slot.clear().await {
                    tracing::warn!(%error, "Could not clear saved draft");
                }
                None
            })),
        ]
    }

    fn load_preview(env: &WizardEnvironment, path: std::path::PathBuf) -> Effect<WizardAction> {
        let images = Arc::clone(&env.images);
        Effect::Future(Box::pin(async move {
            let result = images.load_preview(&path).await;
            Some(match result {
                Ok(image) => WizardAction::CoverImageLoaded { path, image },
                Err(error) => WizardAction::CoverImageFailed {
                    path,
                    error: error.to_string(),
                },
            })
        }))
    }

    fn submit(
        env: &WizardEnvironment,
        draft: EventDraft,
        cover: Option<PendingUpload>,
    ) -> Effect<WizardAction> {
        let submitter = Arc::clone(&env.submitter);
        Effect::Future(Box::pin(async move {
            let outcome = AssertUnwindSafe(async move { submitter.submit(draft, cover).await })
                .catch_unwind()
                .await;
            Some(match outcome {
                Ok(Ok(())) => WizardAction::SubmitSucceeded,
                Ok(Err(error)) => WizardAction::SubmitFailed {
                    error: error.to_string(),
                },
                Err(panic) => WizardAction::SubmitFailed {
                    error: panic_message(panic.as_ref()),
                },
            })
        }))
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| panic.downcast_ref::<String>().cloned());
    match detail {
        Some(detail) => format!("Submission failed unexpectedly: {detail}"),
        None => "Submission failed unexpectedly".to_string(),
    }
}

impl Reducer for WizardReducer {
    type State = WizardState;
    type Action = WizardAction;
    type Environment = WizardEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if state.is_busy() && Self::is_form_edit(&action) {
            tracing::warn!(?action, "Ignoring edit while submission is in flight");
            return SmallVec::new();
        }

        match action {
            // ========== Form edits ==========
            WizardAction::SetField { field, value } => {
                state.draft.set_text(field, value);
                state.errors.remove(field.key());
                Self::after_edit(state, env)
            },

            WizardAction::SetCategory(category) => {
                state.draft.category = category;
                state.errors.remove("category");
                Self::after_edit(state, env)
            },

            WizardAction::ToggleFlag(flag) => {
                state.draft.toggle(flag);
                state.errors.remove(flag.key());
                Self::after_edit(state, env)
            },

            WizardAction::AddTag(tag) => {
                if !state.draft.add_tag(&tag) {
                    tracing::debug!(%tag, "Ignoring blank or duplicate tag");
                    return SmallVec::new();
                }
                state.errors.remove("tags");
                Self::after_edit(state, env)
            },

            WizardAction::RemoveTag(tag) => {
                if !state.draft.remove_tag(&tag) {
                    return SmallVec::new();
                }
                state.errors.remove("tags");
                Self::after_edit(state, env)
            },

            WizardAction::AddTicketTier => {
                tickets::add_tier(&mut state.draft.tickets);
                Self::after_edit(state, env)
            },

            WizardAction::UpdateTicketTier {
                index,
                field,
                value,
            } => {
                if let Err(error) =
                    tickets::update_tier(&mut state.draft.tickets, index, field, value)
                {
                    tracing::warn!(%error, "Ignoring tier update");
                    return SmallVec::new();
                }
                state.errors.remove(&ticket_path(index, field));
                Self::after_edit(state, env)
            },

            WizardAction::RemoveTicketTier { index } => {
                if let Err(error) = tickets::remove_tier(&mut state.draft.tickets, index) {
                    tracing::warn!(%error, "Ignoring tier removal");
                    return SmallVec::new();
                }
                // Later tiers moved down, so positional error keys are stale.
                if !state.errors.is_empty() {
                    state.errors = validate(&state.draft);
                }
                Self::after_edit(state, env)
            },

            WizardAction::ReplaceDraft(draft) => {
                state.draft = draft;
                state.errors.clear();
                Self::after_edit(state, env)
            },

            // ========== Cover image ==========
            WizardAction::SelectCoverImage { path } => {
                state.image_loading = Some(path.clone());
                state.image_error = None;
                smallvec![Self::load_preview(env, path)]
            },

            WizardAction::CoverImageLoaded { path, image } => {
                if state.image_loading.as_ref() != Some(&path) {
                    tracing::debug!(path = %path.display(), "Discarding stale image preview");
                    return SmallVec::new();
                }
                state.image_loading = None;
                state.draft.cover_image = Some(image);
                state.pending_upload = Some(PendingUpload::new(path));
                state.errors.remove("coverImage");
                Self::after_edit(state, env)
            },

            WizardAction::CoverImageFailed { path, error } => {
                if state.image_loading.as_ref() != Some(&path) {
                    return SmallVec::new();
                }
                tracing::warn!(path = %path.display(), %error, "Could not load image preview");
                state.image_loading = None;
                state.image_error = Some(error);
                SmallVec::new()
            },

            WizardAction::RemoveCoverImage => {
                state.draft.cover_image = None;
                state.pending_upload = None;
                state.image_loading = None;
                state.image_error = None;
                state.errors.remove("coverImage");
                Self::after_edit(state, env)
            },

            // ========== Navigation ==========
            WizardAction::GoToSection(section) => {
                state.router.go_to(section);
                SmallVec::new()
            },

            WizardAction::NextSection => {
                state.router.next();
                SmallVec::new()
            },

            WizardAction::PreviousSection => {
                state.router.previous();
                SmallVec::new()
            },

            WizardAction::Validate => {
                state.errors = validate(&state.draft);
                SmallVec::new()
            },

            // ========== Persistence ==========
            WizardAction::AutosaveElapsed => {
                // Success clears the slot; failure re-arms the timer.
                if state.is_busy() {
                    tracing::trace!("Submission in flight, deferring autosave");
                    return SmallVec::new();
                }
                if !autosave_enabled(&state.mode, &state.draft) {
                    tracing::trace!("Autosave no longer applies, skipping");
                    return SmallVec::new();
                }
                Self::write_draft(env, state)
            },

            WizardAction::DraftSaved { at } => {
                tracing::debug!(saved_at = %at, "Draft saved");
                metrics::counter!("wizard.draft.saved").increment(1);
                state.last_saved_at = Some(at);
                SmallVec::new()
            },

            WizardAction::DraftSaveFailed { error } => {
                tracing::warn!(%error, "Autosave failed, will retry on next edit");
                metrics::counter!("wizard.draft.save_failed").increment(1);
                SmallVec::new()
            },

            WizardAction::DiscardDraft => {
                if !state.mode.is_create() {
                    tracing::warn!("Ignoring discard outside create mode");
                    return SmallVec::new();
                }
                tracing::info!("Discarding draft");
                *state = WizardState::new(state.mode);
                Self::forget_saved_draft(env)
            },

            // ========== Submission ==========
            WizardAction::Submit => {
                if state.is_busy() {
                    tracing::warn!("Ignoring submit while another is in flight");
                    return SmallVec::new();
                }

                let errors = validate(&state.draft);
                if !errors.is_empty() {
                    let section = state.router.jump_to_first_error(&errors);
                    tracing::info!(
                        errors = errors.len(),
                        section = ?section,
                        "Submission blocked by validation"
                    );
                    metrics::counter!("wizard.submit.blocked").increment(1);
                    state.errors = errors;
                    state.phase = SubmitPhase::Editing;
                    return SmallVec::new();
                }

                tracing::info!(mode = ?state.mode, "Submitting event");
                state.errors.clear();
                state.phase = SubmitPhase::Submitting;
                smallvec![Self::submit(
                    env,
                    state.draft.clone(),
                    state.pending_upload.clone()
                )]
            },

            WizardAction::SubmitSucceeded => {
                if !state.is_busy() {
                    tracing::warn!("Ignoring submit result with no submission in flight");
                    return SmallVec::new();
                }
                tracing::info!("Event submitted");
                metrics::counter!("wizard.submit.succeeded").increment(1);
                state.phase = SubmitPhase::Succeeded;

                if state.mode.is_create() {
                    state.draft_restored = false;
                    Self::forget_saved_draft(env)
                } else {
                    SmallVec::new()
                }
            },

            WizardAction::SubmitFailed { error } => {
                if !state.is_busy() {
                    tracing::warn!("Ignoring submit result with no submission in flight");
                    return SmallVec::new();
                }
                tracing::warn!(%error, "Event submission failed");
                metrics::counter!("wizard.submit.failed").increment(1);
                state.phase = SubmitPhase::Failed(error);
                smallvec![Self::schedule_autosave(state, env)]
            },
        }
    }
}
