//! Draft persistence: the saved envelope, autosave gating, and restore.
//!
//! The slot holds at most one draft. Autosave writes it on a debounce timer
//! (see [`AUTOSAVE`]); a session in create mode restores it on start. Nothing
//! here is fatal: unreadable or corrupt content is logged and discarded, and
//! the wizard falls back to a blank draft.

use crate::draft::EventDraft;
use crate::state::SessionMode;
use chrono::{DateTime, Utc};
use event_wizard_core::draft_slot::DraftSlot;
use event_wizard_core::effect::EffectId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Debounce timer for autosave. At most one is pending per session.
pub const AUTOSAVE: EffectId = EffectId::new("draft-autosave");

/// The in-flight slot write started when the autosave timer fires
pub const DRAFT_WRITE: EffectId = EffectId::new("draft-write");

/// Envelope version written by this build
pub const DRAFT_FORMAT_VERSION: u32 = 1;

/// What is stored in the slot
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDraft {
    /// Envelope version
    pub version: u32,
    /// When the draft was written
    pub saved_at: DateTime<Utc>,
    /// The draft itself
    pub draft: EventDraft,
}

/// Envelope decoding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftCodecError {
    /// Not valid JSON or not a draft
    #[error("Malformed draft: {0}")]
    Malformed(String),

    /// Written by an incompatible build
    #[error("Unsupported draft format version {found}")]
    UnsupportedVersion {
        /// Version found in the slot
        found: u32,
    },
}

impl PersistedDraft {
    /// Wrap `draft` in a current-version envelope
    #[must_use]
    pub const fn new(draft: EventDraft, saved_at: DateTime<Utc>) -> Self {
        Self {
            version: DRAFT_FORMAT_VERSION,
            saved_at,
            draft,
        }
    }

    /// Serialize to the slot format
    ///
    /// # Errors
    ///
    /// Returns [`DraftCodecError::Malformed`] if serialization fails.
    pub fn encode(&self) -> Result<String, DraftCodecError> {
        serde_json::to_string(self).map_err(|e| DraftCodecError::Malformed(e.to_string()))
    }

    /// Parse slot content
    ///
    /// # Errors
    ///
    /// Returns [`DraftCodecError::Malformed`] for content that is not a
    /// draft envelope and [`DraftCodecError::UnsupportedVersion`] for an
    /// envelope from another format version.
    pub fn decode(raw: &str) -> Result<Self, DraftCodecError> {
        let envelope: Self =
            serde_json::from_str(raw).map_err(|e| DraftCodecError::Malformed(e.to_string()))?;
        if envelope.version != DRAFT_FORMAT_VERSION {
            return Err(DraftCodecError::UnsupportedVersion {
                found: envelope.version,
            });
        }
        Ok(envelope)
    }
}

/// Whether edits to `draft` should schedule an autosave
///
/// Edit sessions never persist, and an untitled draft is not worth keeping.
#[must_use]
pub fn autosave_enabled(mode: &SessionMode, draft: &EventDraft) -> bool {
    matches!(mode, SessionMode::Create) && !draft.title.trim().is_empty()
}

/// Read the saved draft, if there is a usable one.
///
/// A read failure leaves the slot alone. Corrupt content is cleared so the
/// next session starts clean.
#[tracing::instrument(skip(slot), name = "restore_draft")]
pub async fn restore(slot: &dyn DraftSlot) -> Option<PersistedDraft> {
    let raw = match slot.load().await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!("No saved draft");
            return None;
        },
        Err(error) => {
            tracing::warn!(%error, "Could not read saved draft, starting blank");
            return None;
        },
    };

    match PersistedDraft::decode(&raw) {
        Ok(saved) => {
            tracing::info!(saved_at = %saved.saved_at, "Restored saved draft");
            metrics::counter!("wizard.draft.restored").increment(1);
            Some(saved)
        },
        Err(error) => {
            tracing::warn!(%error, "Discarding corrupt saved draft");
            metrics::counter!("wizard.draft.discarded").increment(1);
            if let Err(error) = slot.clear().await {
                tracing::warn!(%error, "Could not clear corrupt saved draft");
            }
            None
        },
    }
}
