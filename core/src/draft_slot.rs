//! Draft slot trait for persisting unsaved form work.
//!
//! A draft slot holds at most one serialized draft under a single fixed key.
//! It is feature-scoped rather than keyed per record: a later save silently
//! overwrites an earlier one.
//!
//! The slot is a convenience, not a source of truth. Callers treat every
//! [`SlotError`] as recoverable: a failed write is skipped, a failed read falls
//! back to a fresh draft.
//!
//! # Example
//!
//! ```no_run
//! use event_wizard_core::draft_slot::{DraftSlot, SlotError};
//!
//! async fn example<S: DraftSlot>(slot: &S) -> Result<(), SlotError> {
//!     slot.save(r#"{"title":"Tech Summit"}"#.to_string()).await?;
//!
//!     if let Some(raw) = slot.load().await? {
//!         println!("pending draft: {raw}");
//!     }
//!
//!     slot.clear().await
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors that can occur while reading or writing a draft slot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// Underlying storage could not be read or written.
    #[error("Draft slot I/O error: {0}")]
    Io(String),

    /// The storage backend is not available (e.g. quota exceeded, disabled).
    #[error("Draft slot unavailable: {0}")]
    Unavailable(String),
}

/// Boxed future returned by [`DraftSlot`] operations.
pub type SlotFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SlotError>> + Send + 'a>>;

/// Single fixed-key storage for one serialized draft.
///
/// # Dyn Compatibility
///
/// This trait uses explicit `Pin<Box<dyn Future>>` returns instead of `async fn`
/// so it can be held as `Arc<dyn DraftSlot>` and captured by effects.
pub trait DraftSlot: Send + Sync {
    /// Load the stored draft.
    ///
    /// Returns `None` if nothing was ever written (or the slot was cleared).
    /// Parsing is the caller's job; the slot only moves text.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError`] if the backing storage cannot be read.
    fn load(&self) -> SlotFuture<'_, Option<String>>;

    /// Store `draft`, replacing whatever the slot held.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError`] if the backing storage cannot be written.
    fn save(&self, draft: String) -> SlotFuture<'_, ()>;

    /// Remove the stored draft. Clearing an empty slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError`] if the backing storage cannot be written.
    fn clear(&self) -> SlotFuture<'_, ()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let error = SlotError::Io("permission denied".to_string());
        assert_eq!(error.to_string(), "Draft slot I/O error: permission denied");
    }

    #[test]
    fn unavailable_error_display() {
        let error = SlotError::Unavailable("quota exceeded".to_string());
        assert_eq!(error.to_string(), "Draft slot unavailable: quota exceeded");
    }
}
