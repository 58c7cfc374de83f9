//! Ticket tier list operations.
//!
//! Tiers are identified by position. Removing a tier shifts every later tier
//! down by one, so any error keyed `tickets.<i>.*` for a later tier is stale
//! after a removal; the reducer re-validates instead of re-keying.

use crate::draft::{TicketField, TicketTier};
use thiserror::Error;

/// Tier operation errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierError {
    /// No tier at `index`
    #[error("No ticket tier at index {index} (have {len})")]
    OutOfRange {
        /// Requested index
        index: usize,
        /// Number of tiers
        len: usize,
    },
}

/// Append a blank tier, returning its index
pub fn add_tier(tiers: &mut Vec<TicketTier>) -> usize {
    tiers.push(TicketTier::blank());
    tiers.len() - 1
}

/// Overwrite one field of tier `index`
///
/// # Errors
///
/// Returns [`TierError::OutOfRange`] if there is no tier at `index`.
pub fn update_tier(
    tiers: &mut [TicketTier],
    index: usize,
    field: TicketField,
    value: String,
) -> Result<(), TierError> {
    let len = tiers.len();
    let tier = tiers
        .get_mut(index)
        .ok_or(TierError::OutOfRange { index, len })?;
    tier.set(field, value);
    Ok(())
}

/// Remove tier `index`, returning it
///
/// # Errors
///
/// Returns [`TierError::OutOfRange`] if there is no tier at `index`.
pub fn remove_tier(tiers: &mut Vec<TicketTier>, index: usize) -> Result<TicketTier, TierError> {
    if index >= tiers.len() {
        return Err(TierError::OutOfRange {
            index,
            len: tiers.len(),
        });
    }
    Ok(tiers.remove(index))
}
