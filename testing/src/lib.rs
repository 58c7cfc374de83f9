//! # Event Wizard Testing
//!
//! Testing utilities and helpers for the event wizard engine.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use event_wizard_testing::{test_clock, InMemoryDraftSlot};
//!
//! #[tokio::test]
//! async fn restores_saved_draft() {
//!     let slot = InMemoryDraftSlot::with_contents(saved_json);
//!     let session = WizardSession::start(env_with(slot), SessionMode::Create, None).await?;
//!     assert!(session.state(|s| s.draft_restored).await);
//! }
//! ```

use chrono::{DateTime, Utc};
use event_wizard_core::draft_slot::{DraftSlot, SlotError, SlotFuture};
use event_wizard_core::environment::Clock;


/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, DraftSlot, SlotError, SlotFuture, Utc};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, PoisonError, RwLock};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use event_wizard_testing::mocks::FixedClock;
    /// use event_wizard_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// In-memory draft slot for fast, deterministic tests.
    ///
    /// Clones share the same slot, so a test can hand one clone to a session
    /// and inspect the other. Reads and writes can be made to fail to exercise
    /// the self-healing paths.
    ///
    /// # Example
    ///
    /// ```
    /// use event_wizard_testing::InMemoryDraftSlot;
    /// use event_wizard_core::draft_slot::DraftSlot;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let slot = InMemoryDraftSlot::new();
    /// slot.save("{}".to_string()).await?;
    /// assert_eq!(slot.contents().as_deref(), Some("{}"));
    /// assert_eq!(slot.save_count(), 1);
    /// # Ok(())
    /// # }
    /// ```
    #[derive(Clone, Debug, Default)]
    pub struct InMemoryDraftSlot {
        contents: Arc<RwLock<Option<String>>>,
        saves: Arc<AtomicUsize>,
        clears: Arc<AtomicUsize>,
        fail_reads: Arc<AtomicBool>,
        fail_writes: Arc<AtomicBool>,
    }

    impl InMemoryDraftSlot {
        /// Create an empty slot
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a slot that already holds `raw`
        #[must_use]
        pub fn with_contents(raw: impl Into<String>) -> Self {
            let slot = Self::new();
            *slot.contents.write().unwrap_or_else(PoisonError::into_inner) = Some(raw.into());
            slot
        }

        /// Current raw contents
        #[must_use]
        pub fn contents(&self) -> Option<String> {
            self.contents
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Number of successful saves
        #[must_use]
        pub fn save_count(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }

        /// Number of successful clears
        #[must_use]
        pub fn clear_count(&self) -> usize {
            self.clears.load(Ordering::SeqCst)
        }

        /// Make subsequent loads fail
        pub fn fail_reads(&self, fail: bool) {
            self.fail_reads.store(fail, Ordering::SeqCst);
        }

        /// Make subsequent saves and clears fail
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        fn write_guard(&self) -> Result<(), SlotError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(SlotError::Unavailable("writes disabled".to_string()));
            }
            Ok(())
        }
    }

    impl DraftSlot for InMemoryDraftSlot {
        fn load(&self) -> SlotFuture<'_, Option<String>> {
            Box::pin(async move {
                if self.fail_reads.load(Ordering::SeqCst) {
                    return Err(SlotError::Io("reads disabled".to_string()));
                }
                Ok(self.contents())
            })
        }

        fn save(&self, draft: String) -> SlotFuture<'_, ()> {
            Box::pin(async move {
                self.write_guard()?;
                *self.contents.write().unwrap_or_else(PoisonError::into_inner) = Some(draft);
                self.saves.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        }

        fn clear(&self) -> SlotFuture<'_, ()> {
            Box::pin(async move {
                self.write_guard()?;
                *self.contents.write().unwrap_or_else(PoisonError::into_inner) = None;
                self.clears.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, InMemoryDraftSlot, test_clock};
pub use reducer_test::{ReducerTest, assertions};
