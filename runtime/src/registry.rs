//! Registry of live cancellable tasks, keyed by [`EffectId`].
//!
//! Each id owns the abort handles of the tasks started under it. Registering
//! a new generation for an id aborts the previous one, which is what turns
//! `Effect::Cancellable { Delay }` into a debounce timer.

use event_wizard_core::effect::EffectId;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tokio::task::AbortHandle;

/// Live cancellable tasks grouped by id
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: Mutex<HashMap<EffectId, Vec<AbortHandle>>>,
}

impl TaskRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort every task registered under `id` and forget them.
    ///
    /// Returns the number of tasks that were still running.
    pub fn cancel(&self, id: EffectId) -> usize {
        let handles = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .unwrap_or_default();
        abort_all(handles)
    }

    /// Track `handle` as belonging to `id`
    pub fn register(&self, id: EffectId, handle: AbortHandle) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        let handles = tasks.entry(id).or_default();
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    /// Abort every registered task. Used on teardown.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<AbortHandle> = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .flat_map(|(_, handles)| handles)
            .collect();
        abort_all(drained)
    }

    /// Number of registered tasks under `id` that have not finished
    #[must_use]
    pub fn live(&self, id: EffectId) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .map_or(0, |handles| handles.iter().filter(|h| !h.is_finished()).count())
    }
}

fn abort_all(handles: Vec<AbortHandle>) -> usize {
    let mut aborted = 0;
    for handle in handles {
        if !handle.is_finished() {
            handle.abort();
            aborted += 1;
        }
    }
    aborted
}
