//! Single-slot deferred action.

/// Holds at most one action to run on the next idle point of the event loop.
///
/// Scheduling while an action is already pending replaces it: only the most recent action
/// runs.
#[derive(Debug)]
pub struct IdleSlot<A> {
    pending: Option<A>,
}

impl<A> IdleSlot<A> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Stores `action`, replacing any pending one.
    ///
    /// Returns `true` if the slot was empty, i.e. the caller has to arrange an idle callback.
    /// When it returns `false`, an idle callback is already on its way and will pick up the
    /// new action.
    pub fn schedule(&mut self, action: A) -> bool {
        self.pending.replace(action).is_none()
    }

    /// Takes the pending action, leaving the slot empty.
    pub fn take(&mut self) -> Option<A> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<A> Default for IdleSlot<A> {
    fn default() -> Self {
        Self::new()
    }
}
