//! Per-recipe singleton cache.

use std::thread::{self, ThreadId};

use once_cell::sync::OnceCell;
use parking_lot::{Condvar, Mutex};

use crate::error::{DiError, DiResult};
use crate::instance::Instance;

enum SlotState {
    Empty,
    Constructing(ThreadId),
}

/// `Empty -> Constructing -> Materialized`, at most once.
///
/// The published instance is read lock-free. The thread that wins the race
/// constructs while the others wait on the condvar; if construction fails
/// the slot goes back to `Empty` and a waiter takes over.
pub(crate) struct SingletonSlot {
    ready: OnceCell<Instance>,
    state: Mutex<SlotState>,
    published: Condvar,
}

impl SingletonSlot {
    pub(crate) fn new() -> Self {
        Self {
            ready: OnceCell::new(),
            state: Mutex::new(SlotState::Empty),
            published: Condvar::new(),
        }
    }

    pub(crate) fn get(&self) -> Option<&Instance> {
        self.ready.get()
    }

    /// Returns the published instance, constructing it first if needed.
    ///
    /// `create` must return a fully injected instance; nothing is visible to
    /// other threads before it returns. A thread re-entering the slot it is
    /// itself filling gets the error produced by `on_reentry`.
    pub(crate) fn get_or_create<C, R>(&self, create: C, on_reentry: R) -> DiResult<Instance>
    where
        C: FnOnce() -> DiResult<Instance>,
        R: FnOnce() -> DiError,
    {
        if let Some(instance) = self.ready.get() {
            return Ok(instance.clone());
        }

        let me = thread::current().id();
        {
            let mut state = self.state.lock();
            loop {
                if let Some(instance) = self.ready.get() {
                    return Ok(instance.clone());
                }
                match *state {
                    SlotState::Empty => {
                        *state = SlotState::Constructing(me);
                        break;
                    }
                    SlotState::Constructing(owner) if owner == me => return Err(on_reentry()),
                    SlotState::Constructing(_) => self.published.wait(&mut state),
                }
            }
        }

        let _reset = ResetOnExit { slot: self };
        let instance = create()?;
        Ok(self.ready.get_or_init(|| instance).clone())
    }
}

struct ResetOnExit<'a> {
    slot: &'a SingletonSlot,
}

impl Drop for ResetOnExit<'_> {
    fn drop(&mut self) {
        *self.slot.state.lock() = SlotState::Empty;
        self.slot.published.notify_all();
    }
}
