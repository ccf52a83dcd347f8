//! Circular dependency detection infrastructure.

use std::thread::{self, ThreadId};

use dashmap::DashMap;

use crate::error::{DiError, DiResult};
use crate::internal::HashState;

/// Per-thread resolution chain.
#[derive(Default)]
struct Chain {
    /// Objects whose fields are being injected, outermost first.
    injecting: Vec<(usize, &'static str)>,
    /// Types being constructed, outermost first.
    constructing: Vec<&'static str>,
}

impl Chain {
    fn is_empty(&self) -> bool {
        self.injecting.is_empty() && self.constructing.is_empty()
    }
}

/// Instances currently under construction, per calling thread.
///
/// Owned by a container. Each thread only ever looks at its own chain, so
/// unrelated resolutions on other threads never report a cycle.
pub(crate) struct InFlight {
    chains: DashMap<ThreadId, Chain, HashState>,
}

impl InFlight {
    pub(crate) fn new() -> Self {
        Self {
            chains: DashMap::default(),
        }
    }

    /// Marks the object at `addr` as being injected by this thread.
    ///
    /// Fails when the same object is already being injected higher up in
    /// this thread's chain.
    pub(crate) fn enter_injection(
        &self,
        addr: usize,
        type_name: &'static str,
    ) -> DiResult<InjectionGuard<'_>> {
        let thread = thread::current().id();
        let mut chain = self.chains.entry(thread).or_default();
        if chain.injecting.iter().any(|(a, _)| *a == addr) {
            let mut path: Vec<&'static str> =
                chain.injecting.iter().map(|(_, name)| *name).collect();
            path.push(type_name);
            tracing::debug!(type_name, ?path, "object re-entered field injection");
            return Err(DiError::CircularDependency { type_name, path });
        }
        chain.injecting.push((addr, type_name));
        Ok(InjectionGuard {
            in_flight: self,
            thread,
            addr,
        })
    }

    /// Marks `type_name` as being constructed by this thread.
    pub(crate) fn enter_construction(
        &self,
        type_name: &'static str,
        max_depth: usize,
    ) -> DiResult<ConstructionGuard<'_>> {
        let thread = thread::current().id();
        let mut chain = self.chains.entry(thread).or_default();
        let depth = chain.constructing.len();
        if depth >= max_depth {
            tracing::debug!(type_name, depth, "construction depth limit reached");
            return Err(DiError::DepthExceeded(depth));
        }
        chain.constructing.push(type_name);
        Ok(ConstructionGuard {
            in_flight: self,
            thread,
        })
    }

    /// This thread's construction path, followed by `type_name`.
    pub(crate) fn path_to(&self, type_name: &'static str) -> Vec<&'static str> {
        let mut path = self
            .chains
            .get(&thread::current().id())
            .map(|chain| chain.constructing.clone())
            .unwrap_or_default();
        path.push(type_name);
        path
    }

    /// Number of threads with an active chain.
    #[cfg(test)]
    pub(crate) fn active_chains(&self) -> usize {
        self.chains.len()
    }

    fn release(&self, thread: ThreadId, pop: impl FnOnce(&mut Chain)) {
        let empty = match self.chains.get_mut(&thread) {
            Some(mut chain) => {
                pop(&mut chain);
                chain.is_empty()
            }
            None => false,
        };
        if empty {
            self.chains.remove_if(&thread, |_, chain| chain.is_empty());
        }
    }
}

/// Removes an object from the injection chain on every exit path.
pub(crate) struct InjectionGuard<'a> {
    in_flight: &'a InFlight,
    thread: ThreadId,
    addr: usize,
}

impl Drop for InjectionGuard<'_> {
    fn drop(&mut self) {
        let addr = self.addr;
        self.in_flight.release(self.thread, |chain| {
            if let Some(pos) = chain.injecting.iter().rposition(|(a, _)| *a == addr) {
                chain.injecting.remove(pos);
            }
        });
    }
}

/// Pops one construction frame on drop.
pub(crate) struct ConstructionGuard<'a> {
    in_flight: &'a InFlight,
    thread: ThreadId,
}

impl Drop for ConstructionGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.release(self.thread, |chain| {
            chain.constructing.pop();
        });
    }
}
