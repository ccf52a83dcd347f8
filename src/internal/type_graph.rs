//! Supertype graph and the assignability memo.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use parking_lot::RwLock;

use crate::descriptors::{SupertypeEdge, TypeDescriptor};
use crate::instance::AnyArc;
use crate::internal::HashState;
use crate::key::TypeKey;

/// Directed graph of `child -> parent` supertype edges.
///
/// Edges are only ever added, except by `clear`. Every change bumps the
/// generation, which invalidates memoized answers computed before it.
pub(crate) struct TypeGraph {
    edges: RwLock<HashMap<TypeKey, Vec<SupertypeEdge>, HashState>>,
    generation: AtomicU64,
    memo: DashMap<(TypeKey, TypeKey), (u64, bool), HashState>,
    memoize: bool,
}

impl TypeGraph {
    pub(crate) fn new(memoize: bool) -> Self {
        Self {
            edges: RwLock::new(HashMap::default()),
            generation: AtomicU64::new(0),
            memo: DashMap::default(),
            memoize,
        }
    }

    /// Records the supertype edges a descriptor declares.
    pub(crate) fn absorb(&self, descriptor: &TypeDescriptor) {
        if descriptor.supertypes().is_empty() {
            return;
        }
        let child = descriptor.type_key();

        {
            let edges = self.edges.read();
            if let Some(known) = edges.get(&child) {
                let all_known = descriptor
                    .supertypes()
                    .iter()
                    .all(|edge| known.iter().any(|k| k.parent() == edge.parent()));
                if all_known {
                    return;
                }
            }
        }

        let mut edges = self.edges.write();
        let known = edges.entry(child).or_default();
        let mut added = false;
        for edge in descriptor.supertypes() {
            if !known.iter().any(|k| k.parent() == edge.parent()) {
                known.push(edge.clone());
                added = true;
            }
        }
        if added {
            self.generation.fetch_add(1, Ordering::AcqRel);
            tracing::trace!(child = child.display_name(), "supertype edges recorded");
        }
    }

    /// Every type `key` can be viewed as, nearest first, excluding `key`.
    pub(crate) fn ancestors(&self, key: TypeKey) -> Vec<TypeKey> {
        let edges = self.edges.read();
        let mut seen = vec![key];
        let mut queue = VecDeque::from([key]);
        let mut out = Vec::new();
        while let Some(current) = queue.pop_front() {
            for edge in edges.get(&current).into_iter().flatten() {
                let parent = edge.parent();
                if !seen.contains(&parent) {
                    seen.push(parent);
                    out.push(parent);
                    queue.push_back(parent);
                }
            }
        }
        out
    }

    /// Whether a value of type `candidate` can be handed out as `requested`.
    pub(crate) fn is_assignable(&self, requested: TypeKey, candidate: TypeKey) -> bool {
        if requested == candidate {
            return true;
        }
        if !self.memoize {
            return self.path(candidate, requested).is_some();
        }

        let generation = self.generation.load(Ordering::Acquire);
        if let Some(entry) = self.memo.get(&(requested, candidate)) {
            let (cached_generation, answer) = *entry;
            if cached_generation == generation {
                return answer;
            }
        }

        let answer = self.path(candidate, requested).is_some();
        self.memo.insert((requested, candidate), (generation, answer));
        answer
    }

    /// Converts a view of `from` into a view of `to`, composing the casts
    /// along the shortest path.
    pub(crate) fn cast(&self, view: &AnyArc, from: TypeKey, to: TypeKey) -> Option<AnyArc> {
        if from == to {
            return Some(view.clone());
        }
        let path = self.path(from, to)?;
        let mut current = view.clone();
        for edge in &path {
            current = edge.cast(&current)?;
        }
        Some(current)
    }

    /// Drops memoized answers. Never changes what `is_assignable` returns.
    pub(crate) fn clear_memo(&self) {
        self.memo.clear();
    }

    #[cfg(test)]
    pub(crate) fn memo_len(&self) -> usize {
        self.memo.len()
    }

    pub(crate) fn clear(&self) {
        self.edges.write().clear();
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.memo.clear();
    }

    fn path(&self, from: TypeKey, to: TypeKey) -> Option<Vec<SupertypeEdge>> {
        let edges = self.edges.read();
        let mut came_from: HashMap<TypeKey, (TypeKey, SupertypeEdge), HashState> =
            HashMap::default();
        let mut queue = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut path = Vec::new();
                let mut step = current;
                while let Some((prev, edge)) = came_from.get(&step) {
                    path.push(edge.clone());
                    step = *prev;
                }
                path.reverse();
                return Some(path);
            }
            for edge in edges.get(&current).into_iter().flatten() {
                let parent = edge.parent();
                if parent != from && !came_from.contains_key(&parent) {
                    came_from.insert(parent, (current, edge.clone()));
                    queue.push_back(parent);
                }
            }
        }
        None
    }
}
