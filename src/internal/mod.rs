//! Internal implementation details.

pub(crate) mod circular;
pub(crate) mod singleton_slot;
pub(crate) mod type_graph;

pub(crate) use circular::InFlight;
pub(crate) use singleton_slot::SingletonSlot;
pub(crate) use type_graph::TypeGraph;

#[cfg(feature = "ahash")]
pub(crate) type HashState = ahash::RandomState;
#[cfg(not(feature = "ahash"))]
pub(crate) type HashState = std::collections::hash_map::RandomState;
