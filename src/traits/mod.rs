//! Core traits for the container.

mod resolver;

pub use resolver::{Resolver, ResolverCore};
