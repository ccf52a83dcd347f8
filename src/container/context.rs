//! Resolver context for hand-written factories.

use crate::error::DiResult;
use crate::instance::Instance;
use crate::key::TypeKey;
use crate::traits::{Resolver, ResolverCore};

/// Context passed to factory functions for resolving collaborators.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Container, Module, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let container = Container::start([Module::new()
///     .singleton::<Database, _>(|_| Database { url: "postgres://localhost".to_string() })
///     .factory::<UserService, _>(|resolver| UserService {
///         db: resolver.get_required::<Database>(),
///     })]);
///
/// assert_eq!(container.get_required::<UserService>().db.url, "postgres://localhost");
/// ```
pub struct ResolverContext<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new<T>(resolver: &'a T) -> Self
    where
        T: ResolverCore,
    {
        Self { resolver }
    }
}

impl ResolverCore for ResolverContext<'_> {
    fn resolve_type(&self, ty: TypeKey) -> DiResult<Instance> {
        self.resolver.resolve_type(ty)
    }

    fn resolve_named(&self, name: &str, ty: TypeKey) -> DiResult<Instance> {
        self.resolver.resolve_named(name, ty)
    }
}

impl Resolver for ResolverContext<'_> {}
