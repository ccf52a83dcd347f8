//! Service lifetime definitions.

/// Service lifetimes controlling instance caching behavior
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Container, Module, Resolver, Lifetime};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct RequestModel { id: u32 }
///
/// let container = Container::start([Module::new()
///     .singleton::<Database, _>(|_| Database { url: "postgres://localhost".to_string() })
///     .factory::<RequestModel, _>(|_| RequestModel { id: 7 })]);
///
/// // Singleton: same instance on every resolution
/// let db1 = container.get_required::<Database>();
/// let db2 = container.get_required::<Database>();
/// assert!(Arc::ptr_eq(&db1, &db2));
///
/// // Transient: new instance every time
/// let m1 = container.get_required::<RequestModel>();
/// let m2 = container.get_required::<RequestModel>();
/// assert!(!Arc::ptr_eq(&m1, &m2));
///
/// assert_eq!(container.registrations()[0].lifetime, Lifetime::Singleton);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// Single instance per recipe, created lazily and shared
    ///
    /// The factory runs at most once, even when several threads ask for the
    /// service at the same time. The instance is published only after field
    /// injection has completed.
    Singleton,
    /// New instance per resolution, never cached
    ///
    /// The factory and field injection run on every request.
    Transient,
}

impl Lifetime {
    pub fn is_singleton(self) -> bool {
        matches!(self, Lifetime::Singleton)
    }
}
