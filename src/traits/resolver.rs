//! Resolver traits for service resolution.

use std::sync::Arc;

use crate::error::DiResult;
use crate::instance::Instance;
use crate::key::{key_of_type, TypeKey};

/// Object-safe resolution.
///
/// Hands back type-erased [`Instance`]s already converted to the requested
/// type. Most callers want the typed methods of [`Resolver`] instead.
pub trait ResolverCore: Send + Sync {
    /// Resolves by type: exact registration first, then any registered type
    /// assignable to `ty`.
    fn resolve_type(&self, ty: TypeKey) -> DiResult<Instance>;

    /// Resolves by name; the recipe's type must be assignable to `ty`.
    fn resolve_named(&self, name: &str, ty: TypeKey) -> DiResult<Instance>;
}

/// Typed resolution.
///
/// `T` may be a concrete type or a trait object such as `dyn Repository`.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Container, Module, Resolver};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// let container = Container::start([Module::new()
///     .singleton::<usize, _>(|_| 42)
///     .singleton_trait::<dyn Greeter, _>(|_| Arc::new(English) as Arc<dyn Greeter>)]);
///
/// assert_eq!(*container.get_required::<usize>(), 42);
/// assert_eq!(container.get_required::<dyn Greeter>().greet(), "hello");
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a service by type.
    fn get<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.resolve_type(key_of_type::<T>())?.downcast::<T>()
    }

    /// Resolves a service by type, panicking on failure.
    ///
    /// # Panics
    ///
    /// Panics if nothing satisfies `T` or its construction fails.
    fn get_required<T: ?Sized + Send + Sync + 'static>(&self) -> Arc<T> {
        self.get::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), e))
    }

    /// Resolves the service registered under `name`.
    ///
    /// Never falls back to a type scan: an unknown name, or a name whose
    /// recipe is not assignable to `T`, fails with `ServiceNotFound`.
    fn get_named<T: ?Sized + Send + Sync + 'static>(&self, name: &str) -> DiResult<Arc<T>> {
        self.resolve_named(name, key_of_type::<T>())?.downcast::<T>()
    }

    /// Resolves a named service, panicking on failure.
    fn get_named_required<T: ?Sized + Send + Sync + 'static>(&self, name: &str) -> Arc<T> {
        self.get_named::<T>(name).unwrap_or_else(|e| {
            panic!("Failed to resolve named {} ({}): {}", std::any::type_name::<T>(), name, e)
        })
    }
}
