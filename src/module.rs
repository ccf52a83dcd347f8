//! Declarative registration modules.

use std::sync::Arc;

use crate::container::{Container, ResolverContext};
use crate::descriptors::{Injectable, TypeDescriptor};
use crate::error::DiResult;
use crate::instance::Instance;
use crate::lifetime::Lifetime;
use crate::registration::Recipe;

enum ModuleEntry {
    Recipe(Recipe),
    Declare(TypeDescriptor),
}

/// A batch of definitions, loaded into a container in declaration order.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Container, Module, Resolver};
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// #[derive(Default)]
/// struct Counter(AtomicU32);
///
/// let container = Container::start([Module::new()
///     .named_factory::<Counter, _>("counter", |_| Counter::default())]);
///
/// let first = container.get_named_required::<Counter>("counter");
/// first.0.fetch_add(2, Ordering::SeqCst);
/// let second = container.get_named_required::<Counter>("counter");
/// assert_eq!(second.0.load(Ordering::SeqCst), 0);
/// ```
#[derive(Default)]
pub struct Module {
    entries: Vec<ModuleEntry>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a prepared recipe.
    pub fn recipe(mut self, recipe: Recipe) -> Self {
        self.entries.push(ModuleEntry::Recipe(recipe));
        self
    }

    /// Records the supertype edges of `descriptor` when loaded.
    pub fn declare(mut self, descriptor: TypeDescriptor) -> Self {
        self.entries.push(ModuleEntry::Declare(descriptor));
        self
    }

    /// Shared `T` built by `factory` on first use.
    pub fn singleton<T, F>(self, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ResolverContext<'_>) -> T + Send + Sync + 'static,
    {
        self.recipe(value_recipe(Lifetime::Singleton, factory))
    }

    pub fn named_singleton<T, F>(self, name: &str, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ResolverContext<'_>) -> T + Send + Sync + 'static,
    {
        self.recipe(value_recipe(Lifetime::Singleton, factory).named(name))
    }

    /// Fresh `T` from `factory` on every resolution.
    pub fn factory<T, F>(self, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ResolverContext<'_>) -> T + Send + Sync + 'static,
    {
        self.recipe(value_recipe(Lifetime::Transient, factory))
    }

    pub fn named_factory<T, F>(self, name: &str, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&ResolverContext<'_>) -> T + Send + Sync + 'static,
    {
        self.recipe(value_recipe(Lifetime::Transient, factory).named(name))
    }

    /// Shared trait object, registered under `I`.
    pub fn singleton_trait<I, F>(self, factory: F) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn(&ResolverContext<'_>) -> Arc<I> + Send + Sync + 'static,
    {
        self.recipe(trait_recipe(Lifetime::Singleton, factory))
    }

    pub fn named_singleton_trait<I, F>(self, name: &str, factory: F) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn(&ResolverContext<'_>) -> Arc<I> + Send + Sync + 'static,
    {
        self.recipe(trait_recipe(Lifetime::Singleton, factory).named(name))
    }

    pub fn factory_trait<I, F>(self, factory: F) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn(&ResolverContext<'_>) -> Arc<I> + Send + Sync + 'static,
    {
        self.recipe(trait_recipe(Lifetime::Transient, factory))
    }

    pub fn named_factory_trait<I, F>(self, name: &str, factory: F) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn(&ResolverContext<'_>) -> Arc<I> + Send + Sync + 'static,
    {
        self.recipe(trait_recipe(Lifetime::Transient, factory).named(name))
    }

    /// Shared `T` built by `factory`, then field-injected per `T`'s descriptor.
    ///
    /// `T` stays reachable through the supertypes its descriptor declares.
    pub fn injectable_singleton<T, F>(self, factory: F) -> Self
    where
        T: Injectable,
        F: Fn(&ResolverContext<'_>) -> T + Send + Sync + 'static,
    {
        self.recipe(injectable_recipe(Lifetime::Singleton, factory))
    }

    pub fn injectable_factory<T, F>(self, factory: F) -> Self
    where
        T: Injectable,
        F: Fn(&ResolverContext<'_>) -> T + Send + Sync + 'static,
    {
        self.recipe(injectable_recipe(Lifetime::Transient, factory))
    }

    /// Shared `T` built from its own constructors.
    pub fn component<T: Injectable>(self) -> Self {
        self.recipe(Recipe::of::<T>(Lifetime::Singleton))
    }

    pub fn named_component<T: Injectable>(self, name: &str) -> Self {
        self.recipe(Recipe::of::<T>(Lifetime::Singleton).named(name))
    }

    /// Fresh `T` from its own constructors on every resolution.
    pub fn transient_component<T: Injectable>(self) -> Self {
        self.recipe(Recipe::of::<T>(Lifetime::Transient))
    }

    pub fn named_transient_component<T: Injectable>(self, name: &str) -> Self {
        self.recipe(Recipe::of::<T>(Lifetime::Transient).named(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn load_into(self, container: &Container) {
        let count = self.entries.len();
        for entry in self.entries {
            match entry {
                ModuleEntry::Recipe(recipe) => container.register(recipe),
                ModuleEntry::Declare(descriptor) => container.declare(descriptor),
            }
        }
        tracing::debug!(entries = count, "module loaded");
    }
}

fn value_recipe<T, F>(lifetime: Lifetime, factory: F) -> Recipe
where
    T: Send + Sync + 'static,
    F: Fn(&ResolverContext<'_>) -> T + Send + Sync + 'static,
{
    Recipe::from_factory(TypeDescriptor::opaque::<T>(), lifetime, move |resolver| {
        Ok(Instance::new(Arc::new(factory(resolver))))
    })
}

fn trait_recipe<I, F>(lifetime: Lifetime, factory: F) -> Recipe
where
    I: ?Sized + Send + Sync + 'static,
    F: Fn(&ResolverContext<'_>) -> Arc<I> + Send + Sync + 'static,
{
    Recipe::from_factory(TypeDescriptor::opaque::<I>(), lifetime, move |resolver| {
        Ok(Instance::opaque(factory(resolver)))
    })
}

fn injectable_recipe<T, F>(lifetime: Lifetime, factory: F) -> Recipe
where
    T: Injectable,
    F: Fn(&ResolverContext<'_>) -> T + Send + Sync + 'static,
{
    Recipe::from_factory(T::descriptor(), lifetime, move |resolver| {
        Ok(Instance::new(Arc::new(factory(resolver))))
    })
}

/// A reusable unit of registrations.
///
/// # Example
///
/// ```rust
/// use ferrous_ioc::{Container, DiResult, Module, Resolver, ServiceModule};
///
/// struct UserConfig { page_size: usize }
///
/// struct UserModule;
///
/// impl ServiceModule for UserModule {
///     fn register_services(self, container: &Container) -> DiResult<()> {
///         container.load_module(
///             Module::new().singleton::<UserConfig, _>(|_| UserConfig { page_size: 20 }),
///         );
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let container = Container::new();
/// container.install(UserModule)?;
/// assert_eq!(container.get::<UserConfig>()?.page_size, 20);
/// # Ok(())
/// # }
/// ```
pub trait ServiceModule {
    /// Registers this module's services.
    fn register_services(self, container: &Container) -> DiResult<()>;
}

impl ServiceModule for Module {
    fn register_services(self, container: &Container) -> DiResult<()> {
        self.load_into(container);
        Ok(())
    }
}
