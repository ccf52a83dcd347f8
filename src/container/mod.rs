//! The container: registry, resolver and materializer behind one handle.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;

use crate::config::ContainerConfig;
use crate::descriptors::{Injectable, TypeDescriptor};
use crate::error::DiResult;
use crate::instance::Instance;
use crate::internal::{HashState, InFlight, TypeGraph};
use crate::key::{key_of_type, TypeKey};
use crate::module::{Module, ServiceModule};
use crate::observer::{DiObserver, Observers};
use crate::registration::{Recipe, Registry, ServiceDescriptor};
use crate::traits::{Resolver, ResolverCore};

mod context;
mod materialize;
mod resolve;

pub use context::ResolverContext;

pub(crate) struct ContainerInner {
    config: ContainerConfig,
    registry: Registry,
    graph: TypeGraph,
    in_flight: InFlight,
    descriptors: DashMap<TypeKey, Arc<TypeDescriptor>, HashState>,
    pub(crate) scanned: DashMap<(usize, String), Vec<Arc<TypeDescriptor>>, HashState>,
    observers: RwLock<Arc<Observers>>,
}

/// An inversion-of-control container.
///
/// Cheap to clone; clones share registrations, singletons and caches.
/// Independent containers share nothing.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Container, Injectable, Module, Resolver, TypeDescriptor};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct UserRepository;
///
/// impl Injectable for UserRepository {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::builder::<Self>().with_default().build()
///     }
/// }
///
/// struct NotificationService {
///     repository: Arc<UserRepository>,
/// }
///
/// impl Injectable for NotificationService {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::builder::<Self>()
///             .inject_constructor(|(repository,): (Arc<UserRepository>,)| {
///                 NotificationService { repository }
///             })
///             .build()
///     }
/// }
///
/// let container = Container::start([Module::new()
///     .component::<UserRepository>()
///     .component::<NotificationService>()]);
///
/// let a = container.get_required::<NotificationService>();
/// let b = container.get_required::<NotificationService>();
/// assert!(Arc::ptr_eq(&a, &b));
/// assert!(Arc::ptr_eq(&a.repository, &container.get_required::<UserRepository>()));
/// ```
#[derive(Clone)]
pub struct Container {
    pub(crate) inner: Arc<ContainerInner>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// An empty container with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                graph: TypeGraph::new(config.memoize_assignability),
                config,
                registry: Registry::new(),
                in_flight: InFlight::new(),
                descriptors: DashMap::default(),
                scanned: DashMap::default(),
                observers: RwLock::new(Arc::new(Observers::default())),
            }),
        }
    }

    /// A container with `modules` loaded.
    pub fn start(modules: impl IntoIterator<Item = Module>) -> Self {
        let container = Self::new();
        container.load_modules(modules);
        container
    }

    /// A container with `modules` loaded, then the components of `packages`.
    pub fn start_with_scan(packages: &[&str], modules: impl IntoIterator<Item = Module>) -> Self {
        let container = Self::start(modules);
        container.scan_packages(packages);
        container
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.inner.config
    }

    /// Adds a definition.
    ///
    /// The recipe becomes reachable by its name, its declared type and every
    /// known ancestor of that type.
    pub fn register(&self, recipe: Recipe) {
        self.absorb(recipe.descriptor());
        let ancestors = self.inner.graph.ancestors(recipe.declared_type());
        self.inner.registry.register(Arc::new(recipe), &ancestors);
    }

    /// Records the supertype edges of `descriptor` without registering it.
    ///
    /// Used for trait hierarchies: describing `dyn Sub` as implementing
    /// `dyn Super` makes every `dyn Sub` service reachable as `dyn Super`.
    pub fn declare(&self, descriptor: TypeDescriptor) {
        self.absorb(&descriptor);
    }

    pub fn load_module(&self, module: Module) {
        module.load_into(self);
    }

    pub fn load_modules(&self, modules: impl IntoIterator<Item = Module>) {
        for module in modules {
            self.load_module(module);
        }
    }

    /// Registers a reusable [`ServiceModule`].
    pub fn install<M: ServiceModule>(&self, module: M) -> DiResult<()> {
        module.register_services(self)
    }

    /// Whether something satisfies `T`, directly or by capability.
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.find_by_type(key_of_type::<T>()).is_ok()
    }

    pub fn contains_named(&self, name: &str) -> bool {
        self.inner.registry.by_name(name).is_some()
    }

    /// Number of registered recipes.
    pub fn len(&self) -> usize {
        self.inner.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds and injects a fresh `T`, bypassing any recipe for `T` itself.
    ///
    /// Dependencies are still resolved through the registry.
    pub fn create_instance<T: Injectable>(&self) -> DiResult<Arc<T>> {
        let descriptor = self.descriptor_of::<T>();
        let instance = self.build(&descriptor, None)?;
        instance.downcast::<T>()
    }

    /// Runs field injection on an object built elsewhere.
    ///
    /// Fields that are already injected make this fail with
    /// `InjectionFailure`.
    pub fn inject_dependencies<T: Injectable>(&self, target: &Arc<T>) -> DiResult<()> {
        let descriptor = self.descriptor_of::<T>();
        self.inject_fields(&Instance::new(target.clone()), &descriptor)
    }

    /// Drops derived caches: the assignability memo, cached descriptors and
    /// scan results. Registrations and singleton instances are kept.
    pub fn clear_caches(&self) {
        self.inner.graph.clear_memo();
        self.inner.descriptors.clear();
        self.inner.scanned.clear();
        tracing::debug!("container caches cleared");
    }

    /// Drops every registration, the type graph and all caches.
    ///
    /// Instances already handed out are unaffected.
    pub fn clear(&self) {
        self.inner.registry.clear();
        self.inner.graph.clear();
        self.clear_caches();
    }

    /// Snapshot of every registration, in registration order.
    pub fn registrations(&self) -> Vec<ServiceDescriptor> {
        self.inner
            .registry
            .recipes()
            .iter()
            .map(|recipe| ServiceDescriptor {
                identity: recipe.identity().clone(),
                lifetime: recipe.lifetime(),
                materialized: recipe.is_materialized(),
            })
            .collect()
    }

    pub fn add_observer(&self, observer: Arc<dyn DiObserver>) {
        let mut observers = self.inner.observers.write();
        Arc::make_mut(&mut observers).add(observer);
    }

    /// Human-readable dump of the registrations.
    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        use std::fmt::Write;

        let registrations = self.registrations();
        let mut out = format!("Container ({} registrations)\n", registrations.len());
        for (i, registration) in registrations.iter().enumerate() {
            let _ = writeln!(
                out,
                "  [{}] {} {:?}{}",
                i,
                registration.identity,
                registration.lifetime,
                if registration.materialized { " (materialized)" } else { "" }
            );
        }
        out
    }

    fn absorb(&self, descriptor: &TypeDescriptor) {
        self.inner.graph.absorb(descriptor);
    }

    /// `T`'s descriptor, built once per container until `clear_caches`.
    pub(crate) fn descriptor_of<T: Injectable>(&self) -> Arc<TypeDescriptor> {
        let key = key_of_type::<T>();
        if let Some(cached) = self.inner.descriptors.get(&key) {
            return cached.clone();
        }
        let descriptor = Arc::new(T::descriptor());
        self.absorb(&descriptor);
        self.inner.descriptors.entry(key).or_insert(descriptor).clone()
    }

    fn observers(&self) -> Arc<Observers> {
        self.inner.observers.read().clone()
    }
}

impl ResolverCore for Container {
    fn resolve_type(&self, ty: TypeKey) -> DiResult<Instance> {
        self.observed(|| crate::key::ServiceIdentity::of_type(ty), || self.resolve_by_type(ty))
    }

    fn resolve_named(&self, name: &str, ty: TypeKey) -> DiResult<Instance> {
        self.observed(
            || crate::key::ServiceIdentity::named(ty, name),
            || self.resolve_by_name(name, ty),
        )
    }
}

impl Resolver for Container {}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("registrations", &self.len())
            .field("config", &self.inner.config)
            .finish()
    }
}
