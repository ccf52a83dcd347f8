//! Recipes and the definition registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::container::ResolverContext;
use crate::descriptors::{Injectable, TypeDescriptor};
use crate::error::DiResult;
use crate::instance::Instance;
use crate::internal::{HashState, SingletonSlot};
use crate::key::{ServiceIdentity, TypeKey};
use crate::lifetime::Lifetime;

pub(crate) type FactoryFn =
    Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<Instance> + Send + Sync>;

/// How a recipe produces its instance.
#[derive(Clone)]
pub(crate) enum RecipeSource {
    /// Injectable constructor, falling back to the default constructor.
    Constructor,
    /// Hand-written factory.
    Factory(FactoryFn),
}

/// A registered description of how to produce one service.
///
/// Immutable once registered, except for the cached singleton instance.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Container, Instance, Lifetime, Recipe, Resolver, TypeDescriptor};
/// use std::sync::Arc;
///
/// struct Clock(u64);
///
/// let container = Container::new();
/// container.register(
///     Recipe::from_factory(TypeDescriptor::opaque::<Clock>(), Lifetime::Singleton, |_| {
///         Ok(Instance::new(Arc::new(Clock(0))))
///     })
///     .named("clock"),
/// );
///
/// let clock = container.get_named_required::<Clock>("clock");
/// assert_eq!(clock.0, 0);
/// ```
pub struct Recipe {
    identity: ServiceIdentity,
    descriptor: Arc<TypeDescriptor>,
    lifetime: Lifetime,
    source: RecipeSource,
    slot: Option<SingletonSlot>,
}

impl Recipe {
    /// Recipe built from `T`'s own constructors.
    pub fn of<T: Injectable>(lifetime: Lifetime) -> Self {
        Self::from_descriptor(T::descriptor(), lifetime)
    }

    /// Recipe built from the constructors of `descriptor`.
    pub fn from_descriptor(descriptor: TypeDescriptor, lifetime: Lifetime) -> Self {
        Self::build(descriptor, lifetime, RecipeSource::Constructor)
    }

    /// Recipe whose instance comes from `factory`.
    ///
    /// The instance still gets the injectable fields of `descriptor` written.
    pub fn from_factory<F>(descriptor: TypeDescriptor, lifetime: Lifetime, factory: F) -> Self
    where
        F: for<'a> Fn(&ResolverContext<'a>) -> DiResult<Instance> + Send + Sync + 'static,
    {
        Self::build(descriptor, lifetime, RecipeSource::Factory(Arc::new(factory)))
    }

    fn build(descriptor: TypeDescriptor, lifetime: Lifetime, source: RecipeSource) -> Self {
        Self {
            identity: ServiceIdentity::of_type(descriptor.type_key()),
            descriptor: Arc::new(descriptor),
            lifetime,
            source,
            slot: lifetime.is_singleton().then(SingletonSlot::new),
        }
    }

    /// Qualifies the recipe with a name. An empty name is ignored.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.identity = ServiceIdentity::named(self.identity.type_key(), name);
        self
    }

    pub fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    pub fn name(&self) -> Option<&str> {
        self.identity.name()
    }

    pub fn declared_type(&self) -> TypeKey {
        self.identity.type_key()
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Whether the singleton instance has been published.
    pub fn is_materialized(&self) -> bool {
        self.slot.as_ref().is_some_and(|slot| slot.get().is_some())
    }

    pub(crate) fn source(&self) -> &RecipeSource {
        &self.source
    }

    pub(crate) fn slot(&self) -> Option<&SingletonSlot> {
        self.slot.as_ref()
    }
}

impl fmt::Debug for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recipe")
            .field("identity", &self.identity)
            .field("lifetime", &self.lifetime)
            .field(
                "source",
                &match self.source {
                    RecipeSource::Constructor => "constructor",
                    RecipeSource::Factory(_) => "factory",
                },
            )
            .field("materialized", &self.is_materialized())
            .finish()
    }
}

/// Snapshot of one registration, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub identity: ServiceIdentity,
    pub lifetime: Lifetime,
    pub materialized: bool,
}

impl ServiceDescriptor {
    pub fn type_name(&self) -> &'static str {
        self.identity.type_name()
    }

    pub fn name(&self) -> Option<&str> {
        self.identity.name()
    }
}

#[derive(Default)]
struct Indices {
    by_name: HashMap<String, Arc<Recipe>, HashState>,
    by_type: HashMap<TypeKey, Vec<Arc<Recipe>>, HashState>,
    // first-indexed order of type keys; the fallback scan walks this
    type_order: Vec<TypeKey>,
    all: Vec<Arc<Recipe>>,
}

/// Name and type indices over the registered recipes.
pub(crate) struct Registry {
    indices: RwLock<Indices>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            indices: RwLock::new(Indices::default()),
        }
    }

    /// Indexes `recipe` under its name, its declared type and every
    /// ancestor of that type.
    pub(crate) fn register(&self, recipe: Arc<Recipe>, ancestors: &[TypeKey]) {
        let mut indices = self.indices.write();

        if let Some(name) = recipe.name() {
            if let Some(previous) = indices.by_name.insert(name.to_string(), recipe.clone()) {
                tracing::debug!(
                    name,
                    previous = previous.declared_type().display_name(),
                    "name re-registered"
                );
            }
        }

        let declared = recipe.declared_type();
        for key in std::iter::once(declared).chain(ancestors.iter().copied()) {
            let Indices { by_type, type_order, .. } = &mut *indices;
            let entry = by_type.entry(key).or_insert_with(|| {
                type_order.push(key);
                Vec::new()
            });
            entry.push(recipe.clone());
        }
        indices.all.push(recipe.clone());

        tracing::debug!(
            identity = %recipe.identity(),
            lifetime = ?recipe.lifetime(),
            ancestors = ancestors.len(),
            "recipe registered"
        );
    }

    /// First recipe registered for exactly `ty` (directly or as an ancestor).
    pub(crate) fn first_for(&self, ty: TypeKey) -> Option<Arc<Recipe>> {
        self.indices.read().by_type.get(&ty).and_then(|list| list.first().cloned())
    }

    pub(crate) fn by_name(&self, name: &str) -> Option<Arc<Recipe>> {
        self.indices.read().by_name.get(name).cloned()
    }

    /// Every indexed type with its first recipe, in first-indexed order.
    pub(crate) fn candidates(&self) -> Vec<(TypeKey, Arc<Recipe>)> {
        let indices = self.indices.read();
        indices
            .type_order
            .iter()
            .filter_map(|key| {
                let first = indices.by_type.get(key)?.first()?;
                Some((*key, first.clone()))
            })
            .collect()
    }

    pub(crate) fn recipes(&self) -> Vec<Arc<Recipe>> {
        self.indices.read().all.clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.indices.read().all.len()
    }

    pub(crate) fn clear(&self) {
        let mut indices = self.indices.write();
        let dropped = indices.all.len();
        *indices = Indices::default();
        tracing::debug!(dropped, "registry cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::key_of_type;

    struct Alpha;
    struct Beta;
    trait Greek: Send + Sync {}

    fn recipe<T: Send + Sync + 'static>(name: &str) -> Arc<Recipe> {
        let recipe = Recipe::from_descriptor(TypeDescriptor::opaque::<T>(), Lifetime::Transient);
        Arc::new(recipe.named(name))
    }

    #[test]
    fn first_registration_wins_by_type_and_last_by_name() {
        let registry = Registry::new();
        let first = recipe::<Alpha>("a");
        let second = recipe::<Alpha>("a");
        registry.register(first.clone(), &[]);
        registry.register(second.clone(), &[]);

        assert!(Arc::ptr_eq(&registry.first_for(key_of_type::<Alpha>()).unwrap(), &first));
        assert!(Arc::ptr_eq(&registry.by_name("a").unwrap(), &second));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn ancestors_index_the_same_recipe() {
        let registry = Registry::new();
        let alpha = recipe::<Alpha>("");
        let beta = recipe::<Beta>("");
        registry.register(alpha.clone(), &[key_of_type::<dyn Greek>()]);
        registry.register(beta, &[key_of_type::<dyn Greek>()]);

        let greek = registry.first_for(key_of_type::<dyn Greek>()).unwrap();
        assert!(Arc::ptr_eq(&greek, &alpha));

        let order: Vec<_> = registry.candidates().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            order,
            vec![key_of_type::<Alpha>(), key_of_type::<dyn Greek>(), key_of_type::<Beta>()]
        );
    }

    #[test]
    fn clear_resets_both_indices() {
        let registry = Registry::new();
        registry.register(recipe::<Alpha>("a"), &[]);
        registry.clear();
        assert!(registry.first_for(key_of_type::<Alpha>()).is_none());
        assert!(registry.by_name("a").is_none());
        assert!(registry.candidates().is_empty());
    }
}
