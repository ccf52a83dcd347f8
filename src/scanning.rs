//! Component discovery over a link-time manifest.
//!
//! Types opt in with [`component!`](crate::component), which records a
//! [`ComponentEntry`] in [`COMPONENTS`] tagged with the module it was
//! written in. Scanning a package selects the entries of that module and
//! its submodules whose descriptor carries the component marker, and
//! registers each as a singleton.

use std::sync::Arc;

use crate::container::Container;
use crate::descriptors::TypeDescriptor;
use crate::lifetime::Lifetime;
use crate::registration::Recipe;

/// One row of the component manifest.
pub struct ComponentEntry {
    /// Module path the entry was declared in.
    pub package: &'static str,
    /// Descriptor of the component type.
    pub descriptor: fn() -> TypeDescriptor,
}

impl ComponentEntry {
    pub const fn new(package: &'static str, descriptor: fn() -> TypeDescriptor) -> Self {
        Self { package, descriptor }
    }

    /// Whether the entry lives in `package` or one of its submodules.
    pub fn in_package(&self, package: &str) -> bool {
        match self.package.strip_prefix(package) {
            Some("") => true,
            Some(rest) => rest.starts_with("::"),
            None => false,
        }
    }
}

/// Manifest filled by [`component!`](crate::component) across the build.
#[linkme::distributed_slice]
pub static COMPONENTS: [ComponentEntry] = [..];

/// Registers a component type in [`COMPONENTS`] under the current module.
///
/// ```rust
/// use ferrous_ioc::{component, Container, Injectable, Module, Resolver, TypeDescriptor};
///
/// #[derive(Default)]
/// pub struct AuditLog;
///
/// impl Injectable for AuditLog {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::builder::<Self>().with_default().component().build()
///     }
/// }
///
/// component!(AuditLog);
///
/// let container = Container::start_with_scan(&[module_path!()], [Module::new()]);
/// assert!(container.get::<AuditLog>().is_ok());
/// assert!(container.contains_named("auditLog"));
/// ```
#[macro_export]
macro_rules! component {
    ($ty:ty) => {
        const _: () = {
            #[$crate::__private::linkme::distributed_slice($crate::COMPONENTS)]
            #[linkme(crate = $crate::__private::linkme)]
            static COMPONENT: $crate::ComponentEntry = $crate::ComponentEntry::new(
                ::core::module_path!(),
                <$ty as $crate::Injectable>::descriptor,
            );
        };
    };
}

/// Name a scanned component is registered under: the marker name, or the
/// type's simple name with its first character lower-cased.
///
/// ```rust
/// use ferrous_ioc::{default_component_name, TypeDescriptor};
///
/// struct UserRepository;
///
/// let plain = TypeDescriptor::builder::<UserRepository>().component().build();
/// let named = TypeDescriptor::builder::<UserRepository>().component_named("users").build();
/// assert_eq!(default_component_name(&plain), "userRepository");
/// assert_eq!(default_component_name(&named), "users");
/// ```
pub fn default_component_name(descriptor: &TypeDescriptor) -> String {
    if let Some(name) = descriptor.marker_name() {
        return name.to_string();
    }
    let simple = descriptor.type_key().simple_name();
    let mut chars = simple.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Container {
    /// Registers the components found in `packages`.
    ///
    /// Returns the number of recipes registered.
    pub fn scan_packages(&self, packages: &[&str]) -> usize {
        self.scan_manifest(&COMPONENTS, packages)
    }

    /// Like [`scan_packages`](Self::scan_packages), over an explicit manifest.
    ///
    /// Matches are cached per manifest and package until
    /// [`clear_caches`](Self::clear_caches).
    pub fn scan_manifest(&self, manifest: &[ComponentEntry], packages: &[&str]) -> usize {
        let mut registered = 0;
        for package in packages {
            for descriptor in self.discover(manifest, package) {
                let name = default_component_name(&descriptor);
                let recipe = Recipe::from_descriptor((*descriptor).clone(), Lifetime::Singleton);
                self.register(recipe.named(name));
                registered += 1;
            }
        }
        tracing::debug!(?packages, registered, "packages scanned");
        registered
    }

    fn discover(&self, manifest: &[ComponentEntry], package: &str) -> Vec<Arc<TypeDescriptor>> {
        let cache_key = (manifest.as_ptr() as usize, package.to_string());
        if let Some(cached) = self.inner.scanned.get(&cache_key) {
            return cached.clone();
        }

        let found: Vec<Arc<TypeDescriptor>> = manifest
            .iter()
            .filter(|entry| entry.in_package(package))
            .map(|entry| (entry.descriptor)())
            .filter(TypeDescriptor::is_component)
            .map(Arc::new)
            .collect();
        tracing::trace!(package, components = found.len(), "package discovered");

        self.inner.scanned.insert(cache_key, found.clone());
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct ReportGenerator;

    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<ReportGenerator>().with_default().component().build()
    }

    fn describe_plain() -> TypeDescriptor {
        TypeDescriptor::builder::<ReportGenerator>().with_default().build()
    }

    #[test]
    fn package_matching_respects_path_boundaries() {
        let entry = ComponentEntry::new("app::service::users", describe);
        assert!(entry.in_package("app::service::users"));
        assert!(entry.in_package("app::service"));
        assert!(entry.in_package("app"));
        assert!(!entry.in_package("app::serv"));
        assert!(!entry.in_package("other"));
    }

    #[test]
    fn unmarked_entries_are_skipped_and_results_cached() {
        let manifest = [
            ComponentEntry::new("app::reports", describe),
            ComponentEntry::new("app::reports", describe_plain),
            ComponentEntry::new("app::billing", describe),
        ];
        let container = Container::new();
        assert_eq!(container.scan_manifest(&manifest, &["app::reports"]), 1);
        assert!(container.contains_named("reportGenerator"));
        assert_eq!(container.inner.scanned.len(), 1);

        container.clear_caches();
        assert_eq!(container.inner.scanned.len(), 0);
    }
}
