//! # ferrous-ioc
//!
//! A small inversion-of-control container: a registry of recipes keyed by
//! type and name, a resolver with capability lookup, constructor and field
//! injection, lazily built singletons and circular dependency detection.
//!
//! ## Features
//!
//! - **Two lifetimes**: singletons built at most once, transients built per request
//! - **Capability lookup**: ask for `dyn Trait` and get the registered implementation
//! - **Constructor and field injection** driven by [`TypeDescriptor`]s
//! - **Named services**, checked against the requested type
//! - **Thread-safe**: concurrent registration and resolution, one factory call per singleton
//! - **Circular dependency detection** with the offending path in the error
//! - **Component scanning** over a link-time manifest
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_ioc::{Container, Inject, Injectable, Module, Resolver, TypeDescriptor};
//! use std::sync::Arc;
//!
//! trait UserRepository: Send + Sync {
//!     fn users(&self) -> Vec<String>;
//! }
//!
//! #[derive(Default)]
//! struct InMemoryUsers;
//!
//! impl UserRepository for InMemoryUsers {
//!     fn users(&self) -> Vec<String> {
//!         vec!["alice".to_string(), "bob".to_string()]
//!     }
//! }
//!
//! impl Injectable for InMemoryUsers {
//!     fn descriptor() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Self>()
//!             .with_default()
//!             .implements::<dyn UserRepository>(|r| r as Arc<dyn UserRepository>)
//!             .build()
//!     }
//! }
//!
//! #[derive(Default)]
//! struct UserService {
//!     repository: Inject<dyn UserRepository>,
//! }
//!
//! impl Injectable for UserService {
//!     fn descriptor() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Self>()
//!             .with_default()
//!             .field("repository", |s| &s.repository)
//!             .build()
//!     }
//! }
//!
//! let container = Container::start([Module::new()
//!     .component::<InMemoryUsers>()
//!     .component::<UserService>()]);
//!
//! let service = container.get_required::<UserService>();
//! assert_eq!(service.repository.get_required().users().len(), 2);
//! ```
//!
//! ## Service Lifetimes
//!
//! - **Singleton**: created on first resolution and shared afterwards
//! - **Transient**: created fresh, and field-injected, on every resolution
//!
//! ## Resolution Rules
//!
//! By type, the first recipe registered for exactly that type wins. A recipe
//! is also registered under every known supertype of its declared type. If
//! nothing is registered for the type, registered types are scanned in
//! first-registration order for one that can be viewed as the requested
//! type. By name, the recipe under that name is used only if its type can
//! be viewed as the requested type; there is no fallback.

pub mod config;
pub mod container;
pub mod descriptors;
pub mod error;
pub mod inject;
pub mod instance;
pub mod key;
pub mod lifetime;
pub mod module;
pub mod observer;
pub mod registration;
pub mod scanning;
pub mod traits;

// Internal modules
mod internal;

pub use config::{ContainerConfig, DEFAULT_MAX_DEPTH};
pub use container::{Container, ResolverContext};
pub use descriptors::{
    ComponentMarker, ConstructorDescriptor, DescriptorBuilder, FieldDescriptor, Injectable,
    SupertypeEdge, TypeDescriptor,
};
pub use error::{DiError, DiResult, NotFoundReason};
pub use inject::{Dependencies, Inject};
pub use instance::Instance;
pub use key::{key_of_type, ServiceIdentity, TypeKey};
pub use lifetime::Lifetime;
pub use module::{Module, ServiceModule};
pub use observer::{DiObserver, LoggingObserver};
pub use registration::{Recipe, ServiceDescriptor};
pub use scanning::{default_component_name, ComponentEntry, COMPONENTS};
pub use traits::{Resolver, ResolverCore};

#[doc(hidden)]
pub mod __private {
    pub use linkme;
}
