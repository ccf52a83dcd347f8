//! Type descriptors: the metadata the container needs about a type.
//!
//! Rust has no runtime reflection, so a type describes itself once through
//! [`Injectable::descriptor`]. The container never inspects a type any
//! other way.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::inject::{Dependencies, Inject};
use crate::instance::{AnyArc, Instance};
use crate::key::{key_of_type, TypeKey};

type CastFn = Arc<dyn Fn(&AnyArc) -> Option<AnyArc> + Send + Sync>;
type ConstructFn = Arc<dyn Fn(&[AnyArc]) -> Option<Instance> + Send + Sync>;
type DefaultFn = Arc<dyn Fn() -> Instance + Send + Sync>;
type WriteFn = Arc<dyn Fn(&(dyn Any + Send + Sync), &AnyArc) -> Result<(), String> + Send + Sync>;

/// A type that can describe itself to the container.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Container, Inject, Injectable, Module, Resolver, TypeDescriptor};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct UserRepository;
///
/// impl Injectable for UserRepository {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::builder::<Self>().with_default().component().build()
///     }
/// }
///
/// #[derive(Default)]
/// struct UserService {
///     repository: Inject<UserRepository>,
/// }
///
/// impl Injectable for UserService {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::builder::<Self>()
///             .with_default()
///             .field("repository", |s| &s.repository)
///             .build()
///     }
/// }
///
/// let container = Container::start([Module::new().component::<UserRepository>()]);
/// let service = container.create_instance::<UserService>().unwrap();
/// let repository = container.get_required::<UserRepository>();
/// assert!(Arc::ptr_eq(service.repository.get_required(), &repository));
/// ```
pub trait Injectable: Send + Sync + 'static {
    /// Describes constructors, injectable fields, supertypes and the
    /// component marker of `Self`.
    fn descriptor() -> TypeDescriptor;
}

/// Edge from a type to one of its supertypes or capabilities.
#[derive(Clone)]
pub struct SupertypeEdge {
    parent: TypeKey,
    cast: CastFn,
}

impl SupertypeEdge {
    /// The supertype this edge leads to.
    pub fn parent(&self) -> TypeKey {
        self.parent
    }

    /// Converts a view of the child type into a view of the parent.
    pub(crate) fn cast(&self, view: &AnyArc) -> Option<AnyArc> {
        (self.cast)(view)
    }
}

impl fmt::Debug for SupertypeEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SupertypeEdge").field(&self.parent.display_name()).finish()
    }
}

/// A constructor marked for injection.
#[derive(Clone)]
pub struct ConstructorDescriptor {
    params: Vec<TypeKey>,
    construct: ConstructFn,
}

impl ConstructorDescriptor {
    /// Parameter types, in declared order.
    pub fn parameter_types(&self) -> &[TypeKey] {
        &self.params
    }

    /// Invokes the constructor; `None` when an argument has the wrong type.
    pub(crate) fn invoke(&self, args: &[AnyArc]) -> Option<Instance> {
        (self.construct)(args)
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<_> = self.params.iter().map(|p| p.display_name()).collect();
        f.debug_struct("ConstructorDescriptor").field("params", &params).finish()
    }
}

/// A field marked for injection.
#[derive(Clone)]
pub struct FieldDescriptor {
    name: &'static str,
    declared: TypeKey,
    write: WriteFn,
}

impl FieldDescriptor {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type resolved for this field.
    pub fn declared_type(&self) -> TypeKey {
        self.declared
    }

    /// Writes `value` (a view of the declared type) into the field of `owner`.
    pub(crate) fn write(
        &self,
        owner: &(dyn Any + Send + Sync),
        value: &AnyArc,
    ) -> Result<(), String> {
        (self.write)(owner, value)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("type", &self.declared.display_name())
            .finish()
    }
}

/// Component marker; picked up by scanning only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentMarker {
    name: Option<&'static str>,
}

impl ComponentMarker {
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }
}

/// Everything the container knows about a type.
///
/// Built with [`TypeDescriptor::builder`]. A descriptor is a pure function
/// of the type: building it has no side effects.
#[derive(Clone)]
pub struct TypeDescriptor {
    key: TypeKey,
    supertypes: Vec<SupertypeEdge>,
    constructor: Option<ConstructorDescriptor>,
    default_constructor: Option<DefaultFn>,
    fields: Vec<FieldDescriptor>,
    component: Option<ComponentMarker>,
}

impl TypeDescriptor {
    /// Starts describing `T`.
    pub fn builder<T: ?Sized + Send + Sync + 'static>() -> DescriptorBuilder<T> {
        DescriptorBuilder {
            descriptor: TypeDescriptor::opaque::<T>(),
            _marker: PhantomData,
        }
    }

    /// Identity-only descriptor: no constructors, fields or supertypes.
    pub fn opaque<T: ?Sized + Send + Sync + 'static>() -> Self {
        Self {
            key: key_of_type::<T>(),
            supertypes: Vec::new(),
            constructor: None,
            default_constructor: None,
            fields: Vec::new(),
            component: None,
        }
    }

    pub fn type_key(&self) -> TypeKey {
        self.key
    }

    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    /// Direct supertypes and capabilities.
    pub fn supertypes(&self) -> &[SupertypeEdge] {
        &self.supertypes
    }

    /// Fields marked for injection: the type's own first, then those of
    /// embedded bases.
    pub fn injectable_fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn injectable_constructor(&self) -> Option<&ConstructorDescriptor> {
        self.constructor.as_ref()
    }

    pub fn has_default_constructor(&self) -> bool {
        self.default_constructor.is_some()
    }

    pub(crate) fn default_constructor(&self) -> Option<Instance> {
        self.default_constructor.as_ref().map(|ctor| ctor())
    }

    pub fn is_component(&self) -> bool {
        self.component.is_some()
    }

    /// Name given by the component marker, if any.
    pub fn marker_name(&self) -> Option<&'static str> {
        self.component.and_then(|marker| marker.name())
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type", &self.key.display_name())
            .field("supertypes", &self.supertypes)
            .field("constructor", &self.constructor)
            .field("default_constructor", &self.default_constructor.is_some())
            .field("fields", &self.fields)
            .field("component", &self.component)
            .finish()
    }
}

/// Typed builder for [`TypeDescriptor`].
pub struct DescriptorBuilder<T: ?Sized> {
    descriptor: TypeDescriptor,
    _marker: PhantomData<fn() -> Box<T>>,
}

impl<T: ?Sized + Send + Sync + 'static> DescriptorBuilder<T> {
    /// Declares that `T` can be viewed as `P`.
    ///
    /// `P` is usually a trait object `T` implements, or a supertrait when
    /// `T` is itself a trait object.
    ///
    /// ```rust
    /// use ferrous_ioc::TypeDescriptor;
    /// use std::sync::Arc;
    ///
    /// trait Repository: Send + Sync {}
    /// struct SqlRepository;
    /// impl Repository for SqlRepository {}
    ///
    /// let d = TypeDescriptor::builder::<SqlRepository>()
    ///     .implements::<dyn Repository>(|r| r as Arc<dyn Repository>)
    ///     .build();
    /// assert_eq!(d.supertypes().len(), 1);
    /// ```
    pub fn implements<P>(mut self, cast: fn(Arc<T>) -> Arc<P>) -> Self
    where
        P: ?Sized + Send + Sync + 'static,
    {
        let parent = key_of_type::<P>();
        if parent == self.descriptor.key
            || self.descriptor.supertypes.iter().any(|edge| edge.parent == parent)
        {
            return self;
        }
        self.descriptor.supertypes.push(SupertypeEdge {
            parent,
            cast: Arc::new(move |view: &AnyArc| {
                let child = view.downcast_ref::<Arc<T>>()?;
                Some(Arc::new(cast(child.clone())) as AnyArc)
            }),
        });
        self
    }

    /// Marks `T` as a component discovered by scanning, named after its type.
    pub fn component(mut self) -> Self {
        self.descriptor.component = Some(ComponentMarker { name: None });
        self
    }

    /// Marks `T` as a component registered under `name`.
    pub fn component_named(mut self, name: &'static str) -> Self {
        self.descriptor.component = Some(ComponentMarker {
            name: if name.is_empty() { None } else { Some(name) },
        });
        self
    }

    pub fn build(self) -> TypeDescriptor {
        self.descriptor
    }
}

impl<T: Send + Sync + 'static> DescriptorBuilder<T> {
    /// Declares the constructor marked for injection.
    ///
    /// `D` is `()` or a tuple of `Arc<_>`; each element is resolved by type.
    pub fn inject_constructor<D, F>(mut self, ctor: F) -> Self
    where
        D: Dependencies,
        F: Fn(D) -> T + Send + Sync + 'static,
    {
        self.descriptor.constructor = Some(ConstructorDescriptor {
            params: D::keys(),
            construct: Arc::new(move |views: &[AnyArc]| {
                let deps = D::from_views(views)?;
                Some(Instance::new(Arc::new(ctor(deps))))
            }),
        });
        self
    }

    /// Declares the no-argument constructor.
    pub fn default_constructor<F>(mut self, ctor: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.descriptor.default_constructor =
            Some(Arc::new(move || Instance::new(Arc::new(ctor()))));
        self
    }

    /// Uses `T::default()` as the no-argument constructor.
    pub fn with_default(self) -> Self
    where
        T: Default,
    {
        self.default_constructor(T::default)
    }

    /// Marks a field for injection.
    pub fn field<D>(mut self, name: &'static str, accessor: fn(&T) -> &Inject<D>) -> Self
    where
        D: ?Sized + Send + Sync + 'static,
    {
        self.descriptor.fields.push(FieldDescriptor {
            name,
            declared: key_of_type::<D>(),
            write: Arc::new(move |owner: &(dyn Any + Send + Sync), value: &AnyArc| {
                let owner = owner
                    .downcast_ref::<T>()
                    .ok_or_else(|| format!("owner is not a {}", std::any::type_name::<T>()))?;
                let value = value
                    .downcast_ref::<Arc<D>>()
                    .ok_or_else(|| format!("value is not a {}", std::any::type_name::<D>()))?;
                accessor(owner).write(value.clone())
            }),
        });
        self
    }

    /// Includes the injectable fields of an embedded base `B`.
    ///
    /// They come after the fields already declared and are kept even when a
    /// field of `T` has the same name.
    pub fn embeds<B>(mut self, accessor: fn(&T) -> &B) -> Self
    where
        B: Injectable + Sized,
    {
        for base in B::descriptor().fields {
            let base_write = base.write.clone();
            self.descriptor.fields.push(FieldDescriptor {
                name: base.name,
                declared: base.declared,
                write: Arc::new(move |owner: &(dyn Any + Send + Sync), value: &AnyArc| {
                    let owner = owner
                        .downcast_ref::<T>()
                        .ok_or_else(|| format!("owner is not a {}", std::any::type_name::<T>()))?;
                    base_write(accessor(owner), value)
                }),
            });
        }
        self
    }
}
