//! Service key types for the container.

use std::any::TypeId;
use std::fmt;

/// Identity of a type known to the container.
///
/// Works for sized types and for trait objects, so a capability is keyed
/// by its `dyn Trait` type.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{key_of_type, TypeKey};
/// use std::any::TypeId;
///
/// trait Greeter: Send + Sync {}
///
/// let key = key_of_type::<String>();
/// assert_eq!(key.type_id(), TypeId::of::<String>());
/// assert_eq!(key.display_name(), "alloc::string::String");
///
/// let capability: TypeKey = key_of_type::<dyn Greeter>();
/// assert!(capability.display_name().starts_with("dyn "));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Creates a key from its parts.
    pub fn new(id: TypeId, name: &'static str) -> Self {
        Self { id, name }
    }

    /// The `TypeId` this key stands for.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// The `std::any::type_name` of the type, for diagnostics.
    pub fn display_name(&self) -> &'static str {
        self.name
    }

    /// Type name without module path or generic arguments.
    ///
    /// ```rust
    /// use ferrous_ioc::key_of_type;
    ///
    /// assert_eq!(key_of_type::<String>().simple_name(), "String");
    /// assert_eq!(key_of_type::<Vec<String>>().simple_name(), "Vec");
    /// ```
    pub fn simple_name(&self) -> &'static str {
        let base = match self.name.find('<') {
            Some(pos) => &self.name[..pos],
            None => self.name,
        };
        let base = base.strip_prefix("dyn ").unwrap_or(base);
        match base.rfind("::") {
            Some(pos) => &base[pos + 2..],
            None => base,
        }
    }
}

// TypeId comparison only; the name is diagnostic
impl PartialEq for TypeKey {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl std::hash::Hash for TypeKey {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Creates the key for `T`.
#[inline(always)]
pub fn key_of_type<T: ?Sized + 'static>() -> TypeKey {
    TypeKey::new(TypeId::of::<T>(), std::any::type_name::<T>())
}

/// A type, optionally qualified by a name.
///
/// An empty name is the same as no name.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{key_of_type, ServiceIdentity};
///
/// let a = ServiceIdentity::named(key_of_type::<u32>(), "port");
/// let b = ServiceIdentity::named(key_of_type::<u64>(), "port");
/// let c = ServiceIdentity::named(key_of_type::<u32>(), "");
///
/// assert!(a.same_named(&b));
/// assert!(!c.same_named(&c));
/// assert_eq!(c.name(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceIdentity {
    ty: TypeKey,
    name: Option<String>,
}

impl ServiceIdentity {
    /// Type-only identity.
    pub fn of_type(ty: TypeKey) -> Self {
        Self { ty, name: None }
    }

    /// Named identity; an empty name yields a type-only identity.
    pub fn named(ty: TypeKey, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            ty,
            name: if name.is_empty() { None } else { Some(name) },
        }
    }

    /// Type-only identity for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::of_type(key_of_type::<T>())
    }

    pub fn type_key(&self) -> TypeKey {
        self.ty
    }

    pub fn type_name(&self) -> &'static str {
        self.ty.display_name()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// True iff both identities carry the same non-empty name.
    pub fn same_named(&self, other: &ServiceIdentity) -> bool {
        match (&self.name, &other.name) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for ServiceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} (\"{}\")", self.ty.display_name(), name),
            None => f.write_str(self.ty.display_name()),
        }
    }
}
