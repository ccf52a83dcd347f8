//! Type-erased service instances.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::{key_of_type, TypeKey};

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// A materialized service instance.
///
/// Holds an erased `Arc<T>` (the "view" of the instance as its declared
/// type), the address of the underlying object used for identity checks,
/// and, for sized types, access to the object itself so that its fields can
/// be injected.
///
/// Hand-written factories in a [`Recipe`](crate::Recipe) return one of these.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::Instance;
/// use std::sync::Arc;
///
/// trait Clock: Send + Sync {}
/// struct SystemClock;
/// impl Clock for SystemClock {}
///
/// let concrete = Instance::new(Arc::new(SystemClock));
/// assert!(concrete.has_object());
///
/// let erased = Instance::opaque(Arc::new(SystemClock) as Arc<dyn Clock>);
/// assert!(!erased.has_object());
/// assert!(erased.downcast::<dyn Clock>().is_ok());
/// ```
#[derive(Clone)]
pub struct Instance {
    view: AnyArc,
    object: Option<AnyArc>,
    ty: TypeKey,
    addr: usize,
}

impl Instance {
    /// Wraps a concrete value. Its injectable fields can be written.
    pub fn new<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        let addr = Arc::as_ptr(&value) as *const () as usize;
        Self {
            object: Some(value.clone() as AnyArc),
            view: Arc::new(value) as AnyArc,
            ty: key_of_type::<T>(),
            addr,
        }
    }

    /// Wraps a value known only through `T`, typically a trait object.
    pub fn opaque<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        let addr = Arc::as_ptr(&value) as *const () as usize;
        Self {
            view: Arc::new(value) as AnyArc,
            object: None,
            ty: key_of_type::<T>(),
            addr,
        }
    }

    pub(crate) fn from_view(view: AnyArc, ty: TypeKey, addr: usize) -> Self {
        Self {
            view,
            object: None,
            ty,
            addr,
        }
    }

    /// The type this instance is viewed as.
    pub fn type_key(&self) -> TypeKey {
        self.ty
    }

    /// Address of the underlying object; equal for every view of it.
    pub fn addr(&self) -> usize {
        self.addr
    }

    /// Whether the concrete object is reachable for field injection.
    pub fn has_object(&self) -> bool {
        self.object.is_some()
    }

    pub(crate) fn view(&self) -> &AnyArc {
        &self.view
    }

    pub(crate) fn object(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.object.as_deref()
    }

    /// Recovers the typed `Arc<T>`.
    pub fn downcast<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.view
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or(DiError::TypeMismatch(std::any::type_name::<T>()))
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.ty.display_name())
            .field("addr", &format_args!("{:#x}", self.addr))
            .finish()
    }
}
