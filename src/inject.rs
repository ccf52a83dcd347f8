//! Injection slots and constructor dependency lists.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::instance::AnyArc;
use crate::key::{key_of_type, TypeKey};

/// A field marked for injection.
///
/// The container writes the slot once, right after the owning object is
/// constructed and before it is handed out. A second write is refused and
/// surfaces as [`DiError::InjectionFailure`](crate::DiError::InjectionFailure).
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::Inject;
/// use std::sync::Arc;
///
/// struct Repository;
///
/// let slot: Inject<Repository> = Inject::new();
/// assert!(!slot.is_injected());
/// assert!(slot.get().is_none());
/// ```
pub struct Inject<D: ?Sized> {
    cell: OnceCell<Arc<D>>,
}

impl<D: ?Sized> Inject<D> {
    /// An empty slot.
    pub const fn new() -> Self {
        Self { cell: OnceCell::new() }
    }

    /// The injected dependency, if the container has written it.
    pub fn get(&self) -> Option<&Arc<D>> {
        self.cell.get()
    }

    /// The injected dependency.
    ///
    /// # Panics
    ///
    /// Panics if the slot was never injected, e.g. when the owning value
    /// was built by hand instead of through the container.
    pub fn get_required(&self) -> &Arc<D> {
        match self.cell.get() {
            Some(value) => value,
            None => panic!(
                "dependency {} was not injected",
                std::any::type_name::<D>()
            ),
        }
    }

    pub fn is_injected(&self) -> bool {
        self.cell.get().is_some()
    }

    pub(crate) fn write(&self, value: Arc<D>) -> Result<(), String> {
        self.cell
            .set(value)
            .map_err(|_| "field is already injected".to_string())
    }
}

impl<D: ?Sized> Default for Inject<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: ?Sized> fmt::Debug for Inject<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inject")
            .field("type", &std::any::type_name::<D>())
            .field("injected", &self.is_injected())
            .finish()
    }
}

/// The parameter list of a constructor marked for injection.
///
/// Implemented for `()` and for tuples of `Arc<_>` up to eight elements.
/// Each element is resolved by type, in declared order.
pub trait Dependencies: Sized + 'static {
    /// Parameter types in declared order.
    fn keys() -> Vec<TypeKey>;

    /// Rebuilds the typed parameters from resolved views; `None` when a
    /// view does not hold the expected type.
    fn from_views(views: &[AnyArc]) -> Option<Self>;
}

impl Dependencies for () {
    fn keys() -> Vec<TypeKey> {
        Vec::new()
    }

    fn from_views(_views: &[AnyArc]) -> Option<Self> {
        Some(())
    }
}

macro_rules! impl_dependencies {
    ($($param:ident : $idx:tt),+) => {
        impl<$($param),+> Dependencies for ($(Arc<$param>,)+)
        where
            $($param: ?Sized + Send + Sync + 'static),+
        {
            fn keys() -> Vec<TypeKey> {
                vec![$(key_of_type::<$param>()),+]
            }

            fn from_views(views: &[AnyArc]) -> Option<Self> {
                Some(($(views.get($idx)?.downcast_ref::<Arc<$param>>()?.clone(),)+))
            }
        }
    };
}

impl_dependencies!(A: 0);
impl_dependencies!(A: 0, B: 1);
impl_dependencies!(A: 0, B: 1, C: 2);
impl_dependencies!(A: 0, B: 1, C: 2, D: 3);
impl_dependencies!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_dependencies!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_dependencies!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_dependencies!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_is_write_once() {
        let slot: Inject<String> = Inject::new();
        slot.write(Arc::new("first".to_string())).unwrap();
        assert!(slot.write(Arc::new("second".to_string())).is_err());
        assert_eq!(slot.get_required().as_str(), "first");
    }

    #[test]
    fn tuple_dependencies_keep_declared_order() {
        let keys = <(Arc<u8>, Arc<String>)>::keys();
        assert_eq!(keys, vec![key_of_type::<u8>(), key_of_type::<String>()]);

        let views: Vec<AnyArc> = vec![
            Arc::new(Arc::new(7u8)),
            Arc::new(Arc::new("seven".to_string())),
        ];
        let (a, b) = <(Arc<u8>, Arc<String>)>::from_views(&views).unwrap();
        assert_eq!(*a, 7);
        assert_eq!(b.as_str(), "seven");

        let swapped: Vec<AnyArc> = views.into_iter().rev().collect();
        assert!(<(Arc<u8>, Arc<String>)>::from_views(&swapped).is_none());
    }
}
