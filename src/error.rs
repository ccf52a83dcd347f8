//! Error types for the inversion-of-control container.

use std::fmt;

use crate::key::ServiceIdentity;

/// Why a [`DiError::ServiceNotFound`] was raised.
///
/// Lets callers tell "nothing registered" apart from "found the wrong thing".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundReason {
    /// No recipe is registered for the type, directly or by capability.
    NotRegistered,
    /// No recipe is registered under the requested name.
    UnknownName,
    /// A recipe exists under the name, but its declared type cannot be
    /// viewed as the requested type.
    IncompatibleType {
        /// Declared type of the recipe registered under the name.
        declared: &'static str,
    },
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundReason::NotRegistered => write!(f, "no matching registration"),
            NotFoundReason::UnknownName => write!(f, "no registration under that name"),
            NotFoundReason::IncompatibleType { declared } => {
                write!(f, "registered type {} is not compatible", declared)
            }
        }
    }
}

/// Dependency injection errors
///
/// Every variant carries the identity or type involved so calling code can
/// report which service failed and why.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Container, DiError, NotFoundReason, Resolver};
///
/// let container = Container::new();
/// match container.get::<String>() {
///     Err(DiError::ServiceNotFound { identity, reason }) => {
///         assert_eq!(identity.type_name(), "alloc::string::String");
///         assert_eq!(reason, NotFoundReason::NotRegistered);
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, thiserror::Error)]
pub enum DiError {
    /// No recipe satisfies the requested identity
    #[error("Service not found: {identity} ({reason})")]
    ServiceNotFound {
        identity: ServiceIdentity,
        reason: NotFoundReason,
    },
    /// Field injection or construction re-entered an instance already in progress
    #[error("Circular dependency: {}", .path.join(" -> "))]
    CircularDependency {
        type_name: &'static str,
        path: Vec<&'static str>,
    },
    /// Neither an injectable nor a default constructor is declared
    #[error("No suitable constructor for: {0}")]
    NoSuitableConstructor(&'static str),
    /// A resolved dependency could not be written into its field
    #[error("Injection failed for {type_name}.{field}: {reason}")]
    InjectionFailure {
        type_name: &'static str,
        field: &'static str,
        reason: String,
    },
    /// Type-erased value could not be downcast to the requested type
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// Maximum construction depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
}

impl DiError {
    pub(crate) fn not_found(identity: ServiceIdentity, reason: NotFoundReason) -> Self {
        DiError::ServiceNotFound { identity, reason }
    }

    /// Returns true for [`DiError::ServiceNotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, DiError::ServiceNotFound { .. })
    }

    /// Returns true for [`DiError::CircularDependency`].
    pub fn is_circular(&self) -> bool {
        matches!(self, DiError::CircularDependency { .. })
    }
}

/// Result type for DI operations
pub type DiResult<T> = Result<T, DiError>;
