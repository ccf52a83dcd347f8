//! Resolution observers.
//!
//! Hooks that see every top-level resolution a container performs. With no
//! observer installed the container skips timing entirely.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::ServiceIdentity;

/// Observer of resolution events.
///
/// Calls are made synchronously on the resolving thread, so keep them cheap.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Container, DiError, DiObserver, Module, Resolver, ServiceIdentity};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct CountingObserver {
///     resolved: AtomicUsize,
/// }
///
/// impl DiObserver for CountingObserver {
///     fn resolving(&self, _identity: &ServiceIdentity) {}
///
///     fn resolved(&self, _identity: &ServiceIdentity, _duration: Duration) {
///         self.resolved.fetch_add(1, Ordering::Relaxed);
///     }
///
///     fn resolution_failed(&self, _identity: &ServiceIdentity, _error: &DiError) {}
/// }
///
/// let observer = Arc::new(CountingObserver::default());
/// let container = Container::start([Module::new().singleton::<u32, _>(|_| 7)]);
/// container.add_observer(observer.clone());
///
/// container.get_required::<u32>();
/// assert_eq!(observer.resolved.load(Ordering::Relaxed), 1);
/// ```
pub trait DiObserver: Send + Sync {
    /// A resolution is starting.
    fn resolving(&self, identity: &ServiceIdentity);

    /// A resolution succeeded after `duration`.
    fn resolved(&self, identity: &ServiceIdentity, duration: Duration);

    /// A resolution failed; the error is still returned to the caller.
    fn resolution_failed(&self, identity: &ServiceIdentity, error: &DiError);
}

#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, identity: &ServiceIdentity) {
        for observer in &self.observers {
            observer.resolving(identity);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, identity: &ServiceIdentity, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(identity, duration);
        }
    }

    #[inline]
    pub(crate) fn resolution_failed(&self, identity: &ServiceIdentity, error: &DiError) {
        for observer in &self.observers {
            observer.resolution_failed(identity, error);
        }
    }
}

/// Forwards resolution events to `tracing`.
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self {
            prefix: "ferrous-ioc".to_string(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for LoggingObserver {
    fn resolving(&self, identity: &ServiceIdentity) {
        tracing::debug!(prefix = %self.prefix, %identity, "resolving");
    }

    fn resolved(&self, identity: &ServiceIdentity, duration: Duration) {
        tracing::debug!(prefix = %self.prefix, %identity, ?duration, "resolved");
    }

    fn resolution_failed(&self, identity: &ServiceIdentity, error: &DiError) {
        tracing::warn!(prefix = %self.prefix, %identity, %error, "resolution failed");
    }
}
