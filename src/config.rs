//! Container configuration.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Default limit on nested constructions per thread.
///
/// Each nested construction costs several stack frames; this stays within a
/// 2 MiB thread stack in debug builds.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Tunables for a [`Container`](crate::Container).
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Container, ContainerConfig};
///
/// let config = ContainerConfig::default()
///     .with_max_depth(64)
///     .with_memoized_assignability(false);
/// let container = Container::with_config(config);
/// assert_eq!(container.config().max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerConfig {
    /// Nested constructions allowed on one thread before `DepthExceeded`.
    pub max_depth: usize,
    /// Cache assignability answers between type pairs.
    pub memoize_assignability: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            memoize_assignability: true,
        }
    }
}

impl ContainerConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn with_memoized_assignability(mut self, enabled: bool) -> Self {
        self.memoize_assignability = enabled;
        self
    }

    /// Defaults overridden by `FERROUS_IOC_MAX_DEPTH` and
    /// `FERROUS_IOC_MEMOIZE`. Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = env::var("FERROUS_IOC_MAX_DEPTH") {
            match raw.trim().parse::<usize>() {
                Ok(depth) => config = config.with_max_depth(depth),
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid FERROUS_IOC_MAX_DEPTH"),
            }
        }
        if let Ok(raw) = env::var("FERROUS_IOC_MEMOIZE") {
            match parse_flag(&raw) {
                Some(enabled) => config.memoize_assignability = enabled,
                None => tracing::warn!(value = %raw, "ignoring invalid FERROUS_IOC_MEMOIZE"),
            }
        }
        config
    }

    /// Parses a JSON document; missing fields keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.with_max_depth(config.max_depth))
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
