#![forbid(unsafe_code)]

//! Environment-driven defaults.
//!
//! | Variable                   | Effect                                              | Default |
//! |----------------------------|-----------------------------------------------------|---------|
//! | `FTUI_OBSERVER_CAPACITY`   | initial capacity of a subject's observer list       | `4`     |
//! | `FTUI_OBSERVER_WARN_STALE` | log stale or foreign handle disconnects at `warn`   | off     |
//!
//! Values that fail to parse fall back to the default.

use std::sync::OnceLock;

const DEFAULT_OBSERVER_CAPACITY: usize = 4;

/// Tunables shared by every subject and owner in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverConfig {
    /// Initial capacity reserved for a new subject's observer list.
    pub observer_capacity: usize,
    /// Promote stale/foreign handle disconnects from `debug` to `warn`.
    pub warn_stale_handles: bool,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            observer_capacity: DEFAULT_OBSERVER_CAPACITY,
            warn_stale_handles: false,
        }
    }
}

#[inline]
fn env_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl ObserverConfig {
    /// Read the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Read the configuration through a custom environment lookup.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let observer_capacity = get_env("FTUI_OBSERVER_CAPACITY")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.observer_capacity);
        let warn_stale_handles = get_env("FTUI_OBSERVER_WARN_STALE")
            .map(|v| env_flag(&v))
            .unwrap_or(defaults.warn_stale_handles);
        Self {
            observer_capacity,
            warn_stale_handles,
        }
    }

    /// Process-wide configuration, read from the environment once.
    #[must_use]
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<ObserverConfig> = OnceLock::new();
        GLOBAL.get_or_init(Self::from_env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = ObserverConfig::from_env_with(|_| None);
        assert_eq!(config, ObserverConfig::default());
        assert_eq!(config.observer_capacity, 4);
        assert!(!config.warn_stale_handles);
    }

    #[test]
    fn reads_capacity_and_flag() {
        let config = ObserverConfig::from_env_with(lookup(&[
            ("FTUI_OBSERVER_CAPACITY", " 32 "),
            ("FTUI_OBSERVER_WARN_STALE", "Yes"),
        ]));
        assert_eq!(config.observer_capacity, 32);
        assert!(config.warn_stale_handles);
    }

    #[test]
    fn garbage_falls_back() {
        let config = ObserverConfig::from_env_with(lookup(&[
            ("FTUI_OBSERVER_CAPACITY", "lots"),
            ("FTUI_OBSERVER_WARN_STALE", "maybe"),
        ]));
        assert_eq!(config.observer_capacity, 4);
        assert!(!config.warn_stale_handles);
    }

    #[test]
    fn global_is_stable() {
        let a = ObserverConfig::global();
        let b = ObserverConfig::global();
        assert!(std::ptr::eq(a, b));
    }
}
