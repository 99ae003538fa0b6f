//! Screen content lookup.

/// Screen registry interface and the static manifest-backed registry.
pub mod registry;
