//! Procedural particle transitions.

/// Per-shot lifecycle and field caching.
pub mod engine;
/// Particle generation and motion.
pub mod field;
