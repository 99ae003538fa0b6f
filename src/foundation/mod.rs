//! Shared value types, colors, deterministic randomness and errors.

/// Colors as authored in scene JSON.
pub mod color;
/// Frame/time primitives and resolved transforms.
pub mod core;
/// Crate error type.
pub mod error;
/// Seeded generators and noise.
pub mod math;
