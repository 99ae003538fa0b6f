//! Hero object animation.

/// Per-object pose tracks and screen changes.
pub mod animator;
