//! Per-tick scene evaluation.

/// Scene engine: sequencing, sampling and particle updates for one instant.
pub mod engine;
/// Background and post-processing resolution.
pub mod look;
/// Text overlay visibility and fades.
pub mod overlays;
