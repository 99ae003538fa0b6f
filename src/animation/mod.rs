//! Easing curves and keyframe tracks.

/// Easing library.
pub mod ease;
/// Generic keyframe interpolation.
pub mod track;
