//! Global time to (shot, local time) mapping.

/// Shot sequencing.
pub mod sequencer;
