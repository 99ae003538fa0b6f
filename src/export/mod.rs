//! Deterministic frame export.

/// Virtual-clock export state machine and `start_recording`.
pub mod driver;
/// Stable digests over exported frames.
pub mod fingerprint;
/// Packager interface and the in-memory / PNG-directory packagers.
pub mod packager;
