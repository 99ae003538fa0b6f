//! Camera keyframe evaluation.

/// Per-shot camera rig and sampled camera state.
pub mod choreographer;
