//! Render state handed to renderers, the renderer interface and the CPU preview renderer.

/// Renderer collaborator interface and frame buffers.
pub mod backend;
/// `vello_cpu` preview renderer.
pub mod preview;
/// Per-tick render state.
pub mod state;
