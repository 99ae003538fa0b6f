//! Scene definitions: wire model, loading, validation and a builder DSL.

/// JSON boundary wrapper.
pub mod definition;
/// Builder helpers for authoring scenes in Rust.
pub mod dsl;
/// Serde model of the scene format.
pub mod model;
/// Structural and reference validation.
pub mod validate;
