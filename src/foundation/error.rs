/// Result alias used across the crate.
pub type CineResult<T> = Result<T, CineError>;

/// Error kinds surfaced by loading, evaluating and exporting scenes.
#[derive(thiserror::Error, Debug)]
pub enum CineError {
    /// Malformed scene definition. Raised at load time, before any frame is produced.
    #[error("definition error: {0}")]
    Definition(String),

    /// Failure reported by an external collaborator (renderer or packager).
    #[error("render collaborator error: {0}")]
    RenderCollaborator(String),

    /// Configured workload beyond the engine limits.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Export cancelled between frames. Partial output has been discarded.
    #[error("export aborted after {frames_completed} frame(s)")]
    ExportAborted {
        /// Frames captured before the abort was observed.
        frames_completed: u64,
    },

    /// Evaluation failed for a well-formed definition.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, usually I/O.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CineError {
    /// Build a [`CineError::Definition`].
    pub fn definition(msg: impl Into<String>) -> Self {
        Self::Definition(msg.into())
    }

    /// Build a [`CineError::RenderCollaborator`].
    pub fn collaborator(msg: impl Into<String>) -> Self {
        Self::RenderCollaborator(msg.into())
    }

    /// Build a [`CineError::ResourceExhausted`].
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::ResourceExhausted(msg.into())
    }

    /// Build a [`CineError::Evaluation`].
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`CineError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for errors raised before any frame could be produced.
    pub fn is_definition(&self) -> bool {
        matches!(self, Self::Definition(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
