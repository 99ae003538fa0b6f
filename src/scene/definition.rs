use anyhow::Context;
use crate::foundation::error::{CineError, CineResult};
use crate::scene::model::SceneDefinition;
use crate::scene::validate::{Diagnostic, ValidationLimits, validate_scene};
use crate::screens::registry::ScreenRegistry;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Scene boundary object.
///
/// Wraps the JSON-facing [`SceneDefinition`]. The engine compiles it into per-shot rigs and
/// animators when constructing a [`crate::eval::engine::SceneEngine`].
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    def: SceneDefinition,
}

impl Scene {
    /// Parse a scene from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CineResult<Self> {
        let def: SceneDefinition = serde_json::from_reader(r)
            .map_err(|e| CineError::serde(format!("parse scene JSON: {e}")))?;
        Ok(Self { def })
    }

    /// Parse a scene from a JSON string.
    pub fn from_json_str(s: &str) -> CineResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CineResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open scene JSON '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Pretty-printed JSON. Absent optional fields stay absent.
    pub fn to_json_string(&self) -> CineResult<String> {
        serde_json::to_string_pretty(&self.def)
            .map_err(|e| CineError::serde(format!("serialize scene JSON: {e}")))
    }

    /// Write pretty-printed JSON to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> CineResult<()> {
        let path = path.as_ref();
        let f = File::create(path).map_err(|e| {
            anyhow::anyhow!("create scene JSON '{}': {e}", path.display())
        })?;
        serde_json::to_writer_pretty(BufWriter::new(f), &self.def)
            .map_err(|e| CineError::serde(format!("write scene JSON: {e}")))
    }

    /// Validate against `screens`, returning warnings.
    pub fn validate(
        &self,
        screens: &dyn ScreenRegistry,
        limits: ValidationLimits,
    ) -> CineResult<Vec<Diagnostic>> {
        validate_scene(&self.def, screens, limits)
            .map_err(|e| CineError::definition(format!("scene validation failed:\n{e}")))
    }

    /// Scene duration in seconds.
    pub fn total_duration(&self) -> f64 {
        self.def.total_duration()
    }

    pub fn def(&self) -> &SceneDefinition {
        &self.def
    }

    pub fn into_def(self) -> SceneDefinition {
        self.def
    }
}

impl From<SceneDefinition> for Scene {
    fn from(def: SceneDefinition) -> Self {
        Self { def }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/definition.rs"]
mod tests;
