use anyhow::Context;
use crate::foundation::error::{CineError, CineResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A moment inside a screen's own animation worth drawing the viewer's eye to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroMoment {
    /// Seconds since the screen became active.
    pub time: f64,
    /// Free-form label, e.g. `"checkout"`.
    pub label: String,
    /// Normalized position on the screen surface, `[0,0]` top-left.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<[f64; 2]>,
}

/// Screen content rendered onto a hero object. Implemented outside the engine.
pub trait ScreenComponent {
    /// Registry id.
    fn id(&self) -> &str;

    /// Hero moments, ordered by time.
    fn hero_moments(&self) -> &[HeroMoment];
}

/// Lookup of screen ids referenced by a scene.
pub trait ScreenRegistry {
    /// Resolve `id`, `None` when unknown.
    fn resolve(&self, id: &str) -> Option<&dyn ScreenComponent>;

    /// `true` when `id` resolves.
    fn contains(&self, id: &str) -> bool {
        self.resolve(id).is_some()
    }
}

/// Plain-data screen entry used by [`StaticScreenRegistry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticScreen {
    pub id: String,
    #[serde(default)]
    pub hero_moments: Vec<HeroMoment>,
}

impl StaticScreen {
    /// A screen without hero moments.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hero_moments: Vec::new(),
        }
    }

    /// Append a hero moment.
    pub fn with_moment(mut self, time: f64, label: impl Into<String>) -> Self {
        self.hero_moments.push(HeroMoment {
            time,
            label: label.into(),
            focus: None,
        });
        self
    }
}

impl ScreenComponent for StaticScreen {
    fn id(&self) -> &str {
        &self.id
    }

    fn hero_moments(&self) -> &[HeroMoment] {
        &self.hero_moments
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    screens: Vec<StaticScreen>,
}

/// In-memory registry, usually loaded from a JSON manifest:
///
/// ```json
/// {"screens": [{"id": "home", "heroMoments": [{"time": 1.2, "label": "cta"}]}]}
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticScreenRegistry {
    screens: BTreeMap<String, StaticScreen>,
}

impl StaticScreenRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry of screens with no hero moments.
    pub fn with_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut reg = Self::new();
        for id in ids {
            reg.insert(StaticScreen::new(id));
        }
        reg
    }

    /// Insert or replace a screen.
    pub fn insert(&mut self, screen: StaticScreen) {
        self.screens.insert(screen.id.clone(), screen);
    }

    /// Registered ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.screens.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Parse a manifest from a JSON reader. Duplicate ids are rejected.
    pub fn from_reader<R: std::io::Read>(r: R) -> CineResult<Self> {
        let manifest: Manifest = serde_json::from_reader(r)
            .map_err(|e| CineError::serde(format!("parse screen manifest JSON: {e}")))?;
        Self::from_manifest(manifest)
    }

    /// Parse a manifest from a JSON string.
    pub fn from_json_str(s: &str) -> CineResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse a manifest from a file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CineResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open screen manifest '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    fn from_manifest(manifest: Manifest) -> CineResult<Self> {
        let mut reg = Self::new();
        for (i, mut screen) in manifest.screens.into_iter().enumerate() {
            if screen.id.is_empty() {
                return Err(CineError::definition(format!(
                    "$.screens[{i}].id: must be non-empty"
                )));
            }
            if reg.screens.contains_key(&screen.id) {
                return Err(CineError::definition(format!(
                    "$.screens[{i}].id: duplicate screen id '{}'",
                    screen.id
                )));
            }
            screen
                .hero_moments
                .sort_by(|a, b| a.time.total_cmp(&b.time));
            reg.insert(screen);
        }
        Ok(reg)
    }
}

impl ScreenRegistry for StaticScreenRegistry {
    fn resolve(&self, id: &str) -> Option<&dyn ScreenComponent> {
        self.screens.get(id).map(|s| s as &dyn ScreenComponent)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/screens/registry.rs"]
mod tests;
