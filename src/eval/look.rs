use crate::foundation::color::Color;
use crate::foundation::core::Rgba8;
use crate::scene::model::{Background, PostProcessing, SceneDefaults, Shot};
use serde::Serialize;

/// Background the renderer clears to.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundState {
    pub color: Rgba8,
    /// Top and bottom colors; takes precedence over `color` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<[Rgba8; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

impl Default for BackgroundState {
    fn default() -> Self {
        Self {
            color: Rgba8::BLACK,
            gradient: None,
            environment: None,
        }
    }
}

impl From<&Background> for BackgroundState {
    fn from(bg: &Background) -> Self {
        Self {
            color: bg.color.map_or(Rgba8::BLACK, Color::to_rgba8),
            gradient: bg.gradient.map(|[a, b]| [a.to_rgba8(), b.to_rgba8()]),
            environment: bg.environment.clone(),
        }
    }
}

/// Background and post-processing resolved once per shot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShotLook {
    pub background: BackgroundState,
    pub post_processing: PostProcessing,
}

impl ShotLook {
    /// Shot value, else the scene default, else black with no post-processing.
    pub fn resolve(shot: &Shot, defaults: Option<&SceneDefaults>) -> Self {
        let background = shot
            .background
            .as_ref()
            .or_else(|| defaults.and_then(|d| d.background.as_ref()))
            .map(BackgroundState::from)
            .unwrap_or_default();
        let post_processing = shot
            .post_processing
            .as_ref()
            .or_else(|| defaults.and_then(|d| d.post_processing.as_ref()))
            .cloned()
            .unwrap_or_default();
        Self {
            background,
            post_processing,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/look.rs"]
mod tests;
