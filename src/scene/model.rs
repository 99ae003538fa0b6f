//! Authoring-time scene definition.
//!
//! This is the wire format: a serde tree mirrored 1:1 from scene JSON. Optional fields stay
//! `None` through a round trip; defaults are substituted by the engine when it compiles the
//! scene, never here.

use crate::animation::ease::Easing;
use crate::foundation::color::Color;
use crate::foundation::core::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDefinition {
    /// Title, frame rate and output size.
    pub meta: SceneMeta,
    /// Which hero object the scene animates.
    pub hero_type: HeroType,
    /// Phone configuration (phone scenes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<PhoneConfig>,
    /// Card set (card scenes). Required and non-empty iff `hero_type` is `cards`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<CardDefinition>>,
    /// Fallback look shared by all shots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<SceneDefaults>,
    /// Ordered, non-empty shot list.
    pub shots: Vec<Shot>,
}

impl SceneDefinition {
    /// Sum of all shot durations.
    pub fn total_duration(&self) -> f64 {
        self.shots.iter().map(|s| s.duration).sum()
    }
}

/// Scene metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneMeta {
    /// Human-readable title.
    pub title: String,
    /// Frames per second; one of 24, 30, 60.
    pub fps: u32,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeroType {
    /// A single phone mockup.
    Phone,
    /// A set of floating cards.
    Cards,
}

/// Uniform (`1.2`) or per-axis (`[1, 2, 1]`) scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleDef {
    /// Same factor on every axis.
    Uniform(f64),
    /// Per-axis factors.
    Axes([f64; 3]),
}

impl ScaleDef {
    /// Per-axis scale vector.
    pub fn to_vec3(self) -> DVec3 {
        match self {
            Self::Uniform(s) => DVec3::splat(s),
            Self::Axes(a) => DVec3::from_array(a),
        }
    }
}

/// Static phone parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneConfig {
    /// Device model name, passed through to the renderer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Frame color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Screen shown before any screen change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen: Option<String>,
    /// Rest position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
    /// Rest rotation, Euler XYZ degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 3]>,
    /// Rest scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleDef>,
}

/// Static card parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDefinition {
    /// Unique card id, referenced by shot tracks.
    pub id: String,
    /// Screen shown on the card before any screen change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<CardMaterial>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMaterial {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metalness: Option<f64>,
}

/// Scene-wide fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_processing: Option<PostProcessing>,
}

/// One fixed-duration segment of the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shot {
    /// Unique shot id; also seeds the shot's particles.
    pub id: String,
    /// Seconds, `> 0`.
    pub duration: f64,
    /// Camera keyframes.
    pub camera: CameraTrack,
    /// Phone track (phone scenes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<ObjectTrack>,
    /// Card tracks keyed by card id (card scenes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<BTreeMap<String, ObjectTrack>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_overlays: Option<Vec<TextOverlay>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_processing: Option<PostProcessing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub particle_transition: Option<ParticleTransition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraTrack {
    /// Keyframes ordered by time. Each keyframe may set any subset of fields.
    pub keyframes: Vec<CameraKeyframe>,
    /// How the look-at target travels between keys; spherical when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub look_at_blend: Option<LookAtBlend>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraKeyframe {
    pub time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub look_at: Option<[f64; 3]>,
    /// Vertical field of view in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fov: Option<f64>,
    /// Roll about the view axis in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<Easing>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookAtBlend {
    /// Rotate the view direction along the shortest arc.
    #[default]
    Spherical,
    /// Blend target points component-wise.
    Linear,
}

/// Per-object animation within a shot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectTrack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyframes: Option<Vec<ObjectKeyframe>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_changes: Option<Vec<ScreenChange>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectKeyframe {
    pub time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
    /// Euler XYZ degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<Easing>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenChange {
    pub time: f64,
    pub screen_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<ScreenTransition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenTransition {
    #[serde(rename = "type")]
    pub kind: ScreenTransitionKind,
    /// Cross-fade length in seconds; the engine default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenTransitionKind {
    Cut,
    Fade,
    Slide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOverlay {
    pub text: String,
    pub start_time: f64,
    /// Defaults to the end of the shot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    /// Normalized viewport position, `[0,0]` top-left.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<Easing>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Background {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Top and bottom colors of a vertical gradient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<[Color; 2]>,
    /// Environment preset name, passed through to the renderer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostProcessing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bloom: Option<Bloom>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vignette: Option<Vignette>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_of_field: Option<DepthOfField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chromatic_aberration: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bloom {
    pub intensity: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vignette {
    pub darkness: f64,
    pub offset: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthOfField {
    pub focus_distance: f64,
    pub aperture: f64,
}

/// Procedural particle effect attached to a shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleTransition {
    #[serde(rename = "type")]
    pub kind: ParticleKind,
    /// Shot-local start of the effect window.
    pub trigger_time: f64,
    /// Window length in seconds.
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub particle_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread_radius: Option<f64>,
    /// Directional bias added to every particle's initial velocity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub particle_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_color: Option<Color>,
    /// Downward (−Y) acceleration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravity: Option<f64>,
    /// Lateral jitter amplitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turbulence: Option<f64>,
    /// Object the particles come from or converge to. Defaults to the primary hero object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Shapes the opacity ramp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<Easing>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleKind {
    Dissolve,
    Assemble,
    Explode,
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
