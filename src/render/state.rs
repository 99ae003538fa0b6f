use crate::camera::choreographer::CameraState;
use crate::eval::look::BackgroundState;
use crate::eval::overlays::OverlayState;
use crate::foundation::core::Canvas;
use crate::objects::animator::ObjectState;
use crate::particles::engine::ParticleFrame;
use crate::scene::model::PostProcessing;
use serde::Serialize;

/// Hero moment of the primary object's current screen close to the sampled instant.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusHint {
    pub object_id: String,
    pub screen_id: String,
    pub label: String,
    /// Moment time on the screen's own clock.
    pub moment_time: f64,
    /// `screen_time - moment_time`; negative before the moment.
    pub offset: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<[f64; 2]>,
}

/// Everything a renderer needs to draw one instant.
///
/// Derived from the scene and the sampled time only; rebuilt for every tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderState {
    /// Global scene time in seconds.
    pub time: f64,
    pub shot_index: usize,
    pub shot_id: String,
    pub local_time: f64,
    /// The sampled time reached the end of the scene.
    pub complete: bool,
    pub canvas: Canvas,
    pub camera: CameraState,
    /// Hero objects in definition order.
    pub objects: Vec<ObjectState>,
    pub particles: ParticleFrame,
    pub overlays: Vec<OverlayState>,
    pub background: BackgroundState,
    pub post_processing: PostProcessing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<FocusHint>,
}

impl RenderState {
    /// Object by id.
    pub fn object(&self, id: &str) -> Option<&ObjectState> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Number of particles drawn this tick.
    pub fn particle_count(&self) -> usize {
        self.particles.particles.len()
    }
}
