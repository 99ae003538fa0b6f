use crate::animation::ease::resolve_easing;
use crate::animation::track::{Keyframe, Rotation, Track};
use crate::foundation::color::Color;
use crate::foundation::core::{DQuat, DVec3, Rgba8, Transform3D};
use crate::scene::model::{
    CardDefinition, ObjectTrack, PhoneConfig, ScaleDef, ScreenTransitionKind,
};
use serde::Serialize;
use smallvec::SmallVec;

/// Object id used for the phone hero object.
pub const PHONE_ID: &str = "phone";
/// Phone body size (width, height, depth) in scene units.
pub const PHONE_SIZE: DVec3 = DVec3::new(0.75, 1.55, 0.08);
/// Card thickness.
pub const CARD_DEPTH: f64 = 0.02;
/// Card width when unset.
pub const DEFAULT_CARD_WIDTH: f64 = 1.6;
/// Card height when unset.
pub const DEFAULT_CARD_HEIGHT: f64 = 1.0;

const PHONE_COLOR: Rgba8 = Rgba8::new(30, 30, 34, 255);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Phone,
    Card,
}

/// Static look of an object.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    /// Body size before scale.
    pub size: DVec3,
    pub color: Rgba8,
    pub corner_radius: f64,
}

/// One screen contributing to an object's display.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenLayer {
    pub screen_id: String,
    /// Blend weight; the weights of a [`ScreenState`] sum to 1.
    pub weight: f64,
    /// Seconds since this screen became active.
    pub screen_time: f64,
}

/// In-progress screen transition.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenTransitionState {
    pub kind: ScreenTransitionKind,
    /// Linear progress in `[0, 1)`.
    pub progress: f64,
}

/// Screens visible on an object. Blending the layers is left to the renderer.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenState {
    /// Outgoing layer first while a transition runs.
    pub layers: SmallVec<[ScreenLayer; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<ScreenTransitionState>,
}

impl ScreenState {
    /// Screen with the largest weight (the incoming one on ties).
    pub fn primary(&self) -> Option<&ScreenLayer> {
        self.layers
            .iter()
            .max_by(|a, b| a.weight.total_cmp(&b.weight))
    }
}

/// Sampled object for one instant.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectState {
    pub id: String,
    pub kind: ObjectKind,
    pub transform: Transform3D,
    pub appearance: Appearance,
    pub screen: ScreenState,
}

#[derive(Clone, Debug)]
struct ScreenCue {
    time: f64,
    screen_id: String,
    kind: ScreenTransitionKind,
    duration: f64,
}

/// Animates one hero object within one shot.
#[derive(Clone, Debug)]
pub struct ObjectAnimator {
    id: String,
    kind: ObjectKind,
    rest: Transform3D,
    appearance: Appearance,
    default_screen: Option<String>,
    position: Track<DVec3>,
    rotation: Track<Rotation>,
    scale: Track<DVec3>,
    cues: Vec<ScreenCue>,
}

impl ObjectAnimator {
    /// Animator for the phone, at rest until [`ObjectAnimator::with_track`] is applied.
    pub fn phone(cfg: Option<&PhoneConfig>) -> Self {
        let cfg = cfg.cloned().unwrap_or_default();
        Self::at_rest(
            PHONE_ID.to_owned(),
            ObjectKind::Phone,
            rest_pose(cfg.position, cfg.rotation, cfg.scale),
            Appearance {
                size: PHONE_SIZE,
                color: cfg.color.map_or(PHONE_COLOR, Color::to_rgba8),
                corner_radius: 0.08,
            },
            cfg.screen,
        )
    }

    /// Animator for one card.
    pub fn card(def: &CardDefinition) -> Self {
        let material = def.material.clone().unwrap_or_default();
        let mut color = material.color.map_or(Rgba8::WHITE, Color::to_rgba8);
        if let Some(opacity) = material.opacity {
            color.a = (opacity.clamp(0.0, 1.0) * f64::from(color.a)).round() as u8;
        }
        Self::at_rest(
            def.id.clone(),
            ObjectKind::Card,
            rest_pose(def.position, def.rotation, def.scale),
            Appearance {
                size: DVec3::new(
                    def.width.unwrap_or(DEFAULT_CARD_WIDTH),
                    def.height.unwrap_or(DEFAULT_CARD_HEIGHT),
                    CARD_DEPTH,
                ),
                color,
                corner_radius: def.corner_radius.unwrap_or(0.0),
            },
            def.screen.clone(),
        )
    }

    fn at_rest(
        id: String,
        kind: ObjectKind,
        rest: Transform3D,
        appearance: Appearance,
        default_screen: Option<String>,
    ) -> Self {
        Self {
            id,
            kind,
            rest,
            appearance,
            default_screen,
            position: Track::default(),
            rotation: Track::default(),
            scale: Track::default(),
            cues: Vec::new(),
        }
    }

    /// Attach a shot's track. Fade/slide changes without a duration use `transition_secs`.
    pub fn with_track(mut self, track: Option<&ObjectTrack>, transition_secs: f64) -> Self {
        let Some(track) = track else {
            return self;
        };

        let mut position = Vec::new();
        let mut rotation = Vec::new();
        let mut scale = Vec::new();
        for kf in track.keyframes.iter().flatten() {
            let ease = resolve_easing(kf.easing.as_ref());
            if let Some(p) = kf.position {
                position.push(Keyframe {
                    time: kf.time,
                    value: DVec3::from_array(p),
                    ease,
                });
            }
            if let Some(r) = kf.rotation {
                rotation.push(Keyframe {
                    time: kf.time,
                    value: Rotation::from_euler_deg(r),
                    ease,
                });
            }
            if let Some(s) = kf.scale {
                scale.push(Keyframe {
                    time: kf.time,
                    value: s.to_vec3(),
                    ease,
                });
            }
        }
        self.position = Track::new(position);
        self.rotation = Track::new(rotation);
        self.scale = Track::new(scale);

        self.cues = track
            .screen_changes
            .iter()
            .flatten()
            .map(|c| {
                let (kind, duration) = match c.transition {
                    None => (ScreenTransitionKind::Cut, 0.0),
                    Some(tr) => match tr.kind {
                        ScreenTransitionKind::Cut => (ScreenTransitionKind::Cut, 0.0),
                        kind => (kind, tr.duration.unwrap_or(transition_secs).max(0.0)),
                    },
                };
                ScreenCue {
                    time: c.time,
                    screen_id: c.screen_id.clone(),
                    kind,
                    duration,
                }
            })
            .collect();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn appearance(&self) -> Appearance {
        self.appearance
    }

    /// Pose at shot-local time `t`. Fields without keys hold the rest pose.
    pub fn transform_at(&self, t: f64) -> Transform3D {
        Transform3D {
            position: self.position.sample_or(t, self.rest.position),
            rotation: self.rotation.sample_or(t, Rotation(self.rest.rotation)).0,
            scale: self.scale.sample_or(t, self.rest.scale),
        }
    }

    /// Screens visible at shot-local time `t`.
    pub fn screen_at(&self, t: f64) -> ScreenState {
        let idx = self.cues.partition_point(|c| c.time <= t);
        let Some(current) = idx.checked_sub(1).map(|i| &self.cues[i]) else {
            return match &self.default_screen {
                Some(id) => single(id, t.max(0.0)),
                None => ScreenState::default(),
            };
        };

        let since = t - current.time;
        let previous = match idx.checked_sub(2) {
            Some(i) => Some((self.cues[i].screen_id.as_str(), self.cues[i].time)),
            None => self.default_screen.as_deref().map(|id| (id, 0.0)),
        };

        match previous {
            Some((prev_id, prev_time))
                if current.kind != ScreenTransitionKind::Cut
                    && current.duration > 0.0
                    && since < current.duration =>
            {
                let progress = since / current.duration;
                let mut layers = SmallVec::new();
                layers.push(ScreenLayer {
                    screen_id: prev_id.to_owned(),
                    weight: 1.0 - progress,
                    screen_time: t - prev_time,
                });
                layers.push(ScreenLayer {
                    screen_id: current.screen_id.clone(),
                    weight: progress,
                    screen_time: since,
                });
                ScreenState {
                    layers,
                    transition: Some(ScreenTransitionState {
                        kind: current.kind,
                        progress,
                    }),
                }
            }
            _ => single(&current.screen_id, since),
        }
    }

    /// Full object state at shot-local time `t`.
    pub fn sample(&self, t: f64) -> ObjectState {
        ObjectState {
            id: self.id.clone(),
            kind: self.kind,
            transform: self.transform_at(t),
            appearance: self.appearance,
            screen: self.screen_at(t),
        }
    }
}

fn single(screen_id: &str, screen_time: f64) -> ScreenState {
    let mut layers = SmallVec::new();
    layers.push(ScreenLayer {
        screen_id: screen_id.to_owned(),
        weight: 1.0,
        screen_time,
    });
    ScreenState {
        layers,
        transition: None,
    }
}

fn rest_pose(
    position: Option<[f64; 3]>,
    rotation: Option<[f64; 3]>,
    scale: Option<ScaleDef>,
) -> Transform3D {
    Transform3D {
        position: position.map_or(DVec3::ZERO, DVec3::from_array),
        rotation: rotation.map_or(DQuat::IDENTITY, |r| Rotation::from_euler_deg(r).0),
        scale: scale.map_or(DVec3::ONE, ScaleDef::to_vec3),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/objects/animator.rs"]
mod tests;
