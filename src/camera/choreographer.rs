use crate::animation::ease::resolve_easing;
use crate::animation::track::{Keyframe, Lerp, Segment, Track};
use crate::foundation::core::{DMat4, DQuat, DVec3};
use crate::scene::model::{CameraTrack, LookAtBlend};
use glam::DMat3;
use serde::Serialize;

/// Camera position when no keyframe sets one.
pub const DEFAULT_POSITION: DVec3 = DVec3::new(0.0, 0.0, 5.0);
/// Look-at target when no keyframe sets one.
pub const DEFAULT_LOOK_AT: DVec3 = DVec3::ZERO;
/// Vertical field of view (degrees) when no keyframe sets one.
pub const DEFAULT_FOV_DEG: f64 = 50.0;
/// Roll (degrees) when no keyframe sets one.
pub const DEFAULT_ROLL_DEG: f64 = 0.0;

const NEAR: f64 = 0.1;
const FAR: f64 = 100.0;
const EPS: f64 = 1e-9;

/// Resolved camera for one instant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraState {
    pub position: DVec3,
    pub look_at: DVec3,
    pub fov_deg: f64,
    pub roll_deg: f64,
    /// Camera-to-world rotation. The camera looks down its local −Z.
    pub orientation: DQuat,
    /// World-to-view matrix, including roll.
    pub view: DMat4,
    /// Right-handed perspective projection for the output aspect.
    pub projection: DMat4,
}

impl CameraState {
    /// Unit view direction.
    pub fn forward(&self) -> DVec3 {
        self.orientation * DVec3::NEG_Z
    }

    /// `projection * view`.
    pub fn view_projection(&self) -> DMat4 {
        self.projection * self.view
    }
}

/// Per-shot camera tracks.
///
/// Authored keyframes are split per field. A keyframe that leaves a field out adds no key to
/// that field, so each field holds its own last explicit value.
#[derive(Clone, Debug)]
pub struct CameraRig {
    position: Track<DVec3>,
    look_at: Track<DVec3>,
    fov: Track<f64>,
    roll: Track<f64>,
    blend: LookAtBlend,
    aspect: f64,
}

impl CameraRig {
    /// Build the rig for one shot's camera definition.
    pub fn from_def(def: &CameraTrack, aspect: f64) -> Self {
        let mut position = Vec::new();
        let mut look_at = Vec::new();
        let mut fov = Vec::new();
        let mut roll = Vec::new();

        for kf in &def.keyframes {
            let ease = resolve_easing(kf.easing.as_ref());
            let key = |value| Keyframe {
                time: kf.time,
                value,
                ease,
            };
            if let Some(p) = kf.position {
                position.push(key(DVec3::from_array(p)));
            }
            if let Some(p) = kf.look_at {
                look_at.push(key(DVec3::from_array(p)));
            }
            if let Some(v) = kf.fov {
                fov.push(Keyframe {
                    time: kf.time,
                    value: v,
                    ease,
                });
            }
            if let Some(v) = kf.roll {
                roll.push(Keyframe {
                    time: kf.time,
                    value: v,
                    ease,
                });
            }
        }

        Self {
            position: Track::new(position),
            look_at: Track::new(look_at),
            fov: Track::new(fov),
            roll: Track::new(roll),
            blend: def.look_at_blend.unwrap_or_default(),
            aspect: if aspect.is_finite() && aspect > 0.0 {
                aspect
            } else {
                1.0
            },
        }
    }

    /// Look-at blending mode in effect.
    pub fn look_at_blend(&self) -> LookAtBlend {
        self.blend
    }

    /// Sample the camera at shot-local time `t`.
    pub fn sample(&self, t: f64) -> CameraState {
        let position = self.position.sample_or(t, DEFAULT_POSITION);
        let look_at = match self.blend {
            LookAtBlend::Linear => self.look_at.sample_or(t, DEFAULT_LOOK_AT),
            LookAtBlend::Spherical => match self.look_at.locate(t) {
                None => DEFAULT_LOOK_AT,
                Some(Segment::Hold(v)) => *v,
                Some(Segment::Blend { from, to, u }) => spherical_target(position, *from, *to, u),
            },
        };
        let fov_deg = self.fov.sample_or(t, DEFAULT_FOV_DEG);
        let roll_deg = self.roll.sample_or(t, DEFAULT_ROLL_DEG);

        let view = view_matrix(position, look_at, roll_deg);
        let orientation = DQuat::from_mat3(&DMat3::from_mat4(view)).inverse().normalize();
        let fov_rad = fov_deg.clamp(1.0, 170.0).to_radians();
        let projection = DMat4::perspective_rh(fov_rad, self.aspect, NEAR, FAR);

        CameraState {
            position,
            look_at,
            fov_deg,
            roll_deg,
            orientation,
            view,
            projection,
        }
    }
}

/// Rotate the look direction from `from` to `to` about `eye` along the shortest arc, blending
/// the target distance linearly. Falls back to a straight blend when the eye sits on a target.
fn spherical_target(eye: DVec3, from: DVec3, to: DVec3, u: f64) -> DVec3 {
    if u == 0.0 {
        return from;
    }
    if u == 1.0 {
        return to;
    }
    let d0 = from - eye;
    let d1 = to - eye;
    let (l0, l1) = (d0.length(), d1.length());
    if l0 < EPS || l1 < EPS {
        return <DVec3 as Lerp>::lerp(&from, &to, u);
    }
    let arc = DQuat::from_rotation_arc(d0 / l0, d1 / l1);
    let dir = DQuat::IDENTITY.slerp(arc, u) * (d0 / l0);
    eye + dir * <f64 as Lerp>::lerp(&l0, &l1, u)
}

fn view_matrix(eye: DVec3, target: DVec3, roll_deg: f64) -> DMat4 {
    let forward = target - eye;
    let forward = if forward.length() < EPS {
        DVec3::NEG_Z
    } else {
        forward.normalize()
    };
    let up = if forward.cross(DVec3::Y).length() < 1e-6 {
        DVec3::Z
    } else {
        DVec3::Y
    };
    let look = DMat4::look_to_rh(eye, forward, up);
    DMat4::from_rotation_z(-roll_deg.to_radians()) * look
}

#[cfg(test)]
#[path = "../../tests/unit/camera/choreographer.rs"]
mod tests;
