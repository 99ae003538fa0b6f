use super::*;
use crate::animation::ease::{Ease, Easing};
use crate::scene::model::CameraKeyframe;

fn close(a: DVec3, b: DVec3) -> bool {
    (a - b).length() < 1e-9
}

fn kf(time: f64) -> CameraKeyframe {
    CameraKeyframe {
        time,
        ..CameraKeyframe::default()
    }
}

#[test]
fn empty_track_uses_defaults() {
    let rig = CameraRig::from_def(&CameraTrack::default(), 16.0 / 9.0);
    let cam = rig.sample(1.0);
    assert_eq!(cam.position, DEFAULT_POSITION);
    assert_eq!(cam.look_at, DEFAULT_LOOK_AT);
    assert_eq!(cam.fov_deg, 50.0);
    assert_eq!(cam.roll_deg, 0.0);
    assert!(close(cam.forward(), DVec3::NEG_Z));
    // The look-at target lands on the view axis at its distance.
    let target_view = cam.view.transform_point3(DVec3::ZERO);
    assert!(close(target_view, DVec3::new(0.0, 0.0, -5.0)));
}

#[test]
fn linear_position_blend_is_exact() {
    let def = CameraTrack {
        keyframes: vec![
            CameraKeyframe {
                position: Some([0.0, 0.0, 5.0]),
                ..kf(0.0)
            },
            CameraKeyframe {
                position: Some([2.0, 0.0, 5.0]),
                ..kf(3.0)
            },
        ],
        look_at_blend: None,
    };
    let rig = CameraRig::from_def(&def, 1.0);
    assert_eq!(rig.sample(1.5).position.x, 1.0);
    assert_eq!(rig.sample(3.0).position.x, 2.0);
    assert_eq!(rig.sample(9.0).position.x, 2.0);
}

#[test]
fn sparse_fields_hold_their_own_last_value() {
    let def = CameraTrack {
        keyframes: vec![
            CameraKeyframe {
                position: Some([1.0, 2.0, 3.0]),
                fov: Some(40.0),
                ..kf(0.0)
            },
            CameraKeyframe {
                fov: Some(60.0),
                easing: Some(Easing::Known(Ease::EaseIn)),
                ..kf(2.0)
            },
        ],
        look_at_blend: None,
    };
    let rig = CameraRig::from_def(&def, 1.0);
    let cam = rig.sample(1.0);
    // Position has a single key, so it holds instead of blending toward a default.
    assert_eq!(cam.position, DVec3::new(1.0, 2.0, 3.0));
    // fov 40 -> 60 arriving at an easeIn key: u = 0.5 -> 0.25.
    assert_eq!(cam.fov_deg, 45.0);
    assert_eq!(cam.look_at, DEFAULT_LOOK_AT);
}

#[test]
fn spherical_look_at_keeps_distance() {
    let keys = vec![
        CameraKeyframe {
            position: Some([0.0, 0.0, 0.0]),
            look_at: Some([0.0, 0.0, -5.0]),
            ..kf(0.0)
        },
        CameraKeyframe {
            look_at: Some([5.0, 0.0, 0.0]),
            ..kf(2.0)
        },
    ];
    let spherical = CameraRig::from_def(
        &CameraTrack {
            keyframes: keys.clone(),
            look_at_blend: None,
        },
        1.0,
    );
    assert_eq!(spherical.look_at_blend(), LookAtBlend::Spherical);
    let mid = spherical.sample(1.0).look_at;
    let h = 5.0 * std::f64::consts::FRAC_1_SQRT_2;
    assert!(close(mid, DVec3::new(h, 0.0, -h)));
    assert!((mid.length() - 5.0).abs() < 1e-9);

    let linear = CameraRig::from_def(
        &CameraTrack {
            keyframes: keys,
            look_at_blend: Some(LookAtBlend::Linear),
        },
        1.0,
    );
    assert!(close(linear.sample(1.0).look_at, DVec3::new(2.5, 0.0, -2.5)));
}

#[test]
fn spherical_look_at_hits_middle_key_exactly() {
    let def = CameraTrack {
        keyframes: vec![
            CameraKeyframe {
                position: Some([0.0, 0.5, 4.0]),
                look_at: Some([0.0, 0.0, 0.0]),
                ..kf(0.0)
            },
            CameraKeyframe {
                look_at: Some([1.3, 0.7, -0.2]),
                ..kf(1.0)
            },
            CameraKeyframe {
                look_at: Some([-0.4, 0.1, 0.9]),
                ..kf(2.0)
            },
        ],
        look_at_blend: None,
    };
    let rig = CameraRig::from_def(&def, 16.0 / 9.0);
    assert_eq!(rig.sample(1.0).look_at, DVec3::new(1.3, 0.7, -0.2));
    assert_eq!(rig.sample(2.0).look_at, DVec3::new(-0.4, 0.1, 0.9));
    assert_eq!(rig.sample(0.0).look_at, DVec3::ZERO);
}

#[test]
fn roll_rotates_about_view_axis() {
    let def = CameraTrack {
        keyframes: vec![CameraKeyframe {
            roll: Some(90.0),
            ..kf(0.0)
        }],
        look_at_blend: None,
    };
    let cam = CameraRig::from_def(&def, 1.0).sample(0.0);
    let p = cam.view.transform_point3(DVec3::new(1.0, 0.0, 0.0));
    assert!(close(p, DVec3::new(0.0, -1.0, -5.0)));
    // Roll never changes where the camera points.
    assert!(close(cam.forward(), DVec3::NEG_Z));
}

#[test]
fn looking_straight_down_is_well_defined() {
    let def = CameraTrack {
        keyframes: vec![CameraKeyframe {
            position: Some([0.0, 10.0, 0.0]),
            ..kf(0.0)
        }],
        look_at_blend: None,
    };
    let cam = CameraRig::from_def(&def, 1.0).sample(0.0);
    assert!(cam.view.is_finite());
    assert!(close(cam.forward(), DVec3::NEG_Y));
}

#[test]
fn sampling_never_mutates_the_definition() {
    let def = CameraTrack {
        keyframes: vec![CameraKeyframe {
            position: Some([1.0, 1.0, 1.0]),
            ..kf(0.0)
        }],
        look_at_blend: None,
    };
    let before = def.clone();
    let rig = CameraRig::from_def(&def, 1.0);
    let _ = rig.sample(0.5);
    assert_eq!(def, before);
}
