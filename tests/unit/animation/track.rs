use super::*;

fn key<T>(time: f64, value: T, ease: Ease) -> Keyframe<T> {
    Keyframe { time, value, ease }
}

fn scalar_track() -> Track<f64> {
    Track::new(vec![
        key(0.0, 0.0, Ease::Linear),
        key(1.0, 10.0, Ease::EaseIn),
        key(3.0, -2.0, Ease::Linear),
    ])
}

#[test]
fn exact_key_times_return_key_values() {
    let track = scalar_track();
    for k in track.keys() {
        assert_eq!(track.sample(k.time), Some(k.value));
    }
}

#[test]
fn no_extrapolation_outside_keys() {
    let track = scalar_track();
    assert_eq!(track.sample(-5.0), Some(0.0));
    assert_eq!(track.sample(100.0), Some(-2.0));
    assert_eq!(track.sample(f64::NAN), Some(0.0));
}

#[test]
fn arriving_keyframe_easing_shapes_segment() {
    let track = scalar_track();
    // Segment 0 -> 1 arrives at an easeIn key: u = 0.5 -> 0.25.
    assert_eq!(track.sample(0.5), Some(2.5));
    // Segment 1 -> 3 arrives at a linear key.
    assert_eq!(track.sample(2.0), Some(4.0));
}

#[test]
fn linear_blend_matches_hand_computation() {
    let track = Track::new(vec![
        key(0.0, DVec3::new(0.0, 1.0, -4.0), Ease::Linear),
        key(3.0, DVec3::new(2.0, 4.0, 2.0), Ease::Linear),
    ]);
    let v = track.sample(1.5).unwrap();
    assert_eq!(v, DVec3::new(1.0, 2.5, -1.0));
}

#[test]
fn zero_length_segment_resolves_to_later_key() {
    let track = Track::new(vec![
        key(0.0, 0.0, Ease::Linear),
        key(1.0, 5.0, Ease::Linear),
        key(1.0, 9.0, Ease::Linear),
        key(2.0, 9.0, Ease::Linear),
    ]);
    assert_eq!(track.sample(1.0), Some(9.0));
    assert_eq!(track.sample(0.5), Some(2.5));
    assert_eq!(track.sample(1.5), Some(9.0));
}

#[test]
fn empty_track_samples_none() {
    let track: Track<f64> = Track::default();
    assert!(track.is_empty());
    assert_eq!(track.sample(1.0), None);
    assert_eq!(track.sample_or(1.0, 42.0), 42.0);
}

#[test]
fn locate_reports_bracket() {
    let track = scalar_track();
    match track.locate(2.0).unwrap() {
        Segment::Blend { from, to, u } => {
            assert_eq!(*from, 10.0);
            assert_eq!(*to, -2.0);
            assert_eq!(u, 0.5);
        }
        Segment::Hold(_) => panic!("expected blend"),
    }
    assert_eq!(track.locate(3.0), Some(Segment::Hold(&-2.0)));
}

#[test]
fn validate_rejects_out_of_order_and_out_of_range() {
    assert!(scalar_track().validate(3.0).is_ok());
    assert!(scalar_track().validate(2.0).is_err());

    let unordered = Track::new(vec![key(1.0, 0.0, Ease::Linear), key(0.5, 1.0, Ease::Linear)]);
    let err = unordered.validate(2.0).unwrap_err();
    assert!(err.is_definition());
    assert!(err.to_string().contains("is before keyframe 0"));

    let negative = Track::new(vec![key(-0.1, 0.0, Ease::Linear)]);
    assert!(negative.validate(1.0).is_err());
}

#[test]
fn rotation_blend_takes_shortest_arc() {
    let a = Rotation::from_euler_deg([0.0, 170.0, 0.0]);
    let b = Rotation::from_euler_deg([0.0, -170.0, 0.0]);
    let mid = Rotation::lerp(&a, &b, 0.5);
    // The short way round passes through 180 degrees, not 0.
    let forward = mid.0 * DVec3::Z;
    assert!((forward - DVec3::new(0.0, 0.0, -1.0)).length() < 1e-9);
    assert!((mid.0.length() - 1.0).abs() < 1e-12);
}

#[test]
fn rotation_blend_handles_negated_quaternions() {
    let a = Rotation(DQuat::from_rotation_x(0.3));
    let b = Rotation(-DQuat::from_rotation_x(0.5));
    let mid = Rotation::lerp(&a, &b, 0.5);
    let expected = DQuat::from_rotation_x(0.4);
    assert!(mid.0.dot(expected).abs() > 1.0 - 1e-12);
}

#[test]
fn color_blend_rounds_channels() {
    let a = Rgba8::new(0, 0, 0, 255);
    let b = Rgba8::new(255, 100, 10, 255);
    assert_eq!(Rgba8::lerp(&a, &b, 0.5), Rgba8::new(128, 50, 5, 255));
    assert_eq!(Rgba8::lerp(&a, &b, 1.5), Rgba8::new(255, 150, 15, 255));
}

#[test]
fn rotation_track_hits_middle_key_exactly() {
    let mid = Rotation::from_euler_deg([10.0, 72.0, -35.0]);
    let track = Track::new(vec![
        key(0.0, Rotation::from_euler_deg([0.0, 0.0, 0.0]), Ease::Linear),
        key(1.0, mid, Ease::EaseInOutCubic),
        key(2.0, Rotation::from_euler_deg([-40.0, 150.0, 20.0]), Ease::Spring),
    ]);
    assert_eq!(track.sample(1.0), Some(mid));
    assert!(matches!(track.locate(1.0), Some(Segment::Hold(_))));
    for k in track.keys() {
        assert_eq!(track.sample(k.time), Some(k.value));
    }
}

#[test]
fn rotation_lerp_endpoints_are_exact() {
    let a = Rotation::from_euler_deg([12.0, 67.5, 3.0]);
    let b = Rotation::from_euler_deg([-80.0, 5.0, 44.0]);
    assert_eq!(Rotation::lerp(&a, &b, 0.0), a);
    assert_eq!(Rotation::lerp(&a, &b, 1.0), b);
}
