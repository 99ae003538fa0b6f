use super::*;

#[test]
fn fps_from_meta_accepts_supported_rates_only() {
    for fps in SUPPORTED_FPS {
        assert_eq!(Fps::from_meta(fps).unwrap().as_f64(), f64::from(fps));
    }
    assert!(Fps::from_meta(25).is_err());
    assert!(Fps::from_meta(0).is_err());
}

#[test]
fn frame_time_is_exact_for_integer_rates() {
    let fps = Fps::from_meta(30).unwrap();
    assert_eq!(fps.frame_time_secs(FrameIndex(45)), 1.5);
    assert_eq!(fps.frame_time_secs(FrameIndex(0)), 0.0);
    assert_eq!(fps.frame_time_secs(FrameIndex(90)), 3.0);
}

#[test]
fn secs_to_frames_round_handles_fractional_durations() {
    let fps = Fps::from_meta(24).unwrap();
    assert_eq!(fps.secs_to_frames_round(2.5), 60);
    assert_eq!(fps.secs_to_frames_round(0.02), 0);
    assert_eq!(fps.secs_to_frames_round(0.03), 1);
    assert_eq!(fps.secs_to_frames_round(-1.0), 0);
    assert_eq!(fps.secs_to_frames_round(f64::NAN), 0);
}

#[test]
fn transform_apply_matches_matrix() {
    let t = Transform3D {
        position: DVec3::new(1.0, 2.0, 3.0),
        rotation: DQuat::from_rotation_y(std::f64::consts::FRAC_PI_2),
        scale: DVec3::splat(2.0),
    };
    let p = DVec3::new(1.0, 0.0, 0.0);
    let a = t.apply(p);
    let b = t.matrix().transform_point3(p);
    assert!((a - b).length() < 1e-12);
    assert!((a - DVec3::new(1.0, 2.0, 1.0)).length() < 1e-12);
}

#[test]
fn premul_rounds_channels() {
    assert_eq!(Rgba8::new(255, 128, 0, 128).to_premul(), [128, 64, 0, 128]);
    assert_eq!(Rgba8::WHITE.to_premul(), [255, 255, 255, 255]);
}

#[test]
fn canvas_aspect_guards_zero_height() {
    assert_eq!(Canvas { width: 1920, height: 1080 }.aspect(), 1920.0 / 1080.0);
    assert_eq!(Canvas { width: 10, height: 0 }.aspect(), 1.0);
}
