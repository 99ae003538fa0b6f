use super::*;

fn overlay() -> TextOverlay {
    TextOverlay {
        text: "Hi".to_owned(),
        start_time: 1.0,
        end_time: Some(3.0),
        position: None,
        font_size: None,
        color: None,
        fade_duration: Some(0.5),
        easing: None,
    }
}

#[test]
fn hidden_outside_window() {
    let track = OverlayTrack::compile(&overlay(), 4.0);
    assert!(track.sample(0.99).is_none());
    assert!(track.sample(3.01).is_none());
    assert!(track.sample(1.0).is_some());
}

#[test]
fn fades_in_and_out() {
    let track = OverlayTrack::compile(&overlay(), 4.0);
    assert_eq!(track.sample(1.0).unwrap().opacity, 0.0);
    assert_eq!(track.sample(1.25).unwrap().opacity, 0.5);
    assert_eq!(track.sample(2.0).unwrap().opacity, 1.0);
    assert_eq!(track.sample(2.75).unwrap().opacity, 0.5);
    assert_eq!(track.sample(3.0).unwrap().opacity, 0.0);
}

#[test]
fn defaults_apply() {
    let mut def = overlay();
    def.end_time = None;
    def.fade_duration = None;
    let track = OverlayTrack::compile(&def, 4.0);
    let s = track.sample(3.9).unwrap();
    assert_eq!(s.position, DEFAULT_OVERLAY_POSITION);
    assert_eq!(s.font_size, DEFAULT_FONT_SIZE);
    assert_eq!(s.color, Rgba8::WHITE);
    assert!(track.sample(4.0).is_some());
    assert!(track.sample(4.1).is_none());
}

#[test]
fn zero_fade_is_fully_opaque() {
    let mut def = overlay();
    def.fade_duration = Some(0.0);
    let track = OverlayTrack::compile(&def, 4.0);
    assert_eq!(track.sample(1.0).unwrap().opacity, 1.0);
}

#[test]
fn visible_set_keeps_authoring_order() {
    let mut second = overlay();
    second.text = "There".to_owned();
    second.start_time = 0.0;
    let tracks = vec![
        OverlayTrack::compile(&overlay(), 4.0),
        OverlayTrack::compile(&second, 4.0),
    ];
    let texts: Vec<String> = visible_overlays(&tracks, 2.0)
        .into_iter()
        .map(|o| o.text)
        .collect();
    assert_eq!(texts, vec!["Hi", "There"]);
    assert_eq!(visible_overlays(&tracks, 0.5).len(), 1);
}
