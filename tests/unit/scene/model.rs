use super::*;
use crate::animation::ease::Ease;

const SCENE: &str = r##"{
  "meta": {"title": "Launch", "fps": 30, "width": 1920, "height": 1080},
  "heroType": "phone",
  "phone": {"model": "iphone-15", "screen": "home", "scale": 1.2},
  "shots": [
    {
      "id": "intro",
      "duration": 3.0,
      "camera": {
        "keyframes": [
          {"time": 0.0, "position": [0, 0, 5], "lookAt": [0, 0, 0]},
          {"time": 3.0, "position": [2, 0, 5], "easing": "wobble"}
        ],
        "lookAtBlend": "linear"
      },
      "phone": {
        "keyframes": [{"time": 0.0, "rotation": [0, 15, 0], "scale": [1, 2, 1], "easing": "easeInOut"}],
        "screenChanges": [{"time": 1.5, "screenId": "cart", "transition": {"type": "fade"}}]
      },
      "particleTransition": {"type": "explode", "triggerTime": 1.0, "duration": 2.0, "endColor": "#ff0000"}
    }
  ]
}"##;

#[test]
fn parses_camel_case_wire_format() {
    let def: SceneDefinition = serde_json::from_str(SCENE).unwrap();
    assert_eq!(def.hero_type, HeroType::Phone);
    assert_eq!(def.total_duration(), 3.0);

    let phone = def.phone.as_ref().unwrap();
    assert_eq!(phone.scale, Some(ScaleDef::Uniform(1.2)));

    let shot = &def.shots[0];
    assert_eq!(shot.camera.look_at_blend, Some(LookAtBlend::Linear));
    assert_eq!(shot.camera.keyframes[0].look_at, Some([0.0, 0.0, 0.0]));
    assert_eq!(
        shot.camera.keyframes[1].easing,
        Some(Easing::Unknown("wobble".to_owned()))
    );

    let track = shot.phone.as_ref().unwrap();
    let kf = &track.keyframes.as_ref().unwrap()[0];
    assert_eq!(kf.scale, Some(ScaleDef::Axes([1.0, 2.0, 1.0])));
    assert_eq!(kf.easing, Some(Easing::Known(Ease::EaseInOut)));
    let change = &track.screen_changes.as_ref().unwrap()[0];
    assert_eq!(change.screen_id, "cart");
    assert_eq!(
        change.transition,
        Some(ScreenTransition {
            kind: ScreenTransitionKind::Fade,
            duration: None
        })
    );

    let pt = shot.particle_transition.as_ref().unwrap();
    assert_eq!(pt.kind, ParticleKind::Explode);
    assert_eq!(pt.end_color, Some(Color::rgba(1.0, 0.0, 0.0, 1.0)));
    assert!(pt.particle_count.is_none());
}

#[test]
fn round_trip_keeps_absent_fields_absent() {
    let def: SceneDefinition = serde_json::from_str(SCENE).unwrap();
    let json = serde_json::to_value(&def).unwrap();

    let kf0 = &json["shots"][0]["camera"]["keyframes"][0];
    assert!(kf0.get("easing").is_none());
    assert!(kf0.get("fov").is_none());
    assert!(json.get("cards").is_none());
    assert!(json.get("defaults").is_none());
    assert!(json["shots"][0].get("textOverlays").is_none());
    assert!(
        json["shots"][0]["particleTransition"]
            .get("particleCount")
            .is_none()
    );
    assert_eq!(kf0["lookAt"], serde_json::json!([0.0, 0.0, 0.0]));
    assert_eq!(json["shots"][0]["camera"]["keyframes"][1]["easing"], "wobble");

    let back: SceneDefinition = serde_json::from_value(json).unwrap();
    assert_eq!(back, def);
}

#[test]
fn missing_required_fields_fail_to_parse() {
    let no_shots = r#"{"meta":{"title":"t","fps":30,"width":1,"height":1},"heroType":"phone"}"#;
    assert!(serde_json::from_str::<SceneDefinition>(no_shots).is_err());

    let bad_hero = r#"{"meta":{"title":"t","fps":30,"width":1,"height":1},"heroType":"tablet","shots":[]}"#;
    assert!(serde_json::from_str::<SceneDefinition>(bad_hero).is_err());
}

#[test]
fn scale_def_expands_to_vector() {
    assert_eq!(ScaleDef::Uniform(2.0).to_vec3(), DVec3::splat(2.0));
    assert_eq!(
        ScaleDef::Axes([1.0, 2.0, 3.0]).to_vec3(),
        DVec3::new(1.0, 2.0, 3.0)
    );
}
