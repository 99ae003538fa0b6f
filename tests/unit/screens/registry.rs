use super::*;

#[test]
fn manifest_loads_and_resolves() {
    let reg = StaticScreenRegistry::from_json_str(
        r#"{"screens":[
            {"id":"home","heroMoments":[{"time":2.0,"label":"late"},{"time":0.5,"label":"early","focus":[0.5,0.2]}]},
            {"id":"checkout"}
        ]}"#,
    )
    .unwrap();

    assert_eq!(reg.len(), 2);
    assert_eq!(reg.ids().collect::<Vec<_>>(), vec!["checkout", "home"]);

    let home = reg.resolve("home").unwrap();
    assert_eq!(home.id(), "home");
    let labels: Vec<&str> = home.hero_moments().iter().map(|m| m.label.as_str()).collect();
    assert_eq!(labels, vec!["early", "late"]);
    assert_eq!(home.hero_moments()[0].focus, Some([0.5, 0.2]));

    assert!(reg.resolve("checkout").unwrap().hero_moments().is_empty());
    assert!(reg.resolve("settings").is_none());
    assert!(!reg.contains("settings"));
}

#[test]
fn duplicate_ids_are_rejected() {
    let err = StaticScreenRegistry::from_json_str(r#"{"screens":[{"id":"a"},{"id":"a"}]}"#)
        .unwrap_err();
    assert!(err.is_definition());
    assert!(err.to_string().contains("$.screens[1].id"));
}

#[test]
fn malformed_manifest_is_a_serde_error() {
    let err = StaticScreenRegistry::from_json_str("{\"screens\": 3}").unwrap_err();
    assert!(matches!(err, CineError::Serde(_)));
}

#[test]
fn builder_helpers() {
    let mut reg = StaticScreenRegistry::with_ids(["a", "b"]);
    reg.insert(StaticScreen::new("c").with_moment(1.0, "tap"));
    assert!(reg.contains("a"));
    assert_eq!(reg.resolve("c").unwrap().hero_moments()[0].time, 1.0);
}

#[test]
fn missing_manifest_is_an_io_error() {
    let err = StaticScreenRegistry::from_path("/definitely/not/screens.json").unwrap_err();
    assert!(matches!(err, CineError::Other(_)), "{err:?}");
    assert!(err.to_string().contains("/definitely/not/screens.json"));
}
