use super::*;

#[test]
fn endpoints_are_stable() {
    for ease in Ease::ALL {
        assert_eq!(ease.apply(0.0), 0.0, "{ease:?} at 0");
        assert_eq!(ease.apply(1.0), 1.0, "{ease:?} at 1");
    }
}

#[test]
fn input_is_clamped() {
    for ease in Ease::ALL {
        assert_eq!(ease.apply(-3.0), 0.0);
        assert_eq!(ease.apply(7.0), 1.0);
        assert_eq!(ease.apply(f64::NAN), 0.0);
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in Ease::ALL {
        if matches!(ease, Ease::Spring | Ease::BackOut) {
            continue;
        }
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b, "{ease:?}");
        assert!(b < c, "{ease:?}");
    }
}

#[test]
fn spring_like_kinds_overshoot() {
    let peak = |e: Ease| {
        (1..100)
            .map(|i| e.apply(f64::from(i) / 100.0))
            .fold(f64::MIN, f64::max)
    };
    assert!(peak(Ease::Spring) > 1.0);
    assert!(peak(Ease::BackOut) > 1.0);
}

#[test]
fn linear_is_identity() {
    for i in 0..=10 {
        let t = f64::from(i) / 10.0;
        assert_eq!(Ease::Linear.apply(t), t);
    }
}

#[test]
fn wire_names_are_camel_case() {
    assert_eq!(
        serde_json::to_string(&Ease::EaseInOutCubic).unwrap(),
        "\"easeInOutCubic\""
    );
    let e: Easing = serde_json::from_str("\"easeInOut\"").unwrap();
    assert_eq!(e, Easing::Known(Ease::EaseInOut));
}

#[test]
fn unknown_names_fall_back_to_linear_and_roundtrip() {
    let e: Easing = serde_json::from_str("\"bouncy\"").unwrap();
    assert_eq!(e, Easing::Unknown("bouncy".to_owned()));
    assert_eq!(e.resolve(), Ease::Linear);
    assert_eq!(serde_json::to_string(&e).unwrap(), "\"bouncy\"");
    assert_eq!(resolve_easing(None), Ease::Linear);
    assert_eq!(
        resolve_easing(Some(&Easing::Known(Ease::Spring))),
        Ease::Spring
    );
}
