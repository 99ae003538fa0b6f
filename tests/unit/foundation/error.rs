use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CineError::definition("x")
            .to_string()
            .contains("definition error:")
    );
    assert!(
        CineError::collaborator("x")
            .to_string()
            .contains("render collaborator error:")
    );
    assert!(
        CineError::resource("x")
            .to_string()
            .contains("resource exhausted:")
    );
    assert!(
        CineError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        CineError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn aborted_reports_completed_frames() {
    let err = CineError::ExportAborted {
        frames_completed: 7,
    };
    assert_eq!(err.to_string(), "export aborted after 7 frame(s)");
    assert!(!err.is_definition());
    assert!(CineError::definition("bad").is_definition());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CineError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
