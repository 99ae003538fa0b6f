use super::*;
use crate::eval::engine::{EngineOpts, SceneEngine};
use crate::foundation::color::Color as SceneColor;
use crate::scene::dsl::{SceneBuilder, ShotBuilder};
use crate::scene::model::{Background, SceneDefaults};
use crate::screens::registry::StaticScreenRegistry;

fn state_with(defaults: Option<SceneDefaults>) -> RenderState {
    let mut builder = SceneBuilder::phone("preview", 30, 64, 36);
    if let Some(d) = defaults {
        builder = builder.defaults(d);
    }
    let scene = builder.shot(ShotBuilder::new("s", 1.0).build()).build_unchecked();
    let mut engine =
        SceneEngine::new(&scene, &StaticScreenRegistry::new(), EngineOpts::default()).unwrap();
    engine.evaluate(0.5).unwrap()
}

fn pixel(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [frame.data[i], frame.data[i + 1], frame.data[i + 2], frame.data[i + 3]]
}

#[test]
fn draws_background_and_phone() {
    let mut r = PreviewRenderer::default();
    let state = state_with(None);
    let h = r.draw(&state).unwrap();
    let frame = r.capture_frame(h).unwrap();
    assert_eq!((frame.width, frame.height), (64, 36));
    assert_eq!(frame.data.len(), 64 * 36 * 4);
    assert!(frame.premultiplied);
    assert_eq!(pixel(&frame, 0, 0), [0, 0, 0, 255]);
    assert_eq!(pixel(&frame, 32, 18), [30, 30, 34, 255]);
}

#[test]
fn objects_can_be_skipped() {
    let mut r = PreviewRenderer::new(PreviewOpts {
        draw_objects: false,
        ..PreviewOpts::default()
    });
    let h = r.draw(&state_with(None)).unwrap();
    let frame = r.capture_frame(h).unwrap();
    assert_eq!(pixel(&frame, 32, 18), [0, 0, 0, 255]);
}

#[test]
fn solid_and_gradient_backgrounds() {
    let red = Some(SceneDefaults {
        background: Some(Background {
            color: Some(SceneColor::rgba(1.0, 0.0, 0.0, 1.0)),
            ..Background::default()
        }),
        post_processing: None,
    });
    let mut r = PreviewRenderer::default();
    let h = r.draw(&state_with(red)).unwrap();
    assert_eq!(pixel(&r.capture_frame(h).unwrap(), 1, 1), [255, 0, 0, 255]);

    let gradient = Some(SceneDefaults {
        background: Some(Background {
            gradient: Some([
                SceneColor::rgba(1.0, 1.0, 1.0, 1.0),
                SceneColor::rgba(0.0, 0.0, 0.0, 1.0),
            ]),
            ..Background::default()
        }),
        post_processing: None,
    });
    let h = r.draw(&state_with(gradient)).unwrap();
    let frame = r.capture_frame(h).unwrap();
    let top = pixel(&frame, 1, 0);
    let bottom = pixel(&frame, 1, 35);
    assert!(top[0] > 240, "{top:?}");
    assert!(bottom[0] < 15, "{bottom:?}");
}

#[test]
fn drawing_is_deterministic() {
    let state = state_with(None);
    let mut a = PreviewRenderer::default();
    let mut b = PreviewRenderer::default();
    let ha = a.draw(&state).unwrap();
    let hb = b.draw(&state).unwrap();
    assert_eq!(a.capture_frame(ha).unwrap(), b.capture_frame(hb).unwrap());
}

#[test]
fn stale_handles_are_rejected() {
    let mut r = PreviewRenderer::default();
    assert!(r.capture_frame(DrawHandle(0)).is_err());

    let state = state_with(None);
    let first = r.draw(&state).unwrap();
    let second = r.draw(&state).unwrap();
    assert_ne!(first, second);
    let err = r.capture_frame(first).unwrap_err();
    assert!(matches!(err, CineError::RenderCollaborator(_)));
    assert!(r.capture_frame(second).is_ok());
}

#[test]
fn oversized_canvas_is_a_collaborator_error() {
    let mut state = state_with(None);
    state.canvas.width = 70_000;
    let err = PreviewRenderer::default().draw(&state).unwrap_err();
    assert!(matches!(err, CineError::RenderCollaborator(_)));
}
