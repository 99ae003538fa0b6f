//! cinescene is a declarative cinematic scene engine.
//!
//! A [`SceneDefinition`] describes shots, keyframed camera and hero-object tracks, particle
//! transitions and overlays as pure data. The crate interprets it tick by tick:
//!
//! - Load and validate a [`Scene`] against a [`ScreenRegistry`]
//! - Create a [`SceneEngine`] and sample a [`RenderState`] at any time or frame
//! - Export every frame deterministically with [`start_recording`], through a [`Renderer`] and a
//!   [`Packager`]
#![forbid(unsafe_code)]

pub mod animation;
pub mod camera;
pub mod eval;
pub mod export;
pub mod foundation;
pub mod objects;
pub mod particles;
pub mod render;
pub mod scene;
pub mod screens;
pub mod timeline;

pub use crate::animation::ease::{Ease, Easing};
pub use crate::foundation::color::Color;
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Rgba8, Transform3D};
pub use crate::foundation::error::{CineError, CineResult};

pub use crate::eval::engine::{EngineOpts, SceneEngine};
pub use crate::export::driver::{
    CancelToken, ExportOpts, ExportPhase, ExportStats, FrameExportDriver, start_recording,
};
pub use crate::export::fingerprint::ExportDigest;
pub use crate::export::packager::{
    Archive, InMemoryPackager, PackageInfo, Packager, PngDirOpts, PngDirPackager,
};
pub use crate::render::backend::{DrawHandle, FrameRGBA, Renderer};
pub use crate::render::preview::{PreviewOpts, PreviewRenderer};
pub use crate::render::state::RenderState;
pub use crate::scene::definition::Scene;
pub use crate::scene::dsl::{SceneBuilder, ShotBuilder};
pub use crate::scene::model::SceneDefinition;
pub use crate::scene::validate::{Diagnostic, ValidationLimits};
pub use crate::screens::registry::{
    HeroMoment, ScreenComponent, ScreenRegistry, StaticScreen, StaticScreenRegistry,
};
pub use crate::timeline::sequencer::{Timeline, TimelinePosition};
