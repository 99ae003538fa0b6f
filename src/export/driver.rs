use crate::eval::engine::{EngineOpts, SceneEngine};
use crate::export::fingerprint::{ExportDigest, FrameDigest};
use crate::export::packager::{Archive, PackageInfo, Packager};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{CineError, CineResult};
use crate::render::backend::Renderer;
use crate::scene::definition::Scene;
use crate::screens::registry::ScreenRegistry;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Minimum digits in exported frame numbers.
pub const MIN_PAD_WIDTH: usize = 5;

/// Export state machine phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportPhase {
    Idle,
    /// Evaluating and submitting the current frame.
    Stepping,
    /// Waiting for and reading back the current frame.
    Capturing,
    Done,
    Aborted,
}

/// Cloneable cancellation flag, checked between frames.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Options for one export run.
#[derive(Clone, Debug, Default)]
pub struct ExportOpts {
    pub engine: EngineOpts,
    pub cancel: Option<CancelToken>,
}

/// Counters and digest of an export run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportStats {
    pub frames_total: u64,
    pub frames_captured: u64,
    /// Fingerprint over all captured frames.
    pub digest: ExportDigest,
}

/// Zero-padding width for `total` frames: `max(5, digits(total - 1))`.
pub fn pad_width(total: u64) -> usize {
    let last = total.saturating_sub(1);
    let digits = last.checked_ilog10().map_or(1, |d| d as usize + 1);
    digits.max(MIN_PAD_WIDTH)
}

/// `frame_<zero-padded index>.png`.
pub fn frame_name(idx: FrameIndex, pad: usize) -> String {
    format!("frame_{:0pad$}.png", idx.0)
}

/// Steps a [`SceneEngine`] through every frame on a virtual clock, handing each render state to
/// a [`Renderer`] and each captured frame to a [`Packager`].
///
/// Virtual time of frame `i` is exactly `i / fps`; no wall clock is consulted.
pub struct FrameExportDriver<'a> {
    engine: SceneEngine,
    renderer: &'a mut dyn Renderer,
    packager: &'a mut dyn Packager,
    cancel: Option<CancelToken>,
    phase: ExportPhase,
    next: FrameIndex,
    total: u64,
    pad: usize,
    digest: FrameDigest,
}

impl<'a> FrameExportDriver<'a> {
    pub fn new(
        engine: SceneEngine,
        renderer: &'a mut dyn Renderer,
        packager: &'a mut dyn Packager,
        cancel: Option<CancelToken>,
    ) -> Self {
        let total = engine.frame_count();
        Self {
            engine,
            renderer,
            packager,
            cancel,
            phase: ExportPhase::Idle,
            next: FrameIndex(0),
            total,
            pad: pad_width(total),
            digest: FrameDigest::new(),
        }
    }

    pub fn phase(&self) -> ExportPhase {
        self.phase
    }

    /// Frames captured so far.
    pub fn frames_captured(&self) -> u64 {
        self.digest.frames()
    }

    pub fn stats(&self) -> ExportStats {
        ExportStats {
            frames_total: self.total,
            frames_captured: self.digest.frames(),
            digest: self.digest.finish(),
        }
    }

    /// Run the export to completion.
    #[tracing::instrument(skip(self), fields(frames = self.total))]
    pub fn run(&mut self) -> CineResult<Archive> {
        if self.phase != ExportPhase::Idle {
            return Err(CineError::evaluation(format!(
                "export driver already used (phase {:?})",
                self.phase
            )));
        }
        let canvas = self.engine.canvas();
        let info = PackageInfo {
            width: canvas.width,
            height: canvas.height,
            fps: self.engine.fps(),
            frame_count: self.total,
            pad_width: self.pad,
        };
        tracing::info!(
            width = info.width,
            height = info.height,
            fps = info.fps.num,
            "export started"
        );
        if let Err(e) = self.packager.begin(info) {
            return Err(self.fail(as_collaborator(e)));
        }

        while self.next.0 < self.total {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                let frames_completed = self.frames_captured();
                self.packager.abort();
                self.phase = ExportPhase::Aborted;
                tracing::info!(frames_completed, "export cancelled");
                return Err(CineError::ExportAborted { frames_completed });
            }
            if let Err(e) = self.step() {
                return Err(self.fail(e));
            }
        }

        match self.packager.finalize() {
            Ok(archive) => {
                self.phase = ExportPhase::Done;
                tracing::info!(
                    frames = self.frames_captured(),
                    digest = %self.digest.finish(),
                    "export finished"
                );
                Ok(archive)
            }
            Err(e) => Err(self.fail(as_collaborator(e))),
        }
    }

    fn step(&mut self) -> CineResult<()> {
        let idx = self.next;
        self.phase = ExportPhase::Stepping;
        let state = self.engine.evaluate_frame(idx)?;
        let handle = self.renderer.draw(&state).map_err(as_collaborator)?;

        self.phase = ExportPhase::Capturing;
        self.renderer.await_draw(handle).map_err(as_collaborator)?;
        let frame = self
            .renderer
            .capture_frame(handle)
            .map_err(as_collaborator)?;
        let name = frame_name(idx, self.pad);
        self.packager
            .add_frame(idx, &name, &frame)
            .map_err(as_collaborator)?;
        self.digest.push(idx, &frame);

        self.next = FrameIndex(idx.0 + 1);
        Ok(())
    }

    fn fail(&mut self, e: CineError) -> CineError {
        self.packager.abort();
        self.phase = ExportPhase::Aborted;
        tracing::warn!(frame = self.next.0, "export failed: {e}");
        e
    }
}

/// Renderer and packager failures all surface as [`CineError::RenderCollaborator`].
fn as_collaborator(e: CineError) -> CineError {
    match e {
        CineError::RenderCollaborator(_) => e,
        other => CineError::collaborator(other.to_string()),
    }
}

/// Validate `scene`, then export every frame through `renderer` into `packager`.
///
/// Definition errors surface before the packager sees any call.
pub fn start_recording(
    scene: &Scene,
    screens: &dyn ScreenRegistry,
    renderer: &mut dyn Renderer,
    packager: &mut dyn Packager,
    opts: ExportOpts,
) -> CineResult<(Archive, ExportStats)> {
    let engine = SceneEngine::new(scene, screens, opts.engine)?;
    let mut driver = FrameExportDriver::new(engine, renderer, packager, opts.cancel);
    let archive = driver.run()?;
    Ok((archive, driver.stats()))
}

#[cfg(test)]
#[path = "../../tests/unit/export/driver.rs"]
mod tests;
