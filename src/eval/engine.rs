use crate::camera::choreographer::CameraRig;
use crate::eval::look::ShotLook;
use crate::eval::overlays::{OverlayTrack, visible_overlays};
use crate::foundation::core::{Canvas, FrameIndex, Fps};
use crate::foundation::error::{CineError, CineResult};
use crate::foundation::math::seed_for_id;
use crate::objects::animator::ObjectAnimator;
use crate::particles::engine::{ParticleEngine, ParticleTransitionPlan};
use crate::particles::field::{DEFAULT_MAX_PARTICLES, ParticleParams, SurfaceBox};
use crate::render::state::{FocusHint, RenderState};
use crate::scene::definition::Scene;
use crate::scene::model::{HeroType, SceneDefinition, Shot};
use crate::scene::validate::{Diagnostic, DiagnosticKind, ValidationLimits};
use crate::screens::registry::{HeroMoment, ScreenRegistry};
use crate::timeline::sequencer::Timeline;
use std::collections::BTreeMap;

/// Options controlling scene evaluation.
#[derive(Clone, Debug)]
pub struct EngineOpts {
    /// Particle count cap per transition. Larger counts are clamped.
    pub max_particles_per_transition: u32,
    /// Fail construction instead of clamping when a limit is exceeded.
    pub strict_limits: bool,
    /// Cross-fade length for fade/slide screen changes without a duration.
    pub screen_transition_secs: f64,
    /// Max distance between screen time and a hero moment for a focus hint.
    pub focus_window_secs: f64,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            max_particles_per_transition: DEFAULT_MAX_PARTICLES,
            strict_limits: false,
            screen_transition_secs: 0.4,
            focus_window_secs: 0.5,
        }
    }
}

struct CompiledShot {
    id: String,
    camera: CameraRig,
    objects: Vec<ObjectAnimator>,
    overlays: Vec<OverlayTrack>,
    look: ShotLook,
    particles: Option<ParticleTransitionPlan>,
}

/// Per-tick scene interpreter.
///
/// Construction validates the scene and front-loads every per-shot structure; evaluation then
/// only samples. Output depends on the sampled time alone.
pub struct SceneEngine {
    timeline: Timeline,
    fps: Fps,
    canvas: Canvas,
    shots: Vec<CompiledShot>,
    particles: ParticleEngine,
    hero_moments: BTreeMap<String, Vec<HeroMoment>>,
    diagnostics: Vec<Diagnostic>,
    opts: EngineOpts,
}

impl SceneEngine {
    /// Validate and compile `scene`.
    #[tracing::instrument(skip(scene, screens), fields(title = %scene.def().meta.title))]
    pub fn new(scene: &Scene, screens: &dyn ScreenRegistry, opts: EngineOpts) -> CineResult<Self> {
        let limits = ValidationLimits {
            max_particles_per_transition: opts.max_particles_per_transition,
        };
        let diagnostics = scene.validate(screens, limits)?;
        for d in &diagnostics {
            tracing::warn!(path = %d.path, "{}", d.message);
        }
        if opts.strict_limits
            && let Some(d) = diagnostics
                .iter()
                .find(|d| d.kind == DiagnosticKind::ResourceExhaustion)
        {
            return Err(CineError::resource(d.to_string()));
        }

        let def = scene.def();
        let fps = Fps::from_meta(def.meta.fps)?;
        let canvas = Canvas {
            width: def.meta.width,
            height: def.meta.height,
        };
        let timeline = Timeline::from_durations(def.shots.iter().map(|s| s.duration))?;
        let shots = def
            .shots
            .iter()
            .map(|shot| compile_shot(def, shot, fps, canvas, &opts))
            .collect();

        let mut hero_moments = BTreeMap::new();
        for id in referenced_screens(def) {
            if let Some(screen) = screens.resolve(id) {
                hero_moments.insert(id.to_owned(), screen.hero_moments().to_vec());
            }
        }

        tracing::debug!(
            shots = timeline.len(),
            duration = timeline.total_duration(),
            "scene compiled"
        );

        Ok(Self {
            timeline,
            fps,
            canvas,
            shots,
            particles: ParticleEngine::new(),
            hero_moments,
            diagnostics,
            opts,
        })
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Warnings collected during validation.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Export frame count: `round(total duration * fps)`.
    pub fn frame_count(&self) -> u64 {
        self.timeline.frame_count(self.fps)
    }

    /// Render state at frame `frame` of the export clock.
    pub fn evaluate_frame(&mut self, frame: FrameIndex) -> CineResult<RenderState> {
        self.evaluate(self.fps.frame_time_secs(frame))
    }

    /// Render state at global time `time` (seconds).
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn evaluate(&mut self, time: f64) -> CineResult<RenderState> {
        let pos = self.timeline.resolve(time);
        let shot = self.shots.get(pos.shot_index).ok_or_else(|| {
            CineError::evaluation(format!("shot {} is not compiled", pos.shot_index))
        })?;
        let t = pos.local_time;

        let camera = shot.camera.sample(t);
        let objects: Vec<_> = shot.objects.iter().map(|o| o.sample(t)).collect();
        let particles = self
            .particles
            .update(pos.shot_index, shot.particles.as_ref(), t);
        let overlays = visible_overlays(&shot.overlays, t);

        let focus = objects.first().and_then(|primary| {
            let layer = primary.screen.primary()?;
            let moments = self.hero_moments.get(&layer.screen_id)?;
            nearest_moment(moments, layer.screen_time, self.opts.focus_window_secs).map(|m| {
                FocusHint {
                    object_id: primary.id.clone(),
                    screen_id: layer.screen_id.clone(),
                    label: m.label.clone(),
                    moment_time: m.time,
                    offset: layer.screen_time - m.time,
                    focus: m.focus,
                }
            })
        });

        Ok(RenderState {
            time,
            shot_index: pos.shot_index,
            shot_id: shot.id.clone(),
            local_time: t,
            complete: pos.complete,
            canvas: self.canvas,
            camera,
            objects,
            particles,
            overlays,
            background: shot.look.background.clone(),
            post_processing: shot.look.post_processing.clone(),
            focus,
        })
    }
}

fn compile_shot(
    def: &SceneDefinition,
    shot: &Shot,
    fps: Fps,
    canvas: Canvas,
    opts: &EngineOpts,
) -> CompiledShot {
    let secs = opts.screen_transition_secs;
    let objects: Vec<ObjectAnimator> = match def.hero_type {
        HeroType::Phone => vec![
            ObjectAnimator::phone(def.phone.as_ref()).with_track(shot.phone.as_ref(), secs),
        ],
        HeroType::Cards => def
            .cards
            .iter()
            .flatten()
            .map(|card| {
                let track = shot.cards.as_ref().and_then(|m| m.get(&card.id));
                ObjectAnimator::card(card).with_track(track, secs)
            })
            .collect(),
    };

    let particles = shot.particle_transition.as_ref().and_then(|pt| {
        let (params, clamped) =
            ParticleParams::resolve(pt, fps, opts.max_particles_per_transition);
        if clamped {
            tracing::warn!(
                shot = %shot.id,
                count = params.count,
                "particle count clamped to the configured limit"
            );
        }
        let target = match pt.target.as_deref() {
            Some(id) => objects.iter().find(|o| o.id() == id),
            None => objects.first(),
        }?;
        Some(ParticleTransitionPlan {
            surface: SurfaceBox {
                pose: target.transform_at(params.trigger_time),
                size: target.appearance().size,
            },
            params,
            base_seed: seed_for_id(&shot.id),
        })
    });

    CompiledShot {
        id: shot.id.clone(),
        camera: CameraRig::from_def(&shot.camera, canvas.aspect()),
        overlays: shot
            .text_overlays
            .iter()
            .flatten()
            .map(|o| OverlayTrack::compile(o, shot.duration))
            .collect(),
        look: ShotLook::resolve(shot, def.defaults.as_ref()),
        objects,
        particles,
    }
}

fn referenced_screens(def: &SceneDefinition) -> impl Iterator<Item = &str> {
    let defaults = def
        .phone
        .iter()
        .filter_map(|p| p.screen.as_deref())
        .chain(def.cards.iter().flatten().filter_map(|c| c.screen.as_deref()));
    let changes = def.shots.iter().flat_map(|shot| {
        shot.phone
            .iter()
            .chain(shot.cards.iter().flat_map(|m| m.values()))
            .flat_map(|track| track.screen_changes.iter().flatten())
            .map(|c| c.screen_id.as_str())
    });
    defaults.chain(changes)
}

fn nearest_moment(moments: &[HeroMoment], screen_time: f64, window: f64) -> Option<&HeroMoment> {
    moments
        .iter()
        .filter(|m| (m.time - screen_time).abs() <= window)
        .min_by(|a, b| {
            (a.time - screen_time)
                .abs()
                .total_cmp(&(b.time - screen_time).abs())
        })
}

#[cfg(test)]
#[path = "../../tests/unit/eval/engine.rs"]
mod tests;
