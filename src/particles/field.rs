//! Particle generation and closed-form motion.
//!
//! A field is generated once per window entry from stable seeds and then evaluated
//! analytically, so any instant can be sampled in any order with identical results.

use crate::animation::ease::{Ease, resolve_easing};
use crate::animation::track::Lerp;
use crate::foundation::color::Color;
use crate::foundation::core::{DVec3, Fps, Rgba8, Transform3D};
use crate::foundation::math::{Rng64, derive_seed, value_noise};
use crate::scene::model::{ParticleKind, ParticleTransition};
use serde::Serialize;

pub const DEFAULT_PARTICLE_COUNT: u32 = 1500;
pub const DEFAULT_SPREAD_RADIUS: f64 = 2.0;
pub const DEFAULT_PARTICLE_SIZE: f64 = 0.015;
/// Per-transition particle cap unless configured otherwise.
pub const DEFAULT_MAX_PARTICLES: u32 = 50_000;

/// Final size as a fraction of the start size (dissolve/explode).
const END_SIZE_FACTOR: f64 = 0.6;
const EXPLODE_SPEED: f64 = 3.0;
const EXPLODE_MAX_FADE_SECS: f64 = 0.75;

/// Transition parameters with every default substituted.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleParams {
    pub kind: ParticleKind,
    pub trigger_time: f64,
    pub duration: f64,
    pub count: u32,
    pub spread_radius: f64,
    pub direction: DVec3,
    pub size: f64,
    pub color: Rgba8,
    pub end_color: Rgba8,
    pub gravity: f64,
    pub turbulence: f64,
    pub ease: Ease,
    /// Frame rate the turbulence lattice is stepped at.
    pub fps: f64,
}

impl ParticleParams {
    /// Resolve defaults. Counts above `max_count` are clamped; the flag reports a clamp.
    pub fn resolve(def: &ParticleTransition, fps: Fps, max_count: u32) -> (Self, bool) {
        let requested = def.particle_count.unwrap_or(DEFAULT_PARTICLE_COUNT);
        let count = requested.min(max_count);
        let color = def.color.map_or(Rgba8::WHITE, Color::to_rgba8);
        let params = Self {
            kind: def.kind,
            trigger_time: def.trigger_time,
            duration: def.duration,
            count,
            spread_radius: def.spread_radius.unwrap_or(DEFAULT_SPREAD_RADIUS),
            direction: def.direction.map_or(DVec3::ZERO, DVec3::from_array),
            size: def.particle_size.unwrap_or(DEFAULT_PARTICLE_SIZE),
            color,
            end_color: def.end_color.map_or(color, Color::to_rgba8),
            gravity: def.gravity.unwrap_or(0.0),
            turbulence: def.turbulence.unwrap_or(0.0),
            ease: resolve_easing(def.easing.as_ref()),
            fps: fps.as_f64(),
        };
        (params, count < requested)
    }

    /// Shot-local end of the window.
    pub fn end_time(&self) -> f64 {
        self.trigger_time + self.duration
    }

    /// `true` inside the closed window `[trigger, trigger + duration]`.
    pub fn contains(&self, t: f64) -> bool {
        t >= self.trigger_time && t <= self.end_time()
    }
}

/// Box particles are emitted from, posed in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceBox {
    pub pose: Transform3D,
    /// Full width, height, depth before scale.
    pub size: DVec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Seed {
    origin: DVec3,
    velocity: DVec3,
    noise_seed: u64,
}

/// One drawable particle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleInstance {
    pub position: DVec3,
    pub opacity: f64,
    pub size: f64,
    pub color: Rgba8,
}

/// Generated particle set for one transition.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleField {
    params: ParticleParams,
    seeds: Vec<Seed>,
}

impl ParticleField {
    /// Generate `params.count` particles. Particle `i` draws only from `derive_seed(base, i)`.
    pub fn generate(params: &ParticleParams, base_seed: u64, surface: &SurfaceBox) -> Self {
        let half = surface.size * 0.5;
        let base_speed = if params.duration > 0.0 {
            params.spread_radius / params.duration
        } else {
            0.0
        };
        let speed_scale = match params.kind {
            ParticleKind::Explode => EXPLODE_SPEED,
            ParticleKind::Dissolve | ParticleKind::Assemble => 1.0,
        };

        let seeds = (0..u64::from(params.count))
            .map(|i| {
                let seed = derive_seed(base_seed, i);
                let mut rng = Rng64::new(seed);
                let local = DVec3::new(
                    rng.range(-half.x, half.x),
                    rng.range(-half.y, half.y),
                    rng.range(-half.z, half.z),
                );
                let dir = rng.unit_vector();
                let speed = base_speed * speed_scale * rng.range(0.5, 1.0);
                Seed {
                    origin: surface.pose.apply(local),
                    velocity: dir * speed + params.direction,
                    noise_seed: rng.next_u64(),
                }
            })
            .collect();

        Self {
            params: params.clone(),
            seeds,
        }
    }

    pub fn params(&self) -> &ParticleParams {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// Evaluate every particle at shot-local time `t` (clamped into the window).
    pub fn sample(&self, t: f64) -> Vec<ParticleInstance> {
        let p = &self.params;
        let d = p.duration.max(f64::MIN_POSITIVE);
        let tau = (t - p.trigger_time).clamp(0.0, d);
        let progress = tau / d;

        // Assemble replays dissolve backwards.
        let sim = match p.kind {
            ParticleKind::Assemble => d - tau,
            ParticleKind::Dissolve | ParticleKind::Explode => tau,
        };
        let sim_progress = sim / d;

        let opacity = match p.kind {
            ParticleKind::Dissolve | ParticleKind::Assemble => 1.0 - p.ease.apply(sim_progress),
            ParticleKind::Explode => {
                let fade = (d / 2.0).min(EXPLODE_MAX_FADE_SECS);
                let fade_start = d - fade;
                if tau < fade_start {
                    1.0
                } else {
                    1.0 - p.ease.apply((tau - fade_start) / fade)
                }
            }
        };
        let size = p.size * (1.0 - (1.0 - END_SIZE_FACTOR) * sim_progress);
        let color = Rgba8::lerp(&p.color, &p.end_color, progress);
        let gravity = DVec3::new(0.0, -p.gravity, 0.0);
        let steps = sim * p.fps;

        self.seeds
            .iter()
            .map(|s| {
                let mut position = s.origin + s.velocity * sim + gravity * (0.5 * sim * sim);
                if p.turbulence != 0.0 {
                    let amp = p.turbulence * sim_progress;
                    position.x += amp * value_noise(s.noise_seed, steps);
                    position.z += amp * value_noise(s.noise_seed ^ 0x9E37_79B9, steps);
                }
                ParticleInstance {
                    position,
                    opacity,
                    size,
                    color,
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/field.rs"]
mod tests;
