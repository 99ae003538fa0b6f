use crate::particles::field::{ParticleField, ParticleInstance, ParticleParams, SurfaceBox};
use serde::Serialize;

/// Lifecycle of a shot's particle transition at the sampled instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticlePhase {
    /// Before the trigger time, or no transition in the active shot.
    #[default]
    Inactive,
    /// The field was generated on this tick.
    Generating,
    /// The field generated earlier is being reused.
    Simulating,
    /// Past the end of the window.
    Expired,
}

/// A transition ready to run: resolved parameters plus everything generation needs.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleTransitionPlan {
    pub params: ParticleParams,
    /// Seed derived from the owning shot id.
    pub base_seed: u64,
    /// Target object box at the trigger time.
    pub surface: SurfaceBox,
}

/// Particles for one tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleFrame {
    pub phase: ParticlePhase,
    pub particles: Vec<ParticleInstance>,
}

/// Drives particle transitions across ticks.
///
/// The only state kept between ticks is the generated field of the current shot. It is a pure
/// function of the plan, so dropping and regenerating it never changes the output.
#[derive(Debug, Default)]
pub struct ParticleEngine {
    active: Option<(usize, ParticleField)>,
}

impl ParticleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while a generated field is held.
    pub fn has_field(&self) -> bool {
        self.active.is_some()
    }

    /// Advance to shot `shot_index` at shot-local time `t`.
    pub fn update(
        &mut self,
        shot_index: usize,
        plan: Option<&ParticleTransitionPlan>,
        t: f64,
    ) -> ParticleFrame {
        let Some(plan) = plan else {
            self.discard();
            return ParticleFrame::default();
        };

        if !plan.params.contains(t) {
            self.discard();
            let phase = if t < plan.params.trigger_time {
                ParticlePhase::Inactive
            } else {
                ParticlePhase::Expired
            };
            return ParticleFrame {
                phase,
                particles: Vec::new(),
            };
        }

        let phase = match &self.active {
            Some((idx, _)) if *idx == shot_index => ParticlePhase::Simulating,
            _ => {
                let field = ParticleField::generate(&plan.params, plan.base_seed, &plan.surface);
                tracing::debug!(
                    shot_index,
                    count = field.len(),
                    kind = ?plan.params.kind,
                    "particle field generated"
                );
                self.active = Some((shot_index, field));
                ParticlePhase::Generating
            }
        };

        let particles = self
            .active
            .as_ref()
            .map(|(_, field)| field.sample(t))
            .unwrap_or_default();
        ParticleFrame { phase, particles }
    }

    fn discard(&mut self) {
        if let Some((shot_index, _)) = self.active.take() {
            tracing::debug!(shot_index, "particle field discarded");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/engine.rs"]
mod tests;
