use serde::{Deserialize, Serialize};

/// Easing functions used to remap normalized segment progress.
///
/// Serialized with the authoring names (`"linear"`, `"easeInOut"`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Ease {
    /// Identity.
    Linear,
    /// Quadratic ease-in.
    EaseIn,
    /// Quadratic ease-out.
    EaseOut,
    /// Quadratic ease-in/out.
    EaseInOut,
    /// Cubic ease-in.
    EaseInCubic,
    /// Cubic ease-out.
    EaseOutCubic,
    /// Cubic ease-in/out.
    EaseInOutCubic,
    /// Quartic ease-in.
    EaseInQuart,
    /// Quartic ease-out.
    EaseOutQuart,
    /// Quartic ease-in/out.
    EaseInOutQuart,
    /// Damped spring settling on 1. Overshoots.
    Spring,
    /// Back-out curve. Overshoots once.
    BackOut,
}

impl Ease {
    /// Every easing kind, in declaration order.
    pub const ALL: [Ease; 12] = [
        Ease::Linear,
        Ease::EaseIn,
        Ease::EaseOut,
        Ease::EaseInOut,
        Ease::EaseInCubic,
        Ease::EaseOutCubic,
        Ease::EaseInOutCubic,
        Ease::EaseInQuart,
        Ease::EaseOutQuart,
        Ease::EaseInOutQuart,
        Ease::Spring,
        Ease::BackOut,
    ];

    /// Apply this easing function to normalized progress `t` (clamped to `[0, 1]`).
    ///
    /// `0` maps to `0` and `1` maps to `1` for every kind.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::EaseInCubic => t * t * t,
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::EaseInQuart => t.powi(4),
            Self::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Self::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(4) / 2.0)
                }
            }
            Self::Spring => spring(t),
            Self::BackOut => {
                const C1: f64 = 1.70158;
                const C3: f64 = C1 + 1.0;
                if t <= 0.0 {
                    return 0.0;
                }
                if t >= 1.0 {
                    return 1.0;
                }
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
        }
    }
}

fn spring(t: f64) -> f64 {
    const DECAY: f64 = 6.0;
    const OMEGA: f64 = std::f64::consts::TAU * 1.25;

    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let raw = |x: f64| 1.0 - (-DECAY * x).exp() * (OMEGA * x).cos();
    // Spread the residual at t=1 linearly so the curve lands exactly on 1.
    raw(t) + (1.0 - raw(1.0)) * t
}

/// Easing as it appears on the wire.
///
/// Names the engine does not know are kept verbatim so a definition round-trips unchanged, and
/// resolve to [`Ease::Linear`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Easing {
    /// A recognised easing name.
    Known(Ease),
    /// Any other string.
    Unknown(String),
}

impl Easing {
    /// The easing function to apply.
    pub fn resolve(&self) -> Ease {
        match self {
            Self::Known(e) => *e,
            Self::Unknown(name) => {
                tracing::warn!(easing = %name, "unknown easing, falling back to linear");
                Ease::Linear
            }
        }
    }
}

impl From<Ease> for Easing {
    fn from(e: Ease) -> Self {
        Self::Known(e)
    }
}

/// Resolve an optional authored easing; absent means linear.
pub fn resolve_easing(easing: Option<&Easing>) -> Ease {
    easing.map_or(Ease::Linear, Easing::resolve)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
