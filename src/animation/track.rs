use crate::{
    animation::ease::Ease,
    foundation::core::{DQuat, DVec3, Rgba8},
    foundation::error::{CineError, CineResult},
};

/// Interpolation contract for animated value types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with (eased) factor `t`.
    ///
    /// `t` may leave `[0, 1]` for overshooting easings.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for DVec3 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        DVec3::new(
            a.x + (b.x - a.x) * t,
            a.y + (b.y - a.y) * t,
            a.z + (b.z - a.z) * t,
        )
    }
}

impl Lerp for Rgba8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }
}

/// Orientation value. Blends along the shortest arc, never per component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation(pub DQuat);

impl Rotation {
    /// Build from Euler angles in degrees (XYZ order).
    pub fn from_euler_deg(deg: [f64; 3]) -> Self {
        Self(DQuat::from_euler(
            glam::EulerRot::XYZ,
            deg[0].to_radians(),
            deg[1].to_radians(),
            deg[2].to_radians(),
        ))
    }
}

impl Lerp for Rotation {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        if t == 0.0 {
            return *a;
        }
        if t == 1.0 {
            return *b;
        }
        // `q` and `-q` are the same rotation; pick the one on the short arc.
        let to = if a.0.dot(b.0) < 0.0 { -b.0 } else { b.0 };
        Self(a.0.slerp(to, t).normalize())
    }
}

/// One authored sample on a track.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe<T> {
    /// Seconds into the owning shot.
    pub time: f64,
    /// Value at `time`.
    pub value: T,
    /// Easing of the segment that arrives at this keyframe.
    pub ease: Ease,
}

/// Where a query time falls on a track.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment<'a, T> {
    /// Outside the keyed range, on a key, or past a zero-length segment.
    Hold(&'a T),
    /// Strictly between two keys.
    Blend {
        /// Departing key value.
        from: &'a T,
        /// Arriving key value.
        to: &'a T,
        /// Eased progress, using the arriving key's easing.
        u: f64,
    },
}

/// Ordered keyframes for one animated field.
#[derive(Clone, Debug, PartialEq)]
pub struct Track<T> {
    keys: Vec<Keyframe<T>>,
}

impl<T> Default for Track<T> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}

impl<T> Track<T>
where
    T: Lerp + Clone,
{
    /// Build a track; keys must already be in time order (see [`Track::validate`]).
    pub fn new(keys: Vec<Keyframe<T>>) -> Self {
        Self { keys }
    }

    /// Borrow the keys.
    pub fn keys(&self) -> &[Keyframe<T>] {
        &self.keys
    }

    /// `true` when the track has no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Check key times are finite, inside `[0, duration]` and non-decreasing.
    pub fn validate(&self, duration: f64) -> CineResult<()> {
        for (i, k) in self.keys.iter().enumerate() {
            if !k.time.is_finite() || k.time < 0.0 || k.time > duration {
                return Err(CineError::definition(format!(
                    "keyframe {i} time {} must be within [0, {duration}]",
                    k.time
                )));
            }
        }
        if let Some(i) = self.keys.windows(2).position(|w| w[1].time < w[0].time) {
            return Err(CineError::definition(format!(
                "keyframe {} time {} is before keyframe {} time {}",
                i + 1,
                self.keys[i + 1].time,
                i,
                self.keys[i].time
            )));
        }
        Ok(())
    }

    /// Locate `t` on the track. `None` for an empty track.
    pub fn locate(&self, t: f64) -> Option<Segment<'_, T>> {
        let first = self.keys.first()?;
        let last = self.keys.last()?;
        if t.is_nan() || t <= first.time {
            return Some(Segment::Hold(&first.value));
        }
        if t >= last.time {
            return Some(Segment::Hold(&last.value));
        }

        // Number of keys at or before `t`; the bracket is (idx - 1, idx).
        let idx = self.keys.partition_point(|k| k.time <= t);
        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        if t == a.time {
            return Some(Segment::Hold(&a.value));
        }
        let span = b.time - a.time;
        if span <= 0.0 {
            return Some(Segment::Hold(&b.value));
        }
        let u = (t - a.time) / span;
        Some(Segment::Blend {
            from: &a.value,
            to: &b.value,
            u: b.ease.apply(u),
        })
    }

    /// Sample the value at `t`. `None` for an empty track.
    pub fn sample(&self, t: f64) -> Option<T> {
        self.locate(t).map(|seg| match seg {
            Segment::Hold(v) => v.clone(),
            Segment::Blend { from, to, u } => T::lerp(from, to, u),
        })
    }

    /// Sample, substituting `fallback` for an empty track.
    pub fn sample_or(&self, t: f64, fallback: T) -> T {
        self.sample(t).unwrap_or(fallback)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/track.rs"]
mod tests;
