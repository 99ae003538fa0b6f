use crate::foundation::core::Fps;
use crate::foundation::error::{CineError, CineResult};

/// Result of mapping global time onto the shot list.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimelinePosition {
    /// Index of the active shot.
    pub shot_index: usize,
    /// Seconds into the active shot.
    pub local_time: f64,
    /// Global time reached or passed the end of the scene.
    pub complete: bool,
}

/// Shots laid end to end with no gaps.
///
/// Holds only the prefix starts; resolving is a pure function of the query time.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    starts: Vec<f64>,
    durations: Vec<f64>,
    total: f64,
}

impl Timeline {
    /// Build from ordered shot durations. Durations must be finite and `> 0`.
    pub fn from_durations(durations: impl IntoIterator<Item = f64>) -> CineResult<Self> {
        let durations: Vec<f64> = durations.into_iter().collect();
        if durations.is_empty() {
            return Err(CineError::definition("timeline needs at least one shot"));
        }

        let mut starts = Vec::with_capacity(durations.len());
        let mut acc = 0.0;
        for (i, &d) in durations.iter().enumerate() {
            if !d.is_finite() || d <= 0.0 {
                return Err(CineError::definition(format!(
                    "shot {i} duration must be > 0, got {d}"
                )));
            }
            starts.push(acc);
            acc += d;
        }

        Ok(Self {
            starts,
            durations,
            total: acc,
        })
    }

    /// Number of shots.
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    /// Always `false`; construction rejects empty shot lists.
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Sum of all shot durations.
    pub fn total_duration(&self) -> f64 {
        self.total
    }

    /// Global start time of shot `i`.
    pub fn shot_start(&self, i: usize) -> Option<f64> {
        self.starts.get(i).copied()
    }

    /// Duration of shot `i`.
    pub fn shot_duration(&self, i: usize) -> Option<f64> {
        self.durations.get(i).copied()
    }

    /// Total frame count at `fps`: `round(total * fps)`.
    pub fn frame_count(&self, fps: Fps) -> u64 {
        fps.secs_to_frames_round(self.total)
    }

    /// Map global time `t` to the active shot and its local time.
    ///
    /// Shot `i` owns `[start(i), start(i) + duration(i))`. Negative (or NaN) time clamps to the
    /// first shot at 0; time at or past the end reports the last shot at its full duration with
    /// `complete` set.
    pub fn resolve(&self, t: f64) -> TimelinePosition {
        if t.is_nan() || t <= 0.0 {
            return TimelinePosition {
                shot_index: 0,
                local_time: 0.0,
                complete: false,
            };
        }
        if t >= self.total {
            let last = self.durations.len() - 1;
            return TimelinePosition {
                shot_index: last,
                local_time: self.durations[last],
                complete: true,
            };
        }

        // Shots starting at or before `t`; the active one is the last of them.
        let idx = self.starts.partition_point(|&s| s <= t) - 1;
        let local = (t - self.starts[idx]).clamp(0.0, self.durations[idx]);
        TimelinePosition {
            shot_index: idx,
            local_time: local,
            complete: false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/sequencer.rs"]
mod tests;
