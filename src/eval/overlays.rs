use crate::animation::ease::{Ease, resolve_easing};
use crate::foundation::color::Color;
use crate::foundation::core::Rgba8;
use crate::scene::model::TextOverlay;
use serde::Serialize;

pub const DEFAULT_OVERLAY_POSITION: [f64; 2] = [0.5, 0.85];
pub const DEFAULT_FONT_SIZE: f64 = 48.0;
pub const DEFAULT_FADE_SECS: f64 = 0.3;

/// Overlay with defaults applied, bound to one shot.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayTrack {
    text: String,
    start: f64,
    end: f64,
    position: [f64; 2],
    font_size: f64,
    color: Rgba8,
    fade: f64,
    ease: Ease,
}

impl OverlayTrack {
    /// Resolve `def` for a shot of `shot_duration` seconds.
    pub fn compile(def: &TextOverlay, shot_duration: f64) -> Self {
        Self {
            text: def.text.clone(),
            start: def.start_time,
            end: def.end_time.unwrap_or(shot_duration),
            position: def.position.unwrap_or(DEFAULT_OVERLAY_POSITION),
            font_size: def.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            color: def.color.map_or(Rgba8::WHITE, Color::to_rgba8),
            fade: def.fade_duration.unwrap_or(DEFAULT_FADE_SECS).max(0.0),
            ease: resolve_easing(def.easing.as_ref()),
        }
    }

    /// Visible state at shot-local `t`, `None` outside `[start, end]`.
    pub fn sample(&self, t: f64) -> Option<OverlayState> {
        if t < self.start || t > self.end {
            return None;
        }
        let opacity = if self.fade > 0.0 {
            let fade_in = self.ease.apply((t - self.start) / self.fade);
            let fade_out = self.ease.apply((self.end - t) / self.fade);
            fade_in.min(fade_out)
        } else {
            1.0
        };
        Some(OverlayState {
            text: self.text.clone(),
            position: self.position,
            font_size: self.font_size,
            color: self.color,
            opacity,
        })
    }
}

/// A visible overlay.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayState {
    pub text: String,
    /// Normalized viewport position of the text anchor.
    pub position: [f64; 2],
    pub font_size: f64,
    pub color: Rgba8,
    pub opacity: f64,
}

/// Every overlay of a shot visible at `t`, in authoring order.
pub fn visible_overlays(tracks: &[OverlayTrack], t: f64) -> Vec<OverlayState> {
    tracks.iter().filter_map(|o| o.sample(t)).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/eval/overlays.rs"]
mod tests;
