use crate::foundation::core::SUPPORTED_FPS;
use crate::objects::animator::PHONE_ID;
use crate::particles::field::DEFAULT_MAX_PARTICLES;
use crate::scene::model::{
    CameraTrack, HeroType, ObjectTrack, ParticleTransition, SceneDefinition, Shot, TextOverlay,
};
use crate::screens::registry::ScreenRegistry;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaPathElem {
    Field(&'static str),
    Index(usize),
    Key(String),
}

/// One validation failure, located by a JSON path such as `$.shots[1].duration`.
#[derive(Debug, Clone)]
pub struct SchemaError {
    pub path: Vec<SchemaPathElem>,
    pub message: String,
}

impl SchemaError {
    fn at(path: &[SchemaPathElem], message: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            message: message.into(),
        }
    }

    /// The formatted path, `$` for the root.
    pub fn path_string(&self) -> String {
        format_path(&self.path)
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "{}", self.message);
        }
        write!(f, "{}: {}", format_path(&self.path), self.message)
    }
}

fn format_path(path: &[SchemaPathElem]) -> String {
    let mut s = String::from("$");
    for p in path {
        match p {
            SchemaPathElem::Field(name) => {
                s.push('.');
                s.push_str(name);
            }
            SchemaPathElem::Index(i) => {
                s.push('[');
                s.push_str(&i.to_string());
                s.push(']');
            }
            SchemaPathElem::Key(k) => {
                s.push_str("[\"");
                s.push_str(k);
                s.push_str("\"]");
            }
        }
    }
    s
}

/// Every failure found in one pass.
#[derive(Debug, Clone)]
pub struct SchemaErrors {
    pub errors: Vec<SchemaError>,
}

impl fmt::Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// A configured workload was clamped to an engine limit.
    ResourceExhaustion,
}

/// Non-fatal finding.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub path: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Limits checked during validation.
#[derive(Debug, Clone, Copy)]
pub struct ValidationLimits {
    pub max_particles_per_transition: u32,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_particles_per_transition: DEFAULT_MAX_PARTICLES,
        }
    }
}

/// Validate a scene against its screen registry.
///
/// Returns the warnings on success; on failure every error found is reported, not just the
/// first.
pub fn validate_scene(
    def: &SceneDefinition,
    screens: &dyn ScreenRegistry,
    limits: ValidationLimits,
) -> Result<Vec<Diagnostic>, SchemaErrors> {
    let mut v = Validator {
        screens,
        limits,
        errors: Vec::new(),
        warnings: Vec::new(),
        card_ids: HashSet::new(),
        path: Vec::new(),
    };
    v.scene(def);

    if v.errors.is_empty() {
        Ok(v.warnings)
    } else {
        Err(SchemaErrors { errors: v.errors })
    }
}

struct Validator<'a> {
    screens: &'a dyn ScreenRegistry,
    limits: ValidationLimits,
    errors: Vec<SchemaError>,
    warnings: Vec<Diagnostic>,
    card_ids: HashSet<String>,
    path: Vec<SchemaPathElem>,
}

impl Validator<'_> {
    fn err(&mut self, rel: &[SchemaPathElem], message: impl Into<String>) {
        let mut path = self.path.clone();
        path.extend_from_slice(rel);
        self.errors.push(SchemaError::at(&path, message));
    }

    fn scoped(&mut self, elems: &[SchemaPathElem], f: impl FnOnce(&mut Self)) {
        let depth = self.path.len();
        self.path.extend_from_slice(elems);
        f(self);
        self.path.truncate(depth);
    }

    fn screen_ref(&mut self, rel: &[SchemaPathElem], id: &str) {
        if !self.screens.contains(id) {
            self.err(rel, format!("unknown screen id '{id}'"));
        }
    }

    fn scene(&mut self, def: &SceneDefinition) {
        use SchemaPathElem::{Field, Index};

        if !SUPPORTED_FPS.contains(&def.meta.fps) {
            self.err(
                &[Field("meta"), Field("fps")],
                format!("fps must be one of {SUPPORTED_FPS:?}, got {}", def.meta.fps),
            );
        }
        if def.meta.width == 0 || def.meta.height == 0 {
            self.err(&[Field("meta")], "width and height must be > 0");
        }

        let cards = def.cards.as_deref().unwrap_or_default();
        match def.hero_type {
            HeroType::Cards if cards.is_empty() => {
                self.err(&[Field("cards")], "heroType 'cards' requires a non-empty card list");
            }
            HeroType::Phone if !cards.is_empty() => {
                self.err(&[Field("cards")], "heroType 'phone' must not declare cards");
            }
            _ => {}
        }

        if let Some(screen) = def.phone.as_ref().and_then(|p| p.screen.as_deref()) {
            self.screen_ref(&[Field("phone"), Field("screen")], screen);
        }

        for (i, card) in cards.iter().enumerate() {
            if card.id.is_empty() {
                self.err(&[Field("cards"), Index(i), Field("id")], "must be non-empty");
            } else if !self.card_ids.insert(card.id.clone()) {
                self.err(
                    &[Field("cards"), Index(i), Field("id")],
                    format!("duplicate card id '{}'", card.id),
                );
            }
            for (name, value) in [("width", card.width), ("height", card.height)] {
                if value.is_some_and(|v| !v.is_finite() || v <= 0.0) {
                    self.err(&[Field("cards"), Index(i), Field(name)], "must be > 0");
                }
            }
            if let Some(screen) = card.screen.as_deref() {
                self.screen_ref(&[Field("cards"), Index(i), Field("screen")], screen);
            }
        }

        if def.shots.is_empty() {
            self.err(&[Field("shots")], "scene needs at least one shot");
        }
        let mut shot_ids = HashSet::new();
        for (i, shot) in def.shots.iter().enumerate() {
            if !shot.id.is_empty() && !shot_ids.insert(shot.id.as_str()) {
                self.err(
                    &[Field("shots"), Index(i), Field("id")],
                    format!("duplicate shot id '{}'", shot.id),
                );
            }
            self.scoped(&[Field("shots"), Index(i)], |v| v.shot(def.hero_type, shot));
        }
    }

    fn shot(&mut self, hero: HeroType, shot: &Shot) {
        use SchemaPathElem::{Field, Key};

        if shot.id.is_empty() {
            self.err(&[Field("id")], "must be non-empty");
        }
        if !shot.duration.is_finite() || shot.duration <= 0.0 {
            self.err(
                &[Field("duration")],
                format!("duration must be > 0, got {}", shot.duration),
            );
            // Every time check below is relative to the duration.
            return;
        }
        let duration = shot.duration;

        self.scoped(&[Field("camera")], |v| v.camera(&shot.camera, duration));

        if let Some(track) = &shot.phone {
            if hero == HeroType::Cards {
                self.err(&[Field("phone")], "phone track in a 'cards' scene");
            }
            self.scoped(&[Field("phone")], |v| v.object(track, duration));
        }
        if let Some(cards) = &shot.cards {
            if hero == HeroType::Phone && !cards.is_empty() {
                self.err(&[Field("cards")], "card tracks in a 'phone' scene");
            }
            for (id, track) in cards {
                if hero == HeroType::Cards && !self.card_ids.contains(id) {
                    self.err(
                        &[Field("cards"), Key(id.clone())],
                        format!("unknown card id '{id}'"),
                    );
                }
                self.scoped(&[Field("cards"), Key(id.clone())], |v| {
                    v.object(track, duration)
                });
            }
        }

        for (i, overlay) in shot.text_overlays.iter().flatten().enumerate() {
            self.scoped(
                &[Field("textOverlays"), SchemaPathElem::Index(i)],
                |v| v.overlay(overlay, duration),
            );
        }

        if let Some(pt) = &shot.particle_transition {
            self.scoped(&[Field("particleTransition")], |v| {
                v.particles(hero, pt, duration)
            });
        }
    }

    fn keyframe_times(&mut self, times: impl Iterator<Item = f64>, duration: f64) {
        use SchemaPathElem::{Field, Index};

        let mut prev: Option<f64> = None;
        for (i, t) in times.enumerate() {
            if !t.is_finite() || t < 0.0 || t > duration {
                self.err(
                    &[Field("keyframes"), Index(i), Field("time")],
                    format!("time {t} must be within [0, {duration}]"),
                );
            }
            if let Some(p) = prev
                && t < p
            {
                self.err(
                    &[Field("keyframes"), Index(i), Field("time")],
                    format!("keyframes out of order: {t} follows {p}"),
                );
            }
            prev = Some(t);
        }
    }

    fn camera(&mut self, camera: &CameraTrack, duration: f64) {
        use SchemaPathElem::{Field, Index};

        self.keyframe_times(camera.keyframes.iter().map(|k| k.time), duration);
        for (i, kf) in camera.keyframes.iter().enumerate() {
            if kf.fov.is_some_and(|f| !f.is_finite() || f <= 0.0 || f >= 180.0) {
                self.err(
                    &[Field("keyframes"), Index(i), Field("fov")],
                    "fov must be within (0, 180) degrees",
                );
            }
        }
    }

    fn object(&mut self, track: &ObjectTrack, duration: f64) {
        use SchemaPathElem::{Field, Index};

        if let Some(keys) = &track.keyframes {
            self.keyframe_times(keys.iter().map(|k| k.time), duration);
        }

        let mut prev: Option<f64> = None;
        for (i, change) in track.screen_changes.iter().flatten().enumerate() {
            let t = change.time;
            if !t.is_finite() || t < 0.0 || t > duration {
                self.err(
                    &[Field("screenChanges"), Index(i), Field("time")],
                    format!("time {t} must be within [0, {duration}]"),
                );
            }
            if let Some(p) = prev
                && t < p
            {
                self.err(
                    &[Field("screenChanges"), Index(i), Field("time")],
                    format!("screen changes out of order: {t} follows {p}"),
                );
            }
            prev = Some(t);
            self.screen_ref(
                &[Field("screenChanges"), Index(i), Field("screenId")],
                &change.screen_id,
            );
            if let Some(d) = change.transition.and_then(|tr| tr.duration)
                && (!d.is_finite() || d < 0.0)
            {
                self.err(
                    &[
                        Field("screenChanges"),
                        Index(i),
                        Field("transition"),
                        Field("duration"),
                    ],
                    "must be >= 0",
                );
            }
        }
    }

    fn overlay(&mut self, overlay: &TextOverlay, duration: f64) {
        use SchemaPathElem::Field;

        let start = overlay.start_time;
        if !start.is_finite() || start < 0.0 || start > duration {
            self.err(
                &[Field("startTime")],
                format!("startTime {start} must be within [0, {duration}]"),
            );
        }
        if let Some(end) = overlay.end_time
            && (!end.is_finite() || end < start)
        {
            self.err(&[Field("endTime")], "endTime must be >= startTime");
        }
        if overlay
            .fade_duration
            .is_some_and(|f| !f.is_finite() || f < 0.0)
        {
            self.err(&[Field("fadeDuration")], "must be >= 0");
        }
    }

    fn particles(&mut self, hero: HeroType, pt: &ParticleTransition, duration: f64) {
        use SchemaPathElem::Field;

        if !pt.trigger_time.is_finite() || pt.trigger_time < 0.0 || pt.trigger_time > duration {
            self.err(
                &[Field("triggerTime")],
                format!("triggerTime must be within [0, {duration}]"),
            );
        }
        if !pt.duration.is_finite() || pt.duration <= 0.0 {
            self.err(&[Field("duration")], "duration must be > 0");
        }
        if pt.spread_radius.is_some_and(|r| !r.is_finite() || r < 0.0) {
            self.err(&[Field("spreadRadius")], "must be >= 0");
        }
        if pt.particle_size.is_some_and(|s| !s.is_finite() || s <= 0.0) {
            self.err(&[Field("particleSize")], "must be > 0");
        }
        if let Some(target) = pt.target.as_deref() {
            let known = match hero {
                HeroType::Phone => target == PHONE_ID,
                HeroType::Cards => self.card_ids.contains(target),
            };
            if !known {
                self.err(&[Field("target")], format!("unknown target '{target}'"));
            }
        }

        let max = self.limits.max_particles_per_transition;
        if let Some(count) = pt.particle_count
            && count > max
        {
            let mut path = self.path.clone();
            path.push(Field("particleCount"));
            self.warnings.push(Diagnostic {
                kind: DiagnosticKind::ResourceExhaustion,
                path: format_path(&path),
                message: format!("particleCount {count} exceeds the limit of {max}"),
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/validate.rs"]
mod tests;
