use std::collections::BTreeMap;

use crate::{
    animation::ease::{Ease, Easing},
    foundation::color::Color,
    foundation::error::CineResult,
    scene::definition::Scene,
    scene::model::{
        Background, CameraKeyframe, CameraTrack, CardDefinition, HeroType, LookAtBlend,
        ObjectKeyframe, ObjectTrack, ParticleKind, ParticleTransition, PhoneConfig,
        PostProcessing, ScaleDef, SceneDefaults, SceneDefinition, SceneMeta, ScreenChange,
        ScreenTransition, ScreenTransitionKind, Shot, TextOverlay,
    },
    scene::validate::ValidationLimits,
    screens::registry::ScreenRegistry,
};

/// Builder for [`Scene`].
pub struct SceneBuilder {
    meta: SceneMeta,
    hero_type: HeroType,
    phone: Option<PhoneConfig>,
    cards: Vec<CardDefinition>,
    defaults: Option<SceneDefaults>,
    shots: Vec<Shot>,
}

impl SceneBuilder {
    /// Phone scene.
    pub fn phone(title: impl Into<String>, fps: u32, width: u32, height: u32) -> Self {
        Self::new(HeroType::Phone, title.into(), fps, width, height)
    }

    /// Card scene.
    pub fn cards(title: impl Into<String>, fps: u32, width: u32, height: u32) -> Self {
        Self::new(HeroType::Cards, title.into(), fps, width, height)
    }

    fn new(hero_type: HeroType, title: String, fps: u32, width: u32, height: u32) -> Self {
        Self {
            meta: SceneMeta {
                title,
                fps,
                width,
                height,
            },
            hero_type,
            phone: None,
            cards: Vec::new(),
            defaults: None,
            shots: Vec::new(),
        }
    }

    /// Set the phone configuration.
    pub fn phone_config(mut self, cfg: PhoneConfig) -> Self {
        self.phone = Some(cfg);
        self
    }

    /// Append a card.
    pub fn card(mut self, card: CardDefinition) -> Self {
        self.cards.push(card);
        self
    }

    /// Set scene-wide fallbacks.
    pub fn defaults(mut self, defaults: SceneDefaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Append a shot.
    pub fn shot(mut self, shot: Shot) -> Self {
        self.shots.push(shot);
        self
    }

    /// Assemble the definition without validating it.
    pub fn build_unchecked(self) -> Scene {
        Scene::from(SceneDefinition {
            meta: self.meta,
            hero_type: self.hero_type,
            phone: self.phone,
            cards: (!self.cards.is_empty()).then_some(self.cards),
            defaults: self.defaults,
            shots: self.shots,
        })
    }

    /// Build and validate the final [`Scene`].
    pub fn build(self, screens: &dyn ScreenRegistry) -> CineResult<Scene> {
        let scene = self.build_unchecked();
        scene.validate(screens, ValidationLimits::default())?;
        Ok(scene)
    }
}

/// Builder for one [`Shot`].
pub struct ShotBuilder {
    shot: Shot,
}

impl ShotBuilder {
    pub fn new(id: impl Into<String>, duration: f64) -> Self {
        Self {
            shot: Shot {
                id: id.into(),
                duration,
                camera: CameraTrack::default(),
                phone: None,
                cards: None,
                text_overlays: None,
                post_processing: None,
                background: None,
                particle_transition: None,
            },
        }
    }

    pub fn camera_key(mut self, key: CameraKeyframe) -> Self {
        self.shot.camera.keyframes.push(key);
        self
    }

    pub fn look_at_blend(mut self, blend: LookAtBlend) -> Self {
        self.shot.camera.look_at_blend = Some(blend);
        self
    }

    pub fn phone_key(mut self, key: ObjectKeyframe) -> Self {
        let track = self.shot.phone.get_or_insert_with(ObjectTrack::default);
        track.keyframes.get_or_insert_with(Vec::new).push(key);
        self
    }

    pub fn phone_screen(mut self, change: ScreenChange) -> Self {
        let track = self.shot.phone.get_or_insert_with(ObjectTrack::default);
        track.screen_changes.get_or_insert_with(Vec::new).push(change);
        self
    }

    pub fn card_key(mut self, card_id: impl Into<String>, key: ObjectKeyframe) -> Self {
        let track = self.card_track(card_id.into());
        track.keyframes.get_or_insert_with(Vec::new).push(key);
        self
    }

    pub fn card_screen(mut self, card_id: impl Into<String>, change: ScreenChange) -> Self {
        let track = self.card_track(card_id.into());
        track.screen_changes.get_or_insert_with(Vec::new).push(change);
        self
    }

    fn card_track(&mut self, card_id: String) -> &mut ObjectTrack {
        self.shot
            .cards
            .get_or_insert_with(BTreeMap::new)
            .entry(card_id)
            .or_default()
    }

    pub fn overlay(mut self, overlay: TextOverlay) -> Self {
        self.shot
            .text_overlays
            .get_or_insert_with(Vec::new)
            .push(overlay);
        self
    }

    pub fn background(mut self, background: Background) -> Self {
        self.shot.background = Some(background);
        self
    }

    pub fn post_processing(mut self, post: PostProcessing) -> Self {
        self.shot.post_processing = Some(post);
        self
    }

    pub fn particles(mut self, transition: ParticleTransition) -> Self {
        self.shot.particle_transition = Some(transition);
        self
    }

    pub fn build(self) -> Shot {
        self.shot
    }
}

impl CameraKeyframe {
    /// Keyframe at `time` with no fields set.
    pub fn at(time: f64) -> Self {
        Self {
            time,
            ..Self::default()
        }
    }

    pub fn position(mut self, p: [f64; 3]) -> Self {
        self.position = Some(p);
        self
    }

    pub fn look_at(mut self, p: [f64; 3]) -> Self {
        self.look_at = Some(p);
        self
    }

    pub fn fov(mut self, deg: f64) -> Self {
        self.fov = Some(deg);
        self
    }

    pub fn roll(mut self, deg: f64) -> Self {
        self.roll = Some(deg);
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.easing = Some(Easing::Known(ease));
        self
    }
}

impl ObjectKeyframe {
    /// Keyframe at `time` with no fields set.
    pub fn at(time: f64) -> Self {
        Self {
            time,
            ..Self::default()
        }
    }

    pub fn position(mut self, p: [f64; 3]) -> Self {
        self.position = Some(p);
        self
    }

    pub fn rotation(mut self, euler_deg: [f64; 3]) -> Self {
        self.rotation = Some(euler_deg);
        self
    }

    pub fn scale(mut self, s: f64) -> Self {
        self.scale = Some(ScaleDef::Uniform(s));
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.easing = Some(Easing::Known(ease));
        self
    }
}

impl ScreenChange {
    /// Instant swap.
    pub fn cut(time: f64, screen_id: impl Into<String>) -> Self {
        Self {
            time,
            screen_id: screen_id.into(),
            transition: None,
        }
    }

    /// Cross-fade; `duration` falls back to the engine default when `None`.
    pub fn fade(time: f64, screen_id: impl Into<String>, duration: Option<f64>) -> Self {
        Self {
            time,
            screen_id: screen_id.into(),
            transition: Some(ScreenTransition {
                kind: ScreenTransitionKind::Fade,
                duration,
            }),
        }
    }
}

impl ParticleTransition {
    /// Transition with every optional parameter left to its default.
    pub fn new(kind: ParticleKind, trigger_time: f64, duration: f64) -> Self {
        Self {
            kind,
            trigger_time,
            duration,
            particle_count: None,
            spread_radius: None,
            direction: None,
            particle_size: None,
            color: None,
            end_color: None,
            gravity: None,
            turbulence: None,
            target: None,
            easing: None,
        }
    }

    pub fn count(mut self, n: u32) -> Self {
        self.particle_count = Some(n);
        self
    }

    pub fn colors(mut self, start: Color, end: Color) -> Self {
        self.color = Some(start);
        self.end_color = Some(end);
        self
    }

    pub fn physics(mut self, gravity: f64, turbulence: f64) -> Self {
        self.gravity = Some(gravity);
        self.turbulence = Some(turbulence);
        self
    }

    pub fn target(mut self, id: impl Into<String>) -> Self {
        self.target = Some(id.into());
        self
    }
}

impl TextOverlay {
    /// Overlay shown from `start_time` to the end of the shot.
    pub fn new(text: impl Into<String>, start_time: f64) -> Self {
        Self {
            text: text.into(),
            start_time,
            end_time: None,
            position: None,
            font_size: None,
            color: None,
            fade_duration: None,
            easing: None,
        }
    }

    pub fn until(mut self, end_time: f64) -> Self {
        self.end_time = Some(end_time);
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/dsl.rs"]
mod tests;
