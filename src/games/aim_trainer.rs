use rand::Rng;

use crate::games::geometry::{within_radius, Field};
use crate::games::{GameKind, GameRng, Ruleset, SessionError};

const TARGET_RADIUS: f32 = 30.0;
const TARGET_PADDING: f32 = TARGET_RADIUS + 10.0;
const ROUND_SECS: f32 = 60.0;
const BURST_PARTICLES: usize = 10;
const PARTICLE_MAX_SPEED: f32 = 240.0; // px/s along each axis
const PARTICLE_FADE: f32 = 3.0; // alpha per second

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// Cosmetic hit spark; never affects scoring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub alpha: f32,
}

pub struct AimTrainer {
    target: Option<Target>,
    particles: Vec<Particle>,
    clicks: u32,
    hits: u32,
}

impl AimTrainer {
    pub fn new() -> Self {
        Self { target: None, particles: Vec::new(), clicks: 0, hits: 0 }
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn accuracy(&self) -> Option<f32> {
        (self.clicks > 0).then(|| self.hits as f32 / self.clicks as f32)
    }

    fn spawn_target(&mut self, field: &Field, rng: &mut GameRng) {
        let x = rng.gen_range(TARGET_PADDING..=field.width - TARGET_PADDING);
        let y = rng.gen_range(TARGET_PADDING..=field.height - TARGET_PADDING);
        self.target = Some(Target { x, y, radius: TARGET_RADIUS });
    }

    fn burst(&mut self, x: f32, y: f32, rng: &mut GameRng) {
        for _ in 0..BURST_PARTICLES {
            self.particles.push(Particle {
                x,
                y,
                vx: rng.gen_range(-PARTICLE_MAX_SPEED..PARTICLE_MAX_SPEED),
                vy: rng.gen_range(-PARTICLE_MAX_SPEED..PARTICLE_MAX_SPEED),
                radius: rng.gen_range(2.0..6.0),
                alpha: 1.0,
            });
        }
    }
}

impl Default for AimTrainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Ruleset for AimTrainer {
    fn kind(&self) -> GameKind {
        GameKind::AimTrainer
    }

    fn check_field(&self, field: &Field) -> Result<(), SessionError> {
        if field.is_usable() && field.width >= TARGET_PADDING * 2.0 && field.height >= TARGET_PADDING * 2.0 {
            Ok(())
        } else {
            Err(SessionError::Surface { width: field.width, height: field.height })
        }
    }

    fn reset(&mut self, field: &Field, rng: &mut GameRng) {
        self.particles.clear();
        self.clicks = 0;
        self.hits = 0;
        self.spawn_target(field, rng);
    }

    fn time_limit(&self) -> Option<f32> {
        Some(ROUND_SECS)
    }

    fn trigger(&mut self, x: f32, y: f32, field: &Field, rng: &mut GameRng) -> u32 {
        self.clicks += 1;
        let Some(target) = self.target else { return 0 };
        if !within_radius(x, y, target.x, target.y, target.radius) {
            return 0;
        }
        self.hits += 1;
        self.burst(x, y, rng);
        self.spawn_target(field, rng);
        1
    }

    fn advance(&mut self, _field: &Field, dt: f32) {
        for p in &mut self.particles {
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            p.alpha -= PARTICLE_FADE * dt;
        }
        self.particles.retain(|p| p.alpha > 0.0 && p.x.is_finite() && p.y.is_finite());
    }
}
