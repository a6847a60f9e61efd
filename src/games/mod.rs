pub mod aim_trainer;
pub mod difficulty;
pub mod geometry;
pub mod input;
pub mod move_trainer;
pub mod session;
pub mod sky_defender;

use std::fmt;

use rand::rngs::StdRng;

use crate::games::difficulty::SpawnRamp;
use crate::games::geometry::Field;
use crate::games::input::Controls;
use crate::ranking::Ranking;

pub use session::{Phase, Session};

pub type GameRng = StdRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameKind {
    AimTrainer,
    SkyDefender,
    MovementTrainer,
}

impl GameKind {
    /// Key used by the ranking tables.
    pub fn key(&self) -> &'static str {
        match self {
            GameKind::AimTrainer => "aimTrainer",
            GameKind::SkyDefender => "skyDefender",
            GameKind::MovementTrainer => "movementTrainer",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameKind::AimTrainer => "Aim Trainer",
            GameKind::SkyDefender => "Sky Defender",
            GameKind::MovementTrainer => "Movement Trainer",
        }
    }
}

/// Read-only view of the session counters handed to rulesets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    pub score: u32,
    pub level: u32,
    pub elapsed_secs: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerHit {
    Clear,
    Damaged { health: u32 },
    Fatal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    TimeUp,
    PlayerDown,
    Stopped,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub kind: GameKind,
    pub reason: EndReason,
    pub score: u32,
    pub level: u32,
    pub elapsed_secs: f32,
    pub ranking: Option<Ranking>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Started(GameKind),
    ScoreChanged { score: u32, level: u32 },
    LevelUp(u32),
    HealthChanged(u32),
    Ended(Summary),
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionError {
    Surface { width: f32, height: f32 },
    PoseUnavailable(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Surface { width, height } => {
                write!(f, "playfield {width}x{height} is too small to play on")
            }
            SessionError::PoseUnavailable(reason) => write!(f, "pose source unavailable: {reason}"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Per-game rules plugged into the generic `Session` tick.
///
/// The session calls the hooks in a fixed order every tick: queued pointer
/// presses (`trigger`), `steer`, `advance`, the spawn timer (`spawn`),
/// `collide_player`, `collide_targets`, then `level_for`.
pub trait Ruleset {
    fn kind(&self) -> GameKind;

    fn check_field(&self, field: &Field) -> Result<(), SessionError> {
        if field.is_usable() {
            Ok(())
        } else {
            Err(SessionError::Surface { width: field.width, height: field.height })
        }
    }

    /// Clears every entity and places the player for a fresh session.
    fn reset(&mut self, field: &Field, rng: &mut GameRng);

    fn spawn_ramp(&self) -> Option<SpawnRamp> {
        None
    }

    /// Countdown length in seconds for timed games.
    fn time_limit(&self) -> Option<f32> {
        None
    }

    fn level_for(&self, _progress: &Progress) -> u32 {
        1
    }

    /// Handles a pointer press; returns points earned by it.
    fn trigger(&mut self, _x: f32, _y: f32, _field: &Field, _rng: &mut GameRng) -> u32 {
        0
    }

    fn steer(&mut self, _controls: &Controls, _field: &Field, _dt: f32) {}

    /// Moves every entity by `dt` seconds and drops the ones that left the field.
    fn advance(&mut self, field: &Field, dt: f32);

    fn spawn(&mut self, _field: &Field, _progress: &Progress, _rng: &mut GameRng) {}

    fn collide_player(&mut self) -> PlayerHit {
        PlayerHit::Clear
    }

    /// Resolves projectile-vs-target hits; returns points earned.
    fn collide_targets(&mut self) -> u32 {
        0
    }

    /// Value looked up in the ranking table when the session ends.
    fn ranking_metric(&self, progress: &Progress) -> f64 {
        progress.score as f64
    }
}
