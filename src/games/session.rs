use std::time::Duration;

use rand::SeedableRng;

use crate::games::difficulty::SpawnTimer;
use crate::games::geometry::Field;
use crate::games::input::{Controls, InputEvent, Lane};
use crate::games::{
    EndReason, GameEvent, GameRng, PlayerHit, Progress, Ruleset, SessionError, Summary,
};
use crate::ranking;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
    Ended,
}

/// One play-through of a ruleset, from `start` to its end state.
pub struct Session<R: Ruleset> {
    rules: R,
    field: Field,
    phase: Phase,
    score: u32,
    level: u32,
    elapsed_secs: f32,
    spawn_timer: SpawnTimer,
    controls: Controls,
    pointer_queue: Vec<(f32, f32)>,
    rng: GameRng,
    events: Vec<GameEvent>,
    summary: Option<Summary>,
}

impl<R: Ruleset> Session<R> {
    pub fn new(rules: R, field: Field, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => GameRng::seed_from_u64(seed),
            None => GameRng::from_entropy(),
        };
        Self {
            rules,
            field,
            phase: Phase::Idle,
            score: 0,
            level: 1,
            elapsed_secs: 0.0,
            spawn_timer: SpawnTimer::default(),
            controls: Controls::default(),
            pointer_queue: Vec::new(),
            rng,
            events: Vec::new(),
            summary: None,
        }
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        if let Err(err) = self.rules.check_field(&self.field) {
            log::error!("cannot start {}: {}", self.rules.kind().title(), err);
            self.phase = Phase::Idle;
            return Err(err);
        }

        self.score = 0;
        self.level = 1;
        self.elapsed_secs = 0.0;
        self.spawn_timer.reset();
        self.pointer_queue.clear();
        self.summary = None;
        self.rules.reset(&self.field, &mut self.rng);
        self.phase = Phase::Active;

        log::info!("{} session started", self.rules.kind().title());
        self.events.push(GameEvent::Started(self.rules.kind()));
        self.events.push(GameEvent::ScoreChanged { score: 0, level: 1 });
        Ok(())
    }

    /// Ends an active session. Calling it again is a no-op.
    pub fn stop(&mut self) {
        if self.phase == Phase::Active {
            self.finish(EndReason::Stopped);
        }
    }

    /// Drops a finished session's result so it reads as never started.
    /// Active sessions are left alone; use `stop` for those.
    pub fn reset_idle(&mut self) {
        if self.phase != Phase::Active {
            self.phase = Phase::Idle;
            self.summary = None;
            self.pointer_queue.clear();
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => self.controls.set(key, true),
            InputEvent::KeyUp(key) => self.controls.set(key, false),
            InputEvent::PointerDown { x, y } => {
                if self.phase == Phase::Active && x.is_finite() && y.is_finite() {
                    self.pointer_queue.push((x, y));
                }
            }
            InputEvent::Pose(label) => match Lane::from_label(&label) {
                Some(lane) => self.controls.lane = lane,
                None => log::debug!("ignoring unknown pose label {label:?}"),
            },
        }
    }

    pub fn update(&mut self, dt: Duration) {
        if self.phase != Phase::Active {
            return;
        }
        let dt = dt.as_secs_f32();
        self.elapsed_secs += dt;

        // Presses landing after the countdown ran out do not count.
        let expired = self.rules.time_limit().is_some_and(|limit| self.elapsed_secs >= limit);
        let presses = std::mem::take(&mut self.pointer_queue);
        if !expired {
            for (x, y) in presses {
                let points = self.rules.trigger(x, y, &self.field, &mut self.rng);
                self.award(points);
            }
        }

        self.rules.steer(&self.controls, &self.field, dt);
        self.rules.advance(&self.field, dt);

        if let Some(ramp) = self.rules.spawn_ramp() {
            let interval = ramp.interval_ms(self.level, self.elapsed_secs);
            if self.spawn_timer.advance(dt * 1000.0, interval) {
                let progress = self.progress();
                self.rules.spawn(&self.field, &progress, &mut self.rng);
            }
        }

        match self.rules.collide_player() {
            PlayerHit::Clear => {}
            PlayerHit::Damaged { health } => self.events.push(GameEvent::HealthChanged(health)),
            PlayerHit::Fatal => {
                self.events.push(GameEvent::HealthChanged(0));
                self.finish(EndReason::PlayerDown);
                return;
            }
        }

        let points = self.rules.collide_targets();
        self.award(points);
        self.refresh_level();

        if let Some(limit) = self.rules.time_limit() {
            if self.elapsed_secs >= limit {
                self.elapsed_secs = limit;
                self.finish(EndReason::TimeUp);
            }
        }
    }

    /// Drains events raised since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn progress(&self) -> Progress {
        Progress { score: self.score, level: self.level, elapsed_secs: self.elapsed_secs }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_secs
    }

    pub fn time_left(&self) -> Option<f32> {
        self.rules.time_limit().map(|limit| (limit - self.elapsed_secs).max(0.0))
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    #[cfg(test)]
    pub(crate) fn rules_mut(&mut self) -> &mut R {
        &mut self.rules
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    fn award(&mut self, points: u32) {
        if points == 0 {
            return;
        }
        self.score = self.score.saturating_add(points);
        self.refresh_level();
        self.events.push(GameEvent::ScoreChanged { score: self.score, level: self.level });
    }

    fn refresh_level(&mut self) {
        let level = self.rules.level_for(&self.progress());
        if level > self.level {
            self.level = level;
            log::debug!("{} reached level {}", self.rules.kind().title(), level);
            self.events.push(GameEvent::LevelUp(level));
        }
    }

    fn finish(&mut self, reason: EndReason) {
        self.phase = Phase::Ended;
        self.pointer_queue.clear();
        let progress = self.progress();
        let kind = self.rules.kind();
        let summary = Summary {
            kind,
            reason,
            score: self.score,
            level: self.level,
            elapsed_secs: self.elapsed_secs,
            ranking: ranking::calculate_percentile(kind.key(), self.rules.ranking_metric(&progress)),
        };
        log::info!(
            "{} session ended ({:?}): score {}, level {}, {:.2}s",
            kind.title(),
            reason,
            summary.score,
            summary.level,
            summary.elapsed_secs
        );
        self.summary = Some(summary.clone());
        self.events.push(GameEvent::Ended(summary));
    }
}
