use rand::Rng;
use serde::Deserialize;

use crate::games::difficulty::{level_for_score, SpawnRamp};
use crate::games::geometry::{boxes_overlap, Field, Rect};
use crate::games::input::{Controls, Lane};
use crate::games::{GameKind, GameRng, PlayerHit, Progress, Ruleset};

const PLAYER_SIZE: f32 = 40.0;
const PLAYER_BOTTOM_GAP: f32 = 20.0;
const PLAYER_HEALTH: u32 = 3;
const LERP_PER_FRAME: f32 = 0.1; // fraction of the remaining gap closed per 60 Hz frame
const MISSILE_SPEED: f32 = 600.0;
const MISSILE_WIDTH: f32 = 5.0;
const MISSILE_HEIGHT: f32 = 10.0;
const ENEMY_SIZE: f32 = 30.0;
const UFO_CHANCE: f64 = 0.2;
const POINTS_PER_LEVEL: u32 = 100;

/// The two sky-defender rule sets: instant lane snap with forward fire, or
/// gliding steering with fire aimed at the pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkyVariant {
    #[default]
    Snap,
    Glide,
}

impl SkyVariant {
    pub fn ramp(&self) -> SpawnRamp {
        match self {
            SkyVariant::Snap => SpawnRamp::SKY_SNAP,
            SkyVariant::Glide => SpawnRamp::SKY_GLIDE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SkyVariant::Snap => "snap",
            SkyVariant::Glide => "glide",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Meteor,
    Ufo,
}

impl EnemyKind {
    pub fn points(&self) -> u32 {
        match self {
            EnemyKind::Meteor => 10,
            EnemyKind::Ufo => 20,
        }
    }

    /// Fall speed in px/s.
    pub fn speed(&self, level: u32) -> f32 {
        let per_frame = match self {
            EnemyKind::Meteor => 3.0 + level as f32 * 0.5,
            EnemyKind::Ufo => 5.0 + level as f32 * 0.8,
        };
        per_frame * 60.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fighter {
    pub rect: Rect,
    pub health: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Enemy {
    pub rect: Rect,
    pub kind: EnemyKind,
    pub speed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Missile {
    pub rect: Rect,
    pub vx: f32,
    pub vy: f32,
}

pub struct SkyDefender {
    variant: SkyVariant,
    player: Fighter,
    enemies: Vec<Enemy>,
    missiles: Vec<Missile>,
}

impl SkyDefender {
    pub fn new(variant: SkyVariant) -> Self {
        Self {
            variant,
            player: Fighter { rect: Rect::new(0.0, 0.0, PLAYER_SIZE, PLAYER_SIZE), health: PLAYER_HEALTH },
            enemies: Vec::new(),
            missiles: Vec::new(),
        }
    }

    pub fn variant(&self) -> SkyVariant {
        self.variant
    }

    pub fn player(&self) -> &Fighter {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn missiles(&self) -> &[Missile] {
        &self.missiles
    }

    fn lane_x(field: &Field, lane: Lane) -> f32 {
        field.width * lane.fraction() - PLAYER_SIZE / 2.0
    }

    fn fire(&mut self, aim_x: f32, aim_y: f32) {
        let (nose_x, nose_y) = (self.player.rect.x + self.player.rect.width / 2.0, self.player.rect.y);
        let (vx, vy) = match self.variant {
            SkyVariant::Snap => (0.0, -MISSILE_SPEED),
            SkyVariant::Glide => {
                let (dx, dy) = (aim_x - nose_x, aim_y - nose_y);
                let dist = (dx * dx + dy * dy).sqrt();
                if dist > 0.0 {
                    (dx / dist * MISSILE_SPEED, dy / dist * MISSILE_SPEED)
                } else {
                    (0.0, -MISSILE_SPEED)
                }
            }
        };
        self.missiles.push(Missile {
            rect: Rect::new(nose_x - MISSILE_WIDTH / 2.0, nose_y, MISSILE_WIDTH, MISSILE_HEIGHT),
            vx,
            vy,
        });
    }
}

impl Ruleset for SkyDefender {
    fn kind(&self) -> GameKind {
        GameKind::SkyDefender
    }

    fn reset(&mut self, field: &Field, _rng: &mut GameRng) {
        self.enemies.clear();
        self.missiles.clear();
        self.player.health = PLAYER_HEALTH;
        self.player.rect.x = Self::lane_x(field, Lane::Center);
        self.player.rect.y = field.height - PLAYER_SIZE - PLAYER_BOTTOM_GAP;
        field.clamp(&mut self.player.rect);
    }

    fn spawn_ramp(&self) -> Option<SpawnRamp> {
        Some(self.variant.ramp())
    }

    fn level_for(&self, progress: &Progress) -> u32 {
        level_for_score(progress.score, POINTS_PER_LEVEL)
    }

    fn trigger(&mut self, x: f32, y: f32, _field: &Field, _rng: &mut GameRng) -> u32 {
        self.fire(x, y);
        0
    }

    fn steer(&mut self, controls: &Controls, field: &Field, dt: f32) {
        let target = Self::lane_x(field, controls.lane);
        match self.variant {
            SkyVariant::Snap => self.player.rect.x = target,
            SkyVariant::Glide => {
                let blend = 1.0 - (1.0 - LERP_PER_FRAME).powf(dt * 60.0);
                self.player.rect.x += (target - self.player.rect.x) * blend;
            }
        }
        field.clamp(&mut self.player.rect);
    }

    fn advance(&mut self, field: &Field, dt: f32) {
        for m in &mut self.missiles {
            m.rect.x += m.vx * dt;
            m.rect.y += m.vy * dt;
        }
        self.missiles.retain(|m| m.rect.is_finite() && !field.outside_by(&m.rect, 0.0));

        for e in &mut self.enemies {
            e.rect.y += e.speed * dt;
        }
        // enemies enter from above, so only the bottom edge retires them
        self.enemies.retain(|e| e.rect.is_finite() && e.rect.y <= field.height);
    }

    fn spawn(&mut self, field: &Field, progress: &Progress, rng: &mut GameRng) {
        let x = match self.variant {
            SkyVariant::Snap => {
                let lane = Lane::ALL[rng.gen_range(0..Lane::ALL.len())];
                field.width * lane.fraction() - ENEMY_SIZE / 2.0
            }
            SkyVariant::Glide => rng.gen_range(0.0..=(field.width - ENEMY_SIZE).max(0.0)),
        };
        let kind = if rng.gen_bool(UFO_CHANCE) { EnemyKind::Ufo } else { EnemyKind::Meteor };
        self.enemies.push(Enemy {
            rect: Rect::new(x, -ENEMY_SIZE, ENEMY_SIZE, ENEMY_SIZE),
            kind,
            speed: kind.speed(progress.level),
        });
    }

    fn collide_player(&mut self) -> PlayerHit {
        let player = self.player.rect;
        let before = self.enemies.len();
        self.enemies.retain(|e| !boxes_overlap(&player, &e.rect));
        let hits = (before - self.enemies.len()) as u32;
        if hits == 0 {
            return PlayerHit::Clear;
        }
        self.player.health = self.player.health.saturating_sub(hits);
        if self.player.health == 0 {
            PlayerHit::Fatal
        } else {
            PlayerHit::Damaged { health: self.player.health }
        }
    }

    fn collide_targets(&mut self) -> u32 {
        let mut points = 0;
        let mut i = 0;
        while i < self.missiles.len() {
            let missile = self.missiles[i].rect;
            match self.enemies.iter().position(|e| boxes_overlap(&missile, &e.rect)) {
                Some(j) => {
                    points += self.enemies.remove(j).kind.points();
                    self.missiles.remove(i);
                }
                None => i += 1,
            }
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::input::InputEvent;
    use crate::games::session::{Phase, Session};
    use crate::games::{EndReason, GameEvent};
    use rand::SeedableRng;
    use std::time::Duration;

    const FRAME: Duration = Duration::from_millis(16);

    fn started(variant: SkyVariant) -> Session<SkyDefender> {
        let mut s = Session::new(SkyDefender::new(variant), Field::default(), Some(9));
        s.start().unwrap();
        s
    }

    fn enemy_at(x: f32, y: f32, kind: EnemyKind) -> Enemy {
        Enemy { rect: Rect::new(x, y, ENEMY_SIZE, ENEMY_SIZE), kind, speed: 0.0 }
    }

    #[test]
    fn player_starts_bottom_centre() {
        let s = started(SkyVariant::Snap);
        let p = s.rules().player();
        assert_eq!(p.rect.x, 280.0);
        assert_eq!(p.rect.y, 340.0);
        assert_eq!(p.health, 3);
    }

    #[test]
    fn snap_jumps_straight_to_lane() {
        let mut s = started(SkyVariant::Snap);
        s.handle_input(InputEvent::Pose("왼쪽".into()));
        s.update(FRAME);
        assert_eq!(s.rules().player().rect.x, 130.0);
        s.handle_input(InputEvent::Pose("Right".into()));
        s.update(FRAME);
        assert_eq!(s.rules().player().rect.x, 430.0);
    }

    #[test]
    fn glide_closes_gap_gradually() {
        let mut s = started(SkyVariant::Glide);
        s.handle_input(InputEvent::Pose("Left".into()));
        s.update(FRAME);
        let x = s.rules().player().rect.x;
        assert!(x < 280.0 && x > 130.0);
        for _ in 0..300 {
            s.update(FRAME);
            if !s.is_active() {
                break;
            }
        }
        let x = s.rules().player().rect.x;
        assert!((x - 130.0).abs() < 1.0 || !s.is_active());
    }

    #[test]
    fn enemy_hit_costs_health_then_ends() {
        let mut sky = SkyDefender::new(SkyVariant::Snap);
        let field = Field::default();
        sky.reset(&field, &mut GameRng::seed_from_u64(1));
        let p = sky.player.rect;
        sky.enemies.push(enemy_at(p.x, p.y, EnemyKind::Meteor));
        assert_eq!(sky.collide_player(), PlayerHit::Damaged { health: 2 });
        assert!(sky.enemies.is_empty());
        sky.enemies.push(enemy_at(p.x + 5.0, p.y, EnemyKind::Meteor));
        sky.enemies.push(enemy_at(p.x, p.y + 5.0, EnemyKind::Ufo));
        assert_eq!(sky.collide_player(), PlayerHit::Fatal);
        assert_eq!(sky.player.health, 0);
    }

    #[test]
    fn enemy_touching_player_edge_is_a_miss() {
        let mut sky = SkyDefender::new(SkyVariant::Snap);
        sky.reset(&Field::default(), &mut GameRng::seed_from_u64(1));
        let p = sky.player.rect;
        sky.enemies.push(enemy_at(p.x + p.width, p.y, EnemyKind::Meteor));
        assert_eq!(sky.collide_player(), PlayerHit::Clear);
        assert_eq!(sky.enemies.len(), 1);
    }

    #[test]
    fn missile_destroys_one_enemy() {
        let mut sky = SkyDefender::new(SkyVariant::Snap);
        sky.reset(&Field::default(), &mut GameRng::seed_from_u64(1));
        sky.fire(0.0, 0.0);
        let m = sky.missiles[0].rect;
        sky.enemies.push(enemy_at(m.x - 10.0, m.y - 5.0, EnemyKind::Ufo));
        sky.enemies.push(enemy_at(m.x - 12.0, m.y - 8.0, EnemyKind::Meteor));
        assert_eq!(sky.collide_targets(), EnemyKind::Ufo.points());
        assert!(sky.missiles.is_empty());
        assert_eq!(sky.enemies.len(), 1);
    }

    #[test]
    fn snap_fires_straight_up_and_glide_aims() {
        let mut snap = SkyDefender::new(SkyVariant::Snap);
        snap.reset(&Field::default(), &mut GameRng::seed_from_u64(1));
        snap.fire(0.0, 340.0);
        assert_eq!((snap.missiles[0].vx, snap.missiles[0].vy), (0.0, -MISSILE_SPEED));

        let mut glide = SkyDefender::new(SkyVariant::Glide);
        glide.reset(&Field::default(), &mut GameRng::seed_from_u64(1));
        glide.fire(0.0, 340.0);
        let m = glide.missiles[0];
        assert!(m.vx < 0.0);
        assert!((m.vx.hypot(m.vy) - MISSILE_SPEED).abs() < 0.01);
    }

    #[test]
    fn missiles_leave_through_the_top() {
        let mut s = started(SkyVariant::Snap);
        s.handle_input(InputEvent::PointerDown { x: 0.0, y: 0.0 });
        s.update(FRAME);
        assert_eq!(s.rules().missiles().len(), 1);
        for _ in 0..40 {
            s.update(FRAME);
        }
        assert!(s.rules().missiles().is_empty());
    }

    #[test]
    fn lane_spawns_are_centred_on_lanes() {
        let mut sky = SkyDefender::new(SkyVariant::Snap);
        let field = Field::default();
        let mut rng = GameRng::seed_from_u64(5);
        let progress = Progress { score: 0, level: 1, elapsed_secs: 0.0 };
        for _ in 0..50 {
            sky.spawn(&field, &progress, &mut rng);
        }
        for e in sky.enemies() {
            let centre = e.rect.x + ENEMY_SIZE / 2.0;
            assert!([150.0, 300.0, 450.0].contains(&centre));
            assert_eq!(e.rect.y, -ENEMY_SIZE);
            assert_eq!(e.speed, e.kind.speed(1));
        }
    }

    #[test]
    fn enemies_removed_past_bottom() {
        let mut sky = SkyDefender::new(SkyVariant::Snap);
        let field = Field::default();
        sky.enemies.push(Enemy { rect: Rect::new(10.0, 395.0, 30.0, 30.0), kind: EnemyKind::Meteor, speed: 600.0 });
        sky.advance(&field, 0.016);
        assert!(sky.enemies.is_empty());
    }

    #[test]
    fn hundred_points_levels_up() {
        let mut s = started(SkyVariant::Snap);
        for _ in 0..5 {
            let sky = s.rules_mut();
            sky.fire(0.0, 0.0);
            let m = sky.missiles.last_mut().unwrap();
            m.rect.y = 100.0;
            let (x, y) = (m.rect.x, m.rect.y);
            sky.enemies.push(enemy_at(x - 10.0, y - 5.0, EnemyKind::Ufo));
            s.update(Duration::ZERO);
        }
        assert_eq!(s.score(), 100);
        assert_eq!(s.level(), 2);
        assert!(s.take_events().contains(&GameEvent::LevelUp(2)));
    }

    #[test]
    fn three_hits_end_the_run() {
        let mut s = started(SkyVariant::Snap);
        for _ in 0..3 {
            let p = s.rules().player().rect;
            s.rules_mut().enemies.push(enemy_at(p.x, p.y, EnemyKind::Meteor));
            s.update(Duration::ZERO);
        }
        assert_eq!(s.phase(), Phase::Ended);
        assert_eq!(s.summary().unwrap().reason, EndReason::PlayerDown);
    }
}
