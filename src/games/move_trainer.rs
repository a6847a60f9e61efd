use rand::Rng;

use crate::games::difficulty::SpawnRamp;
use crate::games::geometry::{boxes_overlap, Field, Rect};
use crate::games::input::Controls;
use crate::games::{GameKind, GameRng, PlayerHit, Progress, Ruleset};

const PLAYER_SIZE: f32 = 30.0;
const PLAYER_SPEED: f32 = 300.0;
const SLIDE_MULTIPLIER: f32 = 2.0;
const DIAGONAL_SCALE: f32 = 0.707;
const JUMP_SPEED: f32 = 600.0;
const JUMP_GRAVITY: f32 = 2880.0;
const AIRBORNE_HEIGHT: f32 = 10.0; // immune above this
const BULLET_SIZE: f32 = 10.0;
const BULLET_SPAWN_OFFSET: f32 = 20.0;
const BULLET_BOUNDS_MARGIN: f32 = 50.0;
const ELEVATED_CHANCE: f64 = 0.3;
const SECONDS_PER_LEVEL: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Runner {
    pub rect: Rect,
    pub facing: (f32, f32),
    pub jumping: bool,
    pub jump_height: f32,
    pub jump_velocity: f32,
    pub sliding: bool,
    pub crouching: bool,
}

impl Runner {
    fn new() -> Self {
        Self {
            rect: Rect::new(0.0, 0.0, PLAYER_SIZE, PLAYER_SIZE),
            facing: (0.0, -1.0),
            jumping: false,
            jump_height: 0.0,
            jump_velocity: 0.0,
            sliding: false,
            crouching: false,
        }
    }

    pub fn is_airborne(&self) -> bool {
        self.jumping && self.jump_height > AIRBORNE_HEIGHT
    }

    pub fn is_low(&self) -> bool {
        self.sliding || self.crouching
    }

    /// Crouching and sliding keep only the lower half of the body hittable.
    pub fn hitbox(&self) -> Rect {
        if self.is_low() {
            let half = self.rect.height / 2.0;
            Rect::new(self.rect.x, self.rect.y + half, self.rect.width, half)
        } else {
            self.rect
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bullet {
    pub rect: Rect,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    /// Flies high enough to pass over a crouching or sliding runner.
    pub elevated: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];
}

pub struct MoveTrainer {
    player: Runner,
    bullets: Vec<Bullet>,
    spawned: u32,
    escaped: u32,
}

impl MoveTrainer {
    pub fn new() -> Self {
        Self { player: Runner::new(), bullets: Vec::new(), spawned: 0, escaped: 0 }
    }

    pub fn player(&self) -> &Runner {
        &self.player
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    /// Bullets spawned this session.
    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    /// Bullets that flew off the playfield this session.
    pub fn escaped(&self) -> u32 {
        self.escaped
    }

    pub fn bullet_speed(elapsed_secs: f32) -> f32 {
        (3.0 + elapsed_secs / 10.0) * 60.0
    }

    fn push_bullet(&mut self, x: f32, y: f32, speed: f32, elevated: bool) {
        let (cx, cy) = self.player.rect.center();
        let (dx, dy) = (cx - x, cy - y);
        let dist = (dx * dx + dy * dy).sqrt();
        let (vx, vy) = if dist > 0.0 { (dx / dist * speed, dy / dist * speed) } else { (speed, 0.0) };
        self.bullets.push(Bullet {
            rect: Rect::new(x, y, BULLET_SIZE, BULLET_SIZE),
            vx,
            vy,
            radius: if elevated { 8.0 } else { 5.0 },
            elevated,
        });
        self.spawned += 1;
    }
}

impl Default for MoveTrainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Ruleset for MoveTrainer {
    fn kind(&self) -> GameKind {
        GameKind::MovementTrainer
    }

    fn reset(&mut self, field: &Field, _rng: &mut GameRng) {
        self.player = Runner::new();
        self.player.rect.x = field.width / 2.0 - PLAYER_SIZE / 2.0;
        self.player.rect.y = field.height / 2.0 - PLAYER_SIZE / 2.0;
        field.clamp(&mut self.player.rect);
        self.bullets.clear();
        self.spawned = 0;
        self.escaped = 0;
    }

    fn spawn_ramp(&self) -> Option<SpawnRamp> {
        Some(SpawnRamp::MOVEMENT)
    }

    fn level_for(&self, progress: &Progress) -> u32 {
        (progress.elapsed_secs / SECONDS_PER_LEVEL) as u32 + 1
    }

    fn steer(&mut self, controls: &Controls, field: &Field, dt: f32) {
        let p = &mut self.player;
        let (mut vx, mut vy) = (0.0, 0.0);
        if controls.left {
            vx = -PLAYER_SPEED;
        }
        if controls.right {
            vx = PLAYER_SPEED;
        }
        if controls.up {
            vy = -PLAYER_SPEED;
        }
        if controls.down {
            vy = PLAYER_SPEED;
        }

        if vx != 0.0 || vy != 0.0 {
            let mag = (vx * vx + vy * vy).sqrt();
            p.facing = (vx / mag, vy / mag);
        }

        p.sliding = false;
        p.crouching = false;
        if controls.crouch {
            if controls.any_direction() {
                p.sliding = true;
                vx = p.facing.0 * PLAYER_SPEED * SLIDE_MULTIPLIER;
                vy = p.facing.1 * PLAYER_SPEED * SLIDE_MULTIPLIER;
            } else {
                p.crouching = true;
                vx = 0.0;
                vy = 0.0;
            }
        } else if vx != 0.0 && vy != 0.0 {
            vx *= DIAGONAL_SCALE;
            vy *= DIAGONAL_SCALE;
        }

        p.rect.x += vx * dt;
        p.rect.y += vy * dt;
        field.clamp(&mut p.rect);

        if controls.jump && !p.jumping && !p.crouching {
            p.jumping = true;
            p.jump_velocity = JUMP_SPEED;
        }
        if p.jumping {
            p.jump_height += p.jump_velocity * dt;
            p.jump_velocity -= JUMP_GRAVITY * dt;
            if p.jump_height <= 0.0 {
                p.jump_height = 0.0;
                p.jump_velocity = 0.0;
                p.jumping = false;
            }
        }
    }

    fn advance(&mut self, field: &Field, dt: f32) {
        for b in &mut self.bullets {
            b.rect.x += b.vx * dt;
            b.rect.y += b.vy * dt;
        }
        let before = self.bullets.len();
        self.bullets.retain(|b| b.rect.is_finite() && !field.outside_by(&b.rect, BULLET_BOUNDS_MARGIN));
        self.escaped += (before - self.bullets.len()) as u32;
    }

    fn spawn(&mut self, field: &Field, progress: &Progress, rng: &mut GameRng) {
        let speed = Self::bullet_speed(progress.elapsed_secs);
        let (x, y) = match Edge::ALL[rng.gen_range(0..Edge::ALL.len())] {
            Edge::Top => (rng.gen_range(0.0..field.width), -BULLET_SPAWN_OFFSET),
            Edge::Right => (field.width + BULLET_SPAWN_OFFSET, rng.gen_range(0.0..field.height)),
            Edge::Bottom => (rng.gen_range(0.0..field.width), field.height + BULLET_SPAWN_OFFSET),
            Edge::Left => (-BULLET_SPAWN_OFFSET, rng.gen_range(0.0..field.height)),
        };
        let elevated = rng.gen_bool(ELEVATED_CHANCE);
        self.push_bullet(x, y, speed, elevated);
    }

    fn collide_player(&mut self) -> PlayerHit {
        if self.player.is_airborne() {
            return PlayerHit::Clear;
        }
        let hitbox = self.player.hitbox();
        let low = self.player.is_low();
        let hit = self
            .bullets
            .iter()
            .position(|b| !(low && b.elevated) && boxes_overlap(&hitbox, &b.rect));
        match hit {
            Some(i) => {
                self.bullets.remove(i);
                PlayerHit::Fatal
            }
            None => PlayerHit::Clear,
        }
    }

    fn ranking_metric(&self, progress: &Progress) -> f64 {
        progress.elapsed_secs as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::input::{InputEvent, Key};
    use crate::games::session::{Phase, Session};
    use crate::games::EndReason;
    use rand::SeedableRng;
    use std::time::Duration;

    const FRAME: f32 = 1.0 / 60.0;

    fn trainer() -> (MoveTrainer, Field) {
        let field = Field::default();
        let mut t = MoveTrainer::new();
        t.reset(&field, &mut GameRng::seed_from_u64(1));
        (t, field)
    }

    fn bullet_at(x: f32, y: f32, elevated: bool) -> Bullet {
        Bullet { rect: Rect::new(x, y, BULLET_SIZE, BULLET_SIZE), vx: 0.0, vy: 0.0, radius: 5.0, elevated }
    }

    #[test]
    fn walks_and_normalises_diagonals() {
        let (mut t, field) = trainer();
        let start = t.player.rect;
        let controls = Controls { right: true, down: true, ..Controls::default() };
        t.steer(&controls, &field, 0.1);
        let moved = PLAYER_SPEED * DIAGONAL_SCALE * 0.1;
        assert!((t.player.rect.x - start.x - moved).abs() < 1e-3);
        assert!((t.player.rect.y - start.y - moved).abs() < 1e-3);
        let (fx, fy) = t.player.facing;
        assert!((fx - fy).abs() < 1e-6 && fx > 0.0);
    }

    #[test]
    fn crouch_without_direction_stands_still() {
        let (mut t, field) = trainer();
        let start = t.player.rect;
        let controls = Controls { crouch: true, ..Controls::default() };
        t.steer(&controls, &field, 0.1);
        assert!(t.player.crouching && !t.player.sliding);
        assert_eq!(t.player.rect, start);
        assert_eq!(t.player.hitbox().height, PLAYER_SIZE / 2.0);
        assert_eq!(t.player.hitbox().y, start.y + PLAYER_SIZE / 2.0);
    }

    #[test]
    fn crouch_while_moving_slides_faster() {
        let (mut t, field) = trainer();
        let start = t.player.rect;
        let controls = Controls { left: true, crouch: true, ..Controls::default() };
        t.steer(&controls, &field, 0.1);
        assert!(t.player.sliding);
        let travelled = start.x - t.player.rect.x;
        assert!((travelled - PLAYER_SPEED * SLIDE_MULTIPLIER * 0.1).abs() < 1e-3);
    }

    #[test]
    fn clamps_to_field() {
        let (mut t, field) = trainer();
        let controls = Controls { up: true, ..Controls::default() };
        for _ in 0..200 {
            t.steer(&controls, &field, FRAME);
        }
        assert_eq!(t.player.rect.y, 0.0);
    }

    #[test]
    fn jump_arcs_and_lands() {
        let (mut t, field) = trainer();
        let jump = Controls { jump: true, ..Controls::default() };
        t.steer(&jump, &field, FRAME);
        assert!(t.player.jumping);
        let idle = Controls::default();
        let mut peak: f32 = 0.0;
        for _ in 0..60 {
            t.steer(&idle, &field, FRAME);
            peak = peak.max(t.player.jump_height);
        }
        assert!(peak > AIRBORNE_HEIGHT);
        assert!(!t.player.jumping);
        assert_eq!(t.player.jump_height, 0.0);
    }

    #[test]
    fn cannot_jump_from_crouch() {
        let (mut t, field) = trainer();
        let controls = Controls { jump: true, crouch: true, ..Controls::default() };
        t.steer(&controls, &field, FRAME);
        assert!(!t.player.jumping);
    }

    #[test]
    fn airborne_runner_is_immune() {
        let (mut t, _) = trainer();
        let p = t.player.rect;
        t.bullets.push(bullet_at(p.x + 5.0, p.y + 5.0, false));
        t.player.jumping = true;
        t.player.jump_height = 20.0;
        assert_eq!(t.collide_player(), PlayerHit::Clear);
        t.player.jump_height = 5.0;
        assert_eq!(t.collide_player(), PlayerHit::Fatal);
        assert!(t.bullets.is_empty());
    }

    #[test]
    fn crouching_ducks_elevated_bullets() {
        let (mut t, _) = trainer();
        let p = t.player.rect;
        t.player.crouching = true;
        t.bullets.push(bullet_at(p.x + 5.0, p.y + 20.0, true));
        assert_eq!(t.collide_player(), PlayerHit::Clear);
        t.bullets.push(bullet_at(p.x + 5.0, p.y + 20.0, false));
        assert_eq!(t.collide_player(), PlayerHit::Fatal);
    }

    #[test]
    fn crouching_shrinks_hitbox_for_regular_bullets() {
        let (mut t, _) = trainer();
        let p = t.player.rect;
        t.bullets.push(bullet_at(p.x + 5.0, p.y + 2.0, false));
        t.player.crouching = true;
        assert_eq!(t.collide_player(), PlayerHit::Clear);
        t.player.crouching = false;
        assert_eq!(t.collide_player(), PlayerHit::Fatal);
    }

    #[test]
    fn bullets_aim_at_player_centre() {
        let (mut t, field) = trainer();
        let mut rng = GameRng::seed_from_u64(11);
        let progress = Progress { score: 0, level: 1, elapsed_secs: 20.0 };
        for _ in 0..40 {
            t.spawn(&field, &progress, &mut rng);
        }
        let (cx, cy) = t.player.rect.center();
        let speed = MoveTrainer::bullet_speed(20.0);
        assert_eq!(speed, 300.0);
        for b in t.bullets() {
            assert!(field.outside_by(&Rect::new(b.rect.x, b.rect.y, 0.0, 0.0), 0.0));
            assert!((b.vx.hypot(b.vy) - speed).abs() < 0.01);
            let (dx, dy) = (cx - b.rect.x, cy - b.rect.y);
            let cross = dx * b.vy - dy * b.vx;
            assert!(cross.abs() / dx.hypot(dy) < 0.01 * speed);
            assert_eq!(b.radius, if b.elevated { 8.0 } else { 5.0 });
        }
        assert_eq!(t.spawned(), 40);
    }

    #[test]
    fn stray_bullets_are_dropped_beyond_margin() {
        let (mut t, field) = trainer();
        let mut b = bullet_at(-30.0, 100.0, false);
        b.vx = -600.0;
        t.bullets.push(b);
        t.advance(&field, 0.1);
        assert!(t.bullets.is_empty());
        assert_eq!(t.escaped(), 1);
    }

    #[test]
    fn manual_stop_ends_with_survival_time() {
        let mut s = Session::new(MoveTrainer::new(), Field::default(), Some(3));
        s.start().unwrap();
        s.handle_input(InputEvent::KeyDown(Key::Crouch));
        s.update(Duration::from_millis(250));
        s.stop();
        s.stop();
        assert_eq!(s.phase(), Phase::Ended);
        let summary = s.summary().unwrap();
        assert_eq!(summary.reason, EndReason::Stopped);
        assert!((summary.elapsed_secs - 0.25).abs() < 1e-6);
        assert_eq!(summary.ranking.unwrap().tier, "Walking Target");
    }
}
