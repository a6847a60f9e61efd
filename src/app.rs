use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::config::Config;
use crate::event::{FrameClock, KeyLatch};
use crate::games::aim_trainer::AimTrainer;
use crate::games::geometry::Field;
use crate::games::input::{InputEvent, Key};
use crate::games::move_trainer::MoveTrainer;
use crate::games::sky_defender::SkyDefender;
use crate::games::{EndReason, GameEvent, GameKind, Phase, Session, SessionError, Summary};
use crate::pose::PoseSource;

const CROSSHAIR_STEP: f32 = 20.0;
const LATCH_HOLD: Duration = Duration::from_millis(150);
const HELD_KEYS: [Key; 6] = [Key::Up, Key::Down, Key::Left, Key::Right, Key::Jump, Key::Crouch];

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tab {
    Home,
    Aim,
    Sky,
    Move,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Home, Tab::Aim, Tab::Sky, Tab::Move]
    }

    pub fn title(&self) -> &str {
        match self {
            Tab::Home => " Home ",
            Tab::Aim => " Aim ",
            Tab::Sky => " Sky ",
            Tab::Move => " Move ",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::Aim => 1,
            Tab::Sky => 2,
            Tab::Move => 3,
        }
    }

    pub fn game(&self) -> Option<GameKind> {
        match self {
            Tab::Home => None,
            Tab::Aim => Some(GameKind::AimTrainer),
            Tab::Sky => Some(GameKind::SkyDefender),
            Tab::Move => Some(GameKind::MovementTrainer),
        }
    }

    fn for_game(idx: usize) -> Tab {
        Tab::all().get(idx + 1).copied().unwrap_or(Tab::Home)
    }
}

pub struct App {
    pub should_quit: bool,
    pub current_tab: Tab,
    pub selected_game: usize, // 0-2 for home screen game selection
    pub aim: Session<AimTrainer>,
    pub sky: Session<SkyDefender>,
    pub movement: Session<MoveTrainer>,
    /// Aim tab keyboard pointer, in playfield coordinates.
    pub crosshair: (f32, f32),
    /// Screen cells the current playfield was last drawn into.
    pub playfield_area: Rect,
    pub status: Option<String>,
    pose: Box<dyn PoseSource>,
    clock: FrameClock,
    latch: KeyLatch,
    release_events: bool,
}

impl App {
    /// `release_events` tells whether the terminal reports key releases;
    /// without them held keys are released after a short quiet period.
    pub fn new(config: &Config, pose: Box<dyn PoseSource>, release_events: bool) -> Self {
        let field = config.playfield.field();
        Self {
            should_quit: false,
            current_tab: Tab::Home,
            selected_game: 0,
            aim: Session::new(AimTrainer::new(), field, config.seed),
            sky: Session::new(SkyDefender::new(config.sky_defender.variant), field, config.seed),
            movement: Session::new(MoveTrainer::new(), field, config.seed),
            crosshair: (field.width / 2.0, field.height / 2.0),
            playfield_area: Rect::default(),
            status: None,
            pose,
            clock: FrameClock::new(),
            latch: KeyLatch::new(LATCH_HOLD),
            release_events,
        }
    }

    pub fn on_tick(&mut self) {
        let dt = self.clock.tick();

        if !self.release_events {
            for key in self.latch.expired(Instant::now()) {
                self.movement.handle_input(InputEvent::KeyUp(key));
            }
        }
        if let Some(label) = self.pose.poll() {
            self.sky.handle_input(InputEvent::Pose(label));
        }

        // Only the visible game advances
        match self.current_tab {
            Tab::Home => {}
            Tab::Aim => self.aim.update(dt),
            Tab::Sky => self.sky.update(dt),
            Tab::Move => self.movement.update(dt),
        }
        self.drain_events();
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if key.kind == KeyEventKind::Release {
            if let Some(k) = movement_key(key.code) {
                self.latch.release(k);
                self.movement.handle_input(InputEvent::KeyUp(k));
            }
            return;
        }

        // Global keys
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                if matches!(self.current_tab, Tab::Home) {
                    self.should_quit = true;
                    return;
                }
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.prev_tab();
                } else {
                    self.next_tab();
                }
                return;
            }
            KeyCode::BackTab => {
                self.prev_tab();
                return;
            }
            KeyCode::Esc => {
                if !matches!(self.current_tab, Tab::Home) {
                    self.stop_current();
                    self.switch_to(Tab::Home);
                    return;
                }
            }
            _ => {}
        }

        if matches!(self.current_tab, Tab::Home) {
            self.on_home_key(key.code);
            return;
        }

        match key.code {
            KeyCode::Enter => {
                self.start_current();
                return;
            }
            KeyCode::Char('x') | KeyCode::Char('X') => {
                self.stop_current();
                return;
            }
            _ => {}
        }

        match self.current_tab {
            Tab::Home => {}
            Tab::Aim => self.on_aim_key(key.code),
            Tab::Sky => self.on_sky_key(key.code),
            Tab::Move => {
                if let Some(k) = movement_key(key.code) {
                    if !self.release_events {
                        self.latch.touch(k, Instant::now());
                    }
                    self.movement.handle_input(InputEvent::KeyDown(k));
                }
            }
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let field = self.current_field();
        let Some((x, y)) = cell_to_field(self.playfield_area, field, mouse.column, mouse.row) else {
            return;
        };
        match self.current_tab {
            Tab::Aim => {
                self.crosshair = (x, y);
                self.aim.handle_input(InputEvent::PointerDown { x, y });
            }
            Tab::Sky => self.sky.handle_input(InputEvent::PointerDown { x, y }),
            Tab::Home | Tab::Move => {}
        }
    }

    pub fn current_phase(&self) -> Option<Phase> {
        match self.current_tab {
            Tab::Home => None,
            Tab::Aim => Some(self.aim.phase()),
            Tab::Sky => Some(self.sky.phase()),
            Tab::Move => Some(self.movement.phase()),
        }
    }

    pub fn current_field(&self) -> Field {
        match self.current_tab {
            Tab::Sky => self.sky.field(),
            Tab::Move => self.movement.field(),
            Tab::Home | Tab::Aim => self.aim.field(),
        }
    }

    fn on_home_key(&mut self, code: KeyCode) {
        let count = Tab::all().len() - 1;
        match code {
            KeyCode::Char(c @ '1'..='3') => {
                self.selected_game = c as usize - '1' as usize;
                self.switch_to(Tab::for_game(self.selected_game));
            }
            KeyCode::Right | KeyCode::Down => self.selected_game = (self.selected_game + 1) % count,
            KeyCode::Left | KeyCode::Up => self.selected_game = (self.selected_game + count - 1) % count,
            KeyCode::Enter => self.switch_to(Tab::for_game(self.selected_game)),
            _ => {}
        }
    }

    fn on_aim_key(&mut self, code: KeyCode) {
        let field = self.aim.field();
        let (x, y) = &mut self.crosshair;
        match code {
            KeyCode::Left => *x = (*x - CROSSHAIR_STEP).max(0.0),
            KeyCode::Right => *x = (*x + CROSSHAIR_STEP).min(field.width),
            KeyCode::Up => *y = (*y - CROSSHAIR_STEP).max(0.0),
            KeyCode::Down => *y = (*y + CROSSHAIR_STEP).min(field.height),
            KeyCode::Char(' ') => {
                let (x, y) = self.crosshair;
                self.aim.handle_input(InputEvent::PointerDown { x, y });
            }
            _ => {}
        }
    }

    fn on_sky_key(&mut self, code: KeyCode) {
        if self.pose.feed_key(code) {
            return;
        }
        if code == KeyCode::Char(' ') {
            let player = self.sky.rules().player().rect;
            let (x, _) = player.center();
            self.sky.handle_input(InputEvent::PointerDown { x, y: 0.0 });
        }
    }

    fn start_current(&mut self) {
        if self.current_phase() == Some(Phase::Active) {
            return;
        }
        let result = match self.current_tab {
            Tab::Home => return,
            Tab::Aim => self.aim.start(),
            Tab::Sky => self.pose.open().and_then(|()| self.sky.start()),
            Tab::Move => {
                self.release_movement_keys();
                self.movement.start()
            }
        };
        if let Err(err) = result {
            self.report_start_failure(&err);
        }
        self.drain_events();
    }

    fn report_start_failure(&mut self, err: &SessionError) {
        let title = self.current_tab.game().map(|g| g.title()).unwrap_or("game");
        log::error!("{title} failed to start: {err}");
        if matches!(self.current_tab, Tab::Sky) {
            self.pose.close();
            self.sky.reset_idle();
        }
        self.status = Some(format!("Could not start {title}: {err}"));
    }

    fn stop_current(&mut self) {
        match self.current_tab {
            Tab::Home => {}
            Tab::Aim => self.aim.stop(),
            Tab::Sky => self.sky.stop(),
            Tab::Move => self.movement.stop(),
        }
        self.drain_events();
    }

    fn drain_events(&mut self) {
        let mut events = self.aim.take_events();
        events.extend(self.sky.take_events());
        events.extend(self.movement.take_events());
        for event in events {
            match event {
                GameEvent::Started(kind) => {
                    log::debug!("{} running", kind.title());
                    self.status = None;
                }
                GameEvent::LevelUp(level) => log::debug!("level {level} reached"),
                GameEvent::HealthChanged(health) => log::debug!("health now {health}"),
                GameEvent::ScoreChanged { .. } => {}
                GameEvent::Ended(summary) => {
                    if summary.kind == GameKind::SkyDefender {
                        self.pose.close();
                    }
                    self.status = Some(end_message(&summary));
                }
            }
        }
    }

    fn release_movement_keys(&mut self) {
        self.latch.clear();
        for key in HELD_KEYS {
            self.movement.handle_input(InputEvent::KeyUp(key));
        }
    }

    fn switch_to(&mut self, tab: Tab) {
        if matches!(self.current_tab, Tab::Move) && tab != Tab::Move {
            self.release_movement_keys();
        }
        self.status = None;
        self.current_tab = tab;
    }

    fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.switch_to(tabs[(idx + 1) % tabs.len()]);
    }

    fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.switch_to(tabs[(idx + tabs.len() - 1) % tabs.len()]);
    }
}

fn movement_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Char(c) => Key::from_name(&c.to_ascii_lowercase().to_string()),
        _ => None,
    }
}

/// Maps a terminal cell inside `area` to the centre of that cell in
/// playfield coordinates.
pub fn cell_to_field(area: Rect, field: Field, column: u16, row: u16) -> Option<(f32, f32)> {
    if area.width == 0 || area.height == 0 {
        return None;
    }
    if column < area.x || row < area.y || column >= area.x + area.width || row >= area.y + area.height {
        return None;
    }
    // Cell centres sit at odd half-steps; keep the division last.
    let half_steps = |offset: u16| (2 * u32::from(offset) + 1) as f32;
    let x = half_steps(column - area.x) * field.width / (2 * u32::from(area.width)) as f32;
    let y = half_steps(row - area.y) * field.height / (2 * u32::from(area.height)) as f32;
    Some((x, y))
}

fn end_message(summary: &Summary) -> String {
    let how = match summary.reason {
        EndReason::TimeUp => "Time's up",
        EndReason::PlayerDown => "Game over",
        EndReason::Stopped => "Stopped",
    };
    match summary.kind {
        GameKind::MovementTrainer => format!("{how}: survived {:.1}s", summary.elapsed_secs),
        _ => format!("{how}: scored {}", summary.score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::KeyboardPose;

    struct BrokenCamera;

    impl PoseSource for BrokenCamera {
        fn open(&mut self) -> Result<(), SessionError> {
            Err(SessionError::PoseUnavailable("no camera".into()))
        }
        fn close(&mut self) {}
        fn poll(&mut self) -> Option<String> {
            None
        }
    }

    // Opens once, then fails.
    struct FlakyCamera {
        opens: u32,
    }

    impl PoseSource for FlakyCamera {
        fn open(&mut self) -> Result<(), SessionError> {
            self.opens += 1;
            if self.opens > 1 {
                return Err(SessionError::PoseUnavailable("camera gone".into()));
            }
            Ok(())
        }
        fn close(&mut self) {}
        fn poll(&mut self) -> Option<String> {
            None
        }
    }

    fn app(release_events: bool) -> App {
        let config = Config { seed: Some(9), ..Config::default() };
        App::new(&config, Box::new(KeyboardPose::new()), release_events)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn tabs_cycle_both_ways() {
        let mut app = app(true);
        for expected in [Tab::Aim, Tab::Sky, Tab::Move, Tab::Home] {
            app.on_key(press(KeyCode::Tab));
            assert_eq!(app.current_tab, expected);
        }
        app.on_key(press(KeyCode::BackTab));
        assert_eq!(app.current_tab, Tab::Move);
    }

    #[test]
    fn home_digits_open_games_and_q_quits() {
        let mut app = app(true);
        app.on_key(press(KeyCode::Char('2')));
        assert_eq!(app.current_tab, Tab::Sky);
        app.on_key(press(KeyCode::Char('q')));
        assert!(!app.should_quit);
        app.on_key(press(KeyCode::Esc));
        assert_eq!(app.current_tab, Tab::Home);
        app.on_key(press(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn enter_starts_and_escape_stops() {
        let mut app = app(true);
        app.on_key(press(KeyCode::Char('1')));
        app.on_key(press(KeyCode::Enter));
        assert_eq!(app.aim.phase(), Phase::Active);
        app.on_key(press(KeyCode::Char('x')));
        assert_eq!(app.aim.phase(), Phase::Ended);
        assert_eq!(app.status.as_deref(), Some("Stopped: scored 0"));
        app.on_key(press(KeyCode::Enter));
        app.on_key(press(KeyCode::Esc));
        assert_eq!(app.aim.phase(), Phase::Ended);
        assert_eq!(app.current_tab, Tab::Home);
    }

    #[test]
    fn broken_pose_source_keeps_sky_idle() {
        let mut app = App::new(&Config::default(), Box::new(BrokenCamera), true);
        app.on_key(press(KeyCode::Char('2')));
        app.on_key(press(KeyCode::Enter));
        assert_eq!(app.sky.phase(), Phase::Idle);
        assert!(app.status.as_deref().unwrap_or_default().contains("no camera"));
    }

    #[test]
    fn failed_restart_returns_sky_to_idle_with_the_error() {
        let mut app = App::new(&Config::default(), Box::new(FlakyCamera { opens: 0 }), true);
        app.on_key(press(KeyCode::Char('2')));
        app.on_key(press(KeyCode::Enter));
        assert_eq!(app.sky.phase(), Phase::Active);
        app.on_key(press(KeyCode::Char('x')));
        assert_eq!(app.sky.phase(), Phase::Ended);
        app.on_key(press(KeyCode::Enter));
        assert_eq!(app.sky.phase(), Phase::Idle);
        assert!(app.sky.summary().is_none());
        assert!(app.status.as_deref().unwrap_or_default().contains("camera gone"));
    }

    #[test]
    fn unmapped_letters_leave_the_runner_alone() {
        let mut app = app(true);
        app.on_key(press(KeyCode::Char('3')));
        app.on_key(press(KeyCode::Enter));
        app.on_key(press(KeyCode::Char('f')));
        app.on_tick();
        assert_eq!(*app.movement.controls(), crate::games::input::Controls::default());
    }

    #[test]
    fn arrow_keys_steer_the_fighter_lane() {
        let mut app = app(true);
        app.on_key(press(KeyCode::Char('2')));
        app.on_key(press(KeyCode::Enter));
        app.on_key(press(KeyCode::Left));
        app.on_tick();
        assert_eq!(app.sky.controls().lane, crate::games::input::Lane::Left);
    }

    #[test]
    fn reported_releases_lift_movement_keys() {
        let mut app = app(true);
        app.on_key(press(KeyCode::Char('3')));
        app.on_key(press(KeyCode::Enter));
        app.on_key(press(KeyCode::Char('a')));
        assert!(app.movement.controls().left);
        app.on_key(KeyEvent::new_with_kind(KeyCode::Char('a'), KeyModifiers::NONE, KeyEventKind::Release));
        assert!(!app.movement.controls().left);
    }

    #[test]
    fn leaving_move_tab_releases_held_keys() {
        let mut app = app(false);
        app.on_key(press(KeyCode::Char('3')));
        app.on_key(press(KeyCode::Right));
        assert!(app.movement.controls().right);
        app.on_key(press(KeyCode::Tab));
        assert!(!app.movement.controls().right);
    }

    #[test]
    fn space_shoots_at_the_crosshair() {
        let mut app = app(true);
        app.on_key(press(KeyCode::Char('1')));
        app.on_key(press(KeyCode::Enter));
        let target = *app.aim.rules().target().unwrap();
        app.crosshair = (target.x, target.y);
        app.on_key(press(KeyCode::Char(' ')));
        app.on_tick();
        assert_eq!(app.aim.score(), 1);
    }

    #[test]
    fn crosshair_stays_on_the_field() {
        let mut app = app(true);
        app.on_key(press(KeyCode::Char('1')));
        for _ in 0..100 {
            app.on_key(press(KeyCode::Left));
            app.on_key(press(KeyCode::Up));
        }
        assert_eq!(app.crosshair, (0.0, 0.0));
    }

    #[test]
    fn cells_map_to_field_coordinates() {
        let area = Rect::new(10, 5, 60, 20);
        let field = Field::new(600.0, 400.0);
        assert_eq!(cell_to_field(area, field, 10, 5), Some((5.0, 10.0)));
        assert_eq!(cell_to_field(area, field, 69, 24), Some((595.0, 390.0)));
        assert_eq!(cell_to_field(area, field, 70, 10), None);
        assert_eq!(cell_to_field(area, field, 9, 10), None);
        assert_eq!(cell_to_field(Rect::default(), field, 0, 0), None);
        assert_eq!(cell_to_field(Rect::new(0, 0, 7, 3), field, 3, 1), Some((300.0, 200.0)));
    }
}
