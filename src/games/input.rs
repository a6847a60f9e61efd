//! Input model shared by every ruleset.
//!
//! Keys are level-triggered: only the latest pressed/released state matters.
//! Pointer presses are discrete and queued until the next tick.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Jump,
    Crouch,
}

impl Key {
    /// Accepts the browser-style key names (`w`, `ArrowUp`, `" "`, ...).
    pub fn from_name(name: &str) -> Option<Key> {
        match name.to_ascii_lowercase().as_str() {
            "w" | "arrowup" | "up" => Some(Key::Up),
            "s" | "arrowdown" | "down" => Some(Key::Down),
            "a" | "arrowleft" | "left" => Some(Key::Left),
            "d" | "arrowright" | "right" => Some(Key::Right),
            " " | "space" => Some(Key::Jump),
            "c" => Some(Key::Crouch),
            _ => None,
        }
    }
}

/// Discrete steering lane picked by the pose classifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lane {
    Left,
    #[default]
    Center,
    Right,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Center, Lane::Right];

    /// Parses a classifier label; Korean aliases are accepted alongside English.
    pub fn from_label(label: &str) -> Option<Lane> {
        match label.trim() {
            "왼쪽" => return Some(Lane::Left),
            "오른쪽" => return Some(Lane::Right),
            "정면" | "가운데" => return Some(Lane::Center),
            _ => {}
        }
        match label.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Lane::Left),
            "right" => Some(Lane::Right),
            "center" | "centre" => Some(Lane::Center),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Lane::Left => "Left",
            Lane::Center => "Center",
            Lane::Right => "Right",
        }
    }

    /// Lane centre as a fraction of the playfield width.
    pub fn fraction(&self) -> f32 {
        match self {
            Lane::Left => 0.25,
            Lane::Center => 0.5,
            Lane::Right => 0.75,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerDown { x: f32, y: f32 },
    Pose(String),
}

/// Held-key flags plus the latest steering lane, polled by rulesets each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Controls {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub crouch: bool,
    pub lane: Lane,
}

impl Controls {
    pub fn set(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Up => self.up = pressed,
            Key::Down => self.down = pressed,
            Key::Left => self.left = pressed,
            Key::Right => self.right = pressed,
            Key::Jump => self.jump = pressed,
            Key::Crouch => self.crouch = pressed,
        }
    }

    pub fn any_direction(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    /// Releases held keys but keeps the steering lane.
    pub fn release_all(&mut self) {
        *self = Controls { lane: self.lane, ..Controls::default() };
    }
}
