//! Pose classifier seam. A real classifier delivers stabilized labels at its
//! own pace; the terminal build stands one in with the arrow keys.

use crossterm::event::KeyCode;

use crate::games::input::Lane;
use crate::games::SessionError;

pub trait PoseSource {
    /// Prepares the source; a failure keeps the game from starting.
    fn open(&mut self) -> Result<(), SessionError>;

    fn close(&mut self);

    /// Latest label since the previous poll, if any.
    fn poll(&mut self) -> Option<String>;

    /// Offers a terminal key to sources that are driven by the keyboard.
    fn feed_key(&mut self, _code: KeyCode) -> bool {
        false
    }
}

#[derive(Debug, Default)]
pub struct KeyboardPose {
    open: bool,
    pending: Option<String>,
}

impl KeyboardPose {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl PoseSource for KeyboardPose {
    fn open(&mut self) -> Result<(), SessionError> {
        self.open = true;
        self.pending = Some(Lane::Center.label().to_string());
        log::debug!("keyboard pose source opened");
        Ok(())
    }

    fn close(&mut self) {
        self.open = false;
        self.pending = None;
    }

    fn poll(&mut self) -> Option<String> {
        self.pending.take()
    }

    fn feed_key(&mut self, code: KeyCode) -> bool {
        let lane = match code {
            KeyCode::Left | KeyCode::Char('a') => Lane::Left,
            KeyCode::Right | KeyCode::Char('d') => Lane::Right,
            KeyCode::Down | KeyCode::Up | KeyCode::Char('s') | KeyCode::Char('w') => Lane::Center,
            _ => return false,
        };
        if self.open {
            self.pending = Some(lane.label().to_string());
        }
        true
    }
}
