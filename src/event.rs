use std::collections::HashMap;
use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent, MouseEvent, MouseEventKind};

use crate::games::input::Key;

/// Longest step handed to a session; longer gaps (a stalled terminal) are cut.
pub const MAX_FRAME: Duration = Duration::from_millis(250);

pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Tick,
}

pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_rate = Duration::from_millis(tick_rate_ms.max(1));

        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate.saturating_sub(last_tick.elapsed());
                if event::poll(timeout).unwrap_or(false) {
                    let forwarded = match event::read() {
                        Ok(event::Event::Key(key)) => Some(Event::Key(key)),
                        Ok(event::Event::Mouse(mouse))
                            if matches!(mouse.kind, MouseEventKind::Down(_)) =>
                        {
                            Some(Event::Mouse(mouse))
                        }
                        _ => None,
                    };
                    if let Some(ev) = forwarded {
                        if tx.send(ev).is_err() {
                            return;
                        }
                    }
                }
                if last_tick.elapsed() >= tick_rate {
                    last_tick = Instant::now();
                    if tx.send(Event::Tick).is_err() {
                        return;
                    }
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> io::Result<Event> {
        self.rx
            .recv()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

/// Wall-clock delta between ticks.
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: Instant::now() }
    }

    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let dt = self.since(now);
        self.last = now;
        dt
    }

    fn since(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last).min(MAX_FRAME)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Synthesizes key releases on terminals that only report presses: a key
/// counts as held until its auto-repeat stops arriving.
pub struct KeyLatch {
    hold: Duration,
    held: HashMap<Key, Instant>,
}

impl KeyLatch {
    pub fn new(hold: Duration) -> Self {
        Self { hold, held: HashMap::new() }
    }

    pub fn touch(&mut self, key: Key, now: Instant) {
        self.held.insert(key, now);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Removes and returns the keys whose last press is older than the hold time.
    pub fn expired(&mut self, now: Instant) -> Vec<Key> {
        let hold = self.hold;
        let mut gone: Vec<Key> = self
            .held
            .iter()
            .filter(|(_, &at)| now.saturating_duration_since(at) >= hold)
            .map(|(&k, _)| k)
            .collect();
        gone.sort_by_key(|k| *k as u8);
        for k in &gone {
            self.held.remove(k);
        }
        gone
    }
}
