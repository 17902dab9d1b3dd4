//! Input seam and its two implementations: a crossterm-backed keyboard reader
//! for interactive play, and a frame-scripted input for headless runs.

use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Game actions the simulation samples each tick.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Key {
    Left,
    Right,
    Thrust,
    Fire,
}

/// Edge-triggered devices are sampled through this level-triggered view.
pub trait Input {
    fn is_down(&self, key: Key) -> bool;
}

// Terminals report key repeats, not releases, so a key counts as held for a
// short window after its last event. Must comfortably exceed the typical
// repeat delay or held keys stutter.
const HOLD_WINDOW: Duration = Duration::from_millis(200);

/// Keyboard state reconstructed from the crossterm event stream.
pub struct KeyboardInput {
    last_seen: HashMap<Key, Instant>,
    quit: bool,
}

impl KeyboardInput {
    pub fn new() -> Self {
        KeyboardInput {
            last_seen: HashMap::new(),
            quit: false,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Drains pending terminal events, waiting up to `budget` for the first
    /// one. The budget doubles as the frame pacing sleep.
    pub fn pump(&mut self, budget: Duration) -> io::Result<()> {
        let mut wait = budget;
        while event::poll(wait)? {
            wait = Duration::ZERO;
            if let Event::Key(ev) = event::read()? {
                self.take(ev);
            }
        }
        Ok(())
    }

    fn take(&mut self, ev: KeyEvent) {
        if ev.kind == KeyEventKind::Release {
            return;
        }
        match ev.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if ev.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true;
            }
            _ => {}
        }
        if let Some(key) = map_key(ev.code) {
            self.last_seen.insert(key, Instant::now());
        }
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left | KeyCode::Char('a') => Some(Key::Left),
        KeyCode::Right | KeyCode::Char('d') => Some(Key::Right),
        KeyCode::Up | KeyCode::Char('w') => Some(Key::Thrust),
        KeyCode::Char(' ') => Some(Key::Fire),
        _ => None,
    }
}

impl Input for KeyboardInput {
    fn is_down(&self, key: Key) -> bool {
        self.last_seen
            .get(&key)
            .is_some_and(|t| t.elapsed() < HOLD_WINDOW)
    }
}

/// Frame-indexed input script for headless runs: frames absent from the
/// script hold no keys.
pub struct ScriptedInput {
    script: HashMap<u64, Vec<Key>>,
    held: Vec<Key>,
}

impl ScriptedInput {
    pub fn new(script: HashMap<u64, Vec<Key>>) -> Self {
        ScriptedInput {
            script,
            held: Vec::new(),
        }
    }

    pub fn advance(&mut self, frame: u64) {
        self.held = self.script.get(&frame).cloned().unwrap_or_default();
    }
}

impl Input for ScriptedInput {
    fn is_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}
