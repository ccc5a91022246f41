use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::game::Direction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Steer(Direction),
    /// Debug binding: drop the current food so a new one spawns
    ClearFood,
    Restart,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Steer(Direction::Up),
            KeyCode::Down => KeyAction::Steer(Direction::Down),
            KeyCode::Left => KeyAction::Steer(Direction::Left),
            KeyCode::Right => KeyAction::Steer(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Steer(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Steer(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Steer(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Steer(Direction::Right),

            // Controls
            KeyCode::Char(' ') => KeyAction::ClearFood,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,

            _ => KeyAction::None,
        }
    }

    /// Translate a batch of terminal events, keeping key presses only
    pub fn actions<'a, I>(&'a self, events: I) -> impl Iterator<Item = KeyAction> + 'a
    where
        I: IntoIterator<Item = Event>,
        I::IntoIter: 'a,
    {
        events.into_iter().filter_map(move |event| match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                match self.handle_key_event(key) {
                    KeyAction::None => None,
                    action => Some(action),
                }
            }
            _ => None,
        })
    }

    /// Actions for every event already queued by the terminal
    ///
    /// Never blocks: the sequence ends as soon as the queue is empty or the
    /// terminal reports an error.
    pub fn drain_terminal(&self) -> impl Iterator<Item = KeyAction> + '_ {
        let pending = std::iter::from_fn(|| match event::poll(Duration::ZERO) {
            Ok(true) => event::read().ok(),
            _ => None,
        });
        self.actions(pending)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
