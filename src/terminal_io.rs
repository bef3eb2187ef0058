use std::collections::HashMap;
use std::sync::mpsc::Receiver;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::debug;

use crate::constants::HOLD_WINDOW_TICKS;
use crate::driver::{DriverMsg, InputSource};
use crate::game::{InputEvent, Key};

fn held_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Key::Thrust),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Key::Brake),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Key::RotateRight),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Key::RotateLeft),
        KeyCode::Char('e') | KeyCode::Char('E') => Some(Key::Stop),
        _ => None,
    }
}

/// Map one terminal event to what the driver understands. Unbound keys map to nothing.
pub fn translate(event: &Event) -> Option<DriverMsg> {
    let Event::Key(KeyEvent { code, kind, modifiers, .. }) = event else {
        return None;
    };
    if *kind == KeyEventKind::Release {
        return held_key(*code).map(|_| DriverMsg::Input(InputEvent::KeyUp));
    }
    if let Some(key) = held_key(*code) {
        return Some(DriverMsg::Input(InputEvent::KeyDown(key)));
    }
    if *kind == KeyEventKind::Repeat {
        return None;
    }
    match code {
        KeyCode::Enter | KeyCode::Char(' ') => Some(DriverMsg::Input(InputEvent::Fire)),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(DriverMsg::Quit),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(DriverMsg::Quit),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(DriverMsg::Restart),
        _ => None,
    }
}

// --- Live input from the reader thread ---
pub struct ChannelInput {
    rx: Receiver<Event>,
    release_events: bool,
    held_seen_at: Option<u64>,
}

impl ChannelInput {
    /// `release_events` is whether the terminal reports key releases. Without them a
    /// held key is dropped after `HOLD_WINDOW_TICKS` ticks with no press or repeat.
    pub fn new(rx: Receiver<Event>, release_events: bool) -> Self {
        ChannelInput { rx, release_events, held_seen_at: None }
    }
}

impl InputSource for ChannelInput {
    fn poll(&mut self, tick: u64) -> Vec<DriverMsg> {
        let mut messages = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            let Some(msg) = translate(&event) else { continue };
            match msg {
                DriverMsg::Input(InputEvent::KeyDown(_)) => self.held_seen_at = Some(tick),
                DriverMsg::Input(InputEvent::KeyUp) => self.held_seen_at = None,
                _ => {}
            }
            messages.push(msg);
        }

        if !self.release_events {
            if let Some(seen) = self.held_seen_at {
                if tick.saturating_sub(seen) > HOLD_WINDOW_TICKS {
                    debug!("Held key expired at tick {}", tick);
                    self.held_seen_at = None;
                    messages.push(DriverMsg::Input(InputEvent::KeyUp));
                }
            }
        }
        messages
    }
}

// --- SimulatedInput for debugging ---
pub struct SimulatedInput {
    events: HashMap<u64, Vec<DriverMsg>>,
}

impl SimulatedInput {
    pub fn new(events: HashMap<u64, Vec<DriverMsg>>) -> Self {
        SimulatedInput { events }
    }

    /// A short scripted flight: thrust, turn, fire a few shots, stop.
    pub fn demo_script() -> Self {
        let mut sim_events = HashMap::new();
        sim_events.insert(1, vec![DriverMsg::Input(InputEvent::KeyDown(Key::Thrust))]);
        sim_events.insert(6, vec![DriverMsg::Input(InputEvent::KeyDown(Key::RotateRight))]);
        sim_events.insert(12, vec![DriverMsg::Input(InputEvent::KeyUp), DriverMsg::Input(InputEvent::Fire)]);
        sim_events.insert(16, vec![DriverMsg::Input(InputEvent::Fire)]);
        sim_events.insert(20, vec![DriverMsg::Input(InputEvent::KeyDown(Key::RotateLeft))]);
        sim_events.insert(26, vec![DriverMsg::Input(InputEvent::KeyUp), DriverMsg::Input(InputEvent::Fire)]);
        sim_events.insert(30, vec![DriverMsg::Input(InputEvent::KeyDown(Key::Stop))]);
        sim_events.insert(31, vec![DriverMsg::Input(InputEvent::KeyUp)]);
        SimulatedInput::new(sim_events)
    }
}

impl InputSource for SimulatedInput {
    fn poll(&mut self, tick: u64) -> Vec<DriverMsg> {
        self.events.remove(&tick).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn release(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release))
    }

    #[test]
    fn bindings_map_to_commands() {
        assert_eq!(translate(&press(KeyCode::Char('w'))), Some(DriverMsg::Input(InputEvent::KeyDown(Key::Thrust))));
        assert_eq!(translate(&press(KeyCode::Left)), Some(DriverMsg::Input(InputEvent::KeyDown(Key::RotateLeft))));
        assert_eq!(translate(&press(KeyCode::Char('e'))), Some(DriverMsg::Input(InputEvent::KeyDown(Key::Stop))));
        assert_eq!(translate(&press(KeyCode::Enter)), Some(DriverMsg::Input(InputEvent::Fire)));
        assert_eq!(translate(&press(KeyCode::Char('q'))), Some(DriverMsg::Quit));
        assert_eq!(translate(&press(KeyCode::Char('r'))), Some(DriverMsg::Restart));
        assert_eq!(translate(&press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let event = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(translate(&event), Some(DriverMsg::Quit));
    }

    #[test]
    fn release_of_held_key_lets_go() {
        assert_eq!(translate(&release(KeyCode::Char('d'))), Some(DriverMsg::Input(InputEvent::KeyUp)));
        assert_eq!(translate(&release(KeyCode::Enter)), None);
    }

    #[test]
    fn held_key_expires_without_repeats() {
        let (tx, rx) = mpsc::channel();
        let mut input = ChannelInput::new(rx, false);
        tx.send(press(KeyCode::Up)).unwrap();
        assert_eq!(input.poll(0), vec![DriverMsg::Input(InputEvent::KeyDown(Key::Thrust))]);
        assert!(input.poll(HOLD_WINDOW_TICKS).is_empty());
        assert_eq!(input.poll(HOLD_WINDOW_TICKS + 1), vec![DriverMsg::Input(InputEvent::KeyUp)]);
        assert!(input.poll(HOLD_WINDOW_TICKS + 2).is_empty());
    }

    #[test]
    fn held_key_stays_when_releases_are_reported() {
        let (tx, rx) = mpsc::channel();
        let mut input = ChannelInput::new(rx, true);
        tx.send(press(KeyCode::Up)).unwrap();
        input.poll(0);
        assert!(input.poll(HOLD_WINDOW_TICKS * 4).is_empty());
    }

    #[test]
    fn simulated_input_replays_by_tick() {
        let mut input = SimulatedInput::demo_script();
        assert!(input.poll(0).is_empty());
        assert_eq!(input.poll(1), vec![DriverMsg::Input(InputEvent::KeyDown(Key::Thrust))]);
        assert!(input.poll(1).is_empty());
    }
}
