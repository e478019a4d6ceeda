//! Input handling for the Innersight TUI.
//!
//! A blocking reader thread forwards crossterm events over a bounded channel;
//! the frame loop drains it with [`handle_events`], mapping keys to [`Action`]s
//! for the current screen.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;
use tracing::debug;

use innersight_engine::{App, Screen};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

/// Columns moved per fine-scroll key press.
pub const FINE_SCROLL_STEP: f32 = 2.0;

enum InputMsg {
    Event(Event),
    Error(String),
}

pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Unblock a reader waiting on channel capacity before asking it to stop.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// A user intent, resolved from a key press on a particular screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    /// Move the carousel one item left (`-1`) or right (`+1`).
    Nudge(isize),
    /// Continuous carousel scroll in columns.
    FineScroll(f32),
    ConfirmSignal,
    CursorMove(isize),
    /// Direct pick by zero-based list position.
    PickModulator(usize),
    ConfirmModulator,
    Back,
    BeginAgain,
}

/// Map a key to the action it triggers on `screen`, if any.
///
/// Only presses and auto-repeats count; releases are ignored.
#[must_use]
pub fn map_key(screen: Screen, key: KeyEvent) -> Option<Action> {
    if matches!(key.kind, KeyEventKind::Release) {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }
    if key.code == KeyCode::Char('q') {
        return Some(Action::Quit);
    }

    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match screen {
        Screen::SignalSelection => match key.code {
            KeyCode::Left if shift => Some(Action::FineScroll(-FINE_SCROLL_STEP)),
            KeyCode::Right if shift => Some(Action::FineScroll(FINE_SCROLL_STEP)),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::Nudge(-1)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::Nudge(1)),
            KeyCode::Char('H') => Some(Action::FineScroll(-FINE_SCROLL_STEP)),
            KeyCode::Char('L') => Some(Action::FineScroll(FINE_SCROLL_STEP)),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ConfirmSignal),
            _ => None,
        },
        Screen::ModulatorSelection => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::CursorMove(-1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::CursorMove(1)),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ConfirmModulator),
            KeyCode::Char(c @ '1'..='9') => {
                c.to_digit(10).map(|d| Action::PickModulator(d as usize - 1))
            }
            KeyCode::Esc | KeyCode::Backspace => Some(Action::Back),
            _ => None,
        },
        Screen::Loading => None,
        Screen::InsightCard => match key.code {
            KeyCode::Enter | KeyCode::Char('r') => Some(Action::BeginAgain),
            KeyCode::Esc | KeyCode::Backspace => Some(Action::Back),
            _ => None,
        },
    }
}

pub fn apply_action(app: &mut App, action: Action) {
    match action {
        Action::Quit => app.request_quit(),
        Action::Nudge(direction) => app.nudge_carousel(direction),
        Action::FineScroll(delta) => app.scroll_carousel(delta),
        Action::ConfirmSignal => app.confirm_signal(),
        Action::CursorMove(delta) => app.move_modulator_cursor(delta),
        Action::PickModulator(index) => app.select_modulator_at(index),
        Action::ConfirmModulator => app.confirm_modulator(),
        Action::Back => app.go_back(),
        Action::BeginAgain => app.begin_again(),
    }
}

/// Drain pending input for this frame. Returns `true` when the app should quit.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };

        if let Event::Key(key) = ev
            && let Some(action) = map_key(app.screen(), key)
        {
            debug!(?action, screen = ?app.screen(), "Input action");
            apply_action(app, action);
            if app.should_quit() {
                return Ok(true);
            }
        }

        processed += 1;
    }
    Ok(app.should_quit())
}
