use anyhow::Result;
use crossterm::{
    event,
    event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
};
use log::*;
use std::{sync::mpsc, thread, time::Duration};

/// Specify terminal event poll rate in milliseconds.
///
const TICK_RATE_IN_MS: u64 = 60;

/// Specify different terminal event types.
///
#[derive(Debug)]
pub enum Event<I> {
    Input(I),
    Tick,
}

/// What the form view should do in response to a key.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextField,
    PreviousField,
    Input(char),
    Backspace,
    Submit,
    Tick,
}

/// Map a key press to a form action.
///
pub fn action(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key {
        KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        }
        | KeyEvent {
            code: KeyCode::Esc, ..
        } => Some(Action::Quit),
        KeyEvent {
            code: KeyCode::Tab,
            ..
        }
        | KeyEvent {
            code: KeyCode::Down,
            ..
        } => Some(Action::NextField),
        KeyEvent {
            code: KeyCode::BackTab,
            ..
        }
        | KeyEvent {
            code: KeyCode::Up, ..
        } => Some(Action::PreviousField),
        KeyEvent {
            code: KeyCode::Enter,
            ..
        } => Some(Action::Submit),
        KeyEvent {
            code: KeyCode::Backspace,
            ..
        } => Some(Action::Backspace),
        KeyEvent {
            code: KeyCode::Char(c),
            modifiers,
            ..
        } if modifiers == KeyModifiers::NONE || modifiers == KeyModifiers::SHIFT => {
            Some(Action::Input(c))
        }
        _ => None,
    }
}

/// Specify struct for managing terminal events channel.
///
pub struct Handler {
    rx: mpsc::Receiver<Event<KeyEvent>>,
    _tx: mpsc::Sender<Event<KeyEvent>>,
}

impl Handler {
    /// Return new instance after spawning new input polling thread.
    ///
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let tx_clone = tx.clone();
        thread::spawn(move || loop {
            let tick_rate = Duration::from_millis(TICK_RATE_IN_MS);
            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(CrosstermEvent::Key(key)) => {
                        if tx_clone.send(Event::Input(key)).is_err() {
                            break;
                        }
                    }
                    Ok(_) => (),
                    Err(e) => error!("Failed to read terminal event: {}", e),
                },
                Ok(false) => (),
                Err(e) => error!("Failed to poll terminal events: {}", e),
            }
            if tx_clone.send(Event::Tick).is_err() {
                break;
            }
        });
        Handler { rx, _tx: tx }
    }

    /// Receive the next terminal event and translate it into an action.
    /// Keys with no meaning for the form come back as ticks.
    ///
    pub fn next(&self) -> Result<Action> {
        match self.rx.recv()? {
            Event::Input(key) => {
                let action = action(key).unwrap_or(Action::Tick);
                if action != Action::Tick {
                    trace!("Processing terminal event '{:?}' as {:?}", key, action);
                }
                Ok(action)
            }
            Event::Tick => Ok(Action::Tick),
        }
    }
}
