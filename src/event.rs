use crossterm::event::{Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyModifiers};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::action::Action;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
    Tick,
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventReader {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let event_tx = tx.clone();
        tokio::spawn(async move {
            let mut reader = EventStream::new();
            while let Some(Ok(event)) = reader.next().await {
                let mapped = match event {
                    CrosstermEvent::Key(key) => Event::Key(key),
                    CrosstermEvent::Resize(_, _) => Event::Resize,
                    _ => continue,
                };
                if event_tx.send(mapped).is_err() {
                    break;
                }
            }
        });

        let tick_tx = tx;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);
            loop {
                interval.tick().await;
                if tick_tx.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Non-blocking: returns a pending event if one is available, or None.
    pub fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

/// Context needed to map a key event to an action.
pub struct KeyContext {
    pub editing: bool,
}

/// Map a key event to an action based on current app context.
pub fn map_key_to_action(key: KeyEvent, ctx: &KeyContext) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Ctrl-C always quits, even while editing
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if ctx.editing {
        return match key.code {
            KeyCode::Enter => Some(Action::ConfirmEdit),
            KeyCode::Esc => Some(Action::CancelEdit),
            KeyCode::Backspace => Some(Action::EditBackspace),
            KeyCode::Char('w') if ctrl => Some(Action::EditDeleteWord),
            KeyCode::Char('a') if ctrl => Some(Action::EditHome),
            KeyCode::Char('e') if ctrl => Some(Action::EditEnd),
            KeyCode::Left => Some(Action::EditLeft),
            KeyCode::Right => Some(Action::EditRight),
            KeyCode::Home => Some(Action::EditHome),
            KeyCode::End => Some(Action::EditEnd),
            KeyCode::Char(c) if !ctrl => Some(Action::EditChar(c)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Tab => Some(Action::FocusNextField),
        KeyCode::BackTab => Some(Action::FocusPrevField),
        KeyCode::Enter | KeyCode::Char('e') => Some(Action::StartEdit),
        KeyCode::Char('t') => Some(Action::SetToday),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('y') => Some(Action::CopyLink),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollDown),
        KeyCode::PageUp => Some(Action::ScrollPageUp),
        KeyCode::PageDown => Some(Action::ScrollPageDown),
        KeyCode::Char('g') => Some(Action::ScrollToTop),
        KeyCode::Char('G') => Some(Action::ScrollToBottom),
        _ => None,
    }
}
