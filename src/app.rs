use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::action::Action;
use crate::async_compare::{CompareRequest, CompareWorker};
use crate::clipboard::Clipboard;
use crate::compare::ComparisonService;
use crate::components::action_hud::ActionHud;
use crate::components::context_bar::ContextBar;
use crate::components::date_bar::DateBar;
use crate::components::resource_table::ResourceTable;
use crate::components::status_line::StatusLine;
use crate::components::Component;
use crate::event::{map_key_to_action, Event, EventReader, KeyContext};
use crate::selection::DateField;
use crate::state::AppState;
use crate::tui::Tui;
use crate::view::ComparisonView;

/// Tick interval of the event loop.
const TICK: Duration = Duration::from_millis(50);
/// ~3 seconds at the tick rate.
const NOTICE_TICKS: u32 = 60;

pub struct App {
    state: AppState,
    worker: CompareWorker,
    clipboard: Box<dyn Clipboard>,
    status_clear_countdown: u32,
}

impl App {
    /// Wire the view to a worker and send the view's initial request.
    pub fn new(
        view: ComparisonView,
        initial: CompareRequest,
        service: Arc<dyn ComparisonService>,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        let worker = CompareWorker::new(service);
        worker.request(initial);
        let mut app = Self {
            state: AppState::new(view),
            worker,
            clipboard,
            status_clear_countdown: 0,
        };
        let invalid: Vec<&str> = [DateField::From, DateField::To]
            .into_iter()
            .filter_map(|f| app.state.view.field(f).invalid.as_deref())
            .collect();
        if !invalid.is_empty() {
            let msg = format!("Ignored invalid date in link: {}", invalid.join(", "));
            app.set_status(msg, true);
        }
        app
    }

    pub async fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut events = EventReader::new(TICK);

        let context_bar = ContextBar;
        let date_bar = DateBar;
        let resource_table = ResourceTable;
        let status_line = StatusLine;
        let action_hud = ActionHud;

        loop {
            self.poll_results();

            // context bar + date bar + status + hud + table borders/header
            let term_size = terminal.size()?;
            self.state.table_height = term_size.height.saturating_sub(11).max(1) as usize;

            terminal.draw(|frame| {
                let outer = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(1),
                        Constraint::Length(4),
                        Constraint::Min(3),
                        Constraint::Length(1),
                        Constraint::Length(1),
                    ])
                    .split(frame.area());

                context_bar.render(frame, outer[0], &self.state);
                date_bar.render(frame, outer[1], &self.state);
                resource_table.render(frame, outer[2], &self.state);
                status_line.render(frame, outer[3], &self.state);
                action_hud.render(frame, outer[4], &self.state);
            })?;

            // Wait for at least one event, then drain all pending events
            // to avoid input lag from buffered key events.
            let first = events.next().await;
            let mut pending = Vec::new();
            if let Some(ev) = first {
                pending.push(ev);
            }
            while let Some(ev) = events.try_next() {
                pending.push(ev);
            }

            for event in pending {
                let ctx = KeyContext {
                    editing: self.state.editing(),
                };
                let action = match event {
                    Event::Key(key) => map_key_to_action(key, &ctx),
                    Event::Resize => Some(Action::Resize),
                    Event::Tick => Some(Action::Tick),
                };
                if let Some(action) = action {
                    self.update(action);
                }
            }

            if self.state.should_quit {
                break;
            }
        }

        info!("quit");
        Ok(())
    }

    fn poll_results(&mut self) {
        while let Some(response) = self.worker.try_recv() {
            self.state.view.apply_response(response);
        }
    }

    fn send(&mut self, request: CompareRequest) {
        self.worker.request(request);
    }

    fn update(&mut self, action: Action) {
        let focus = self.state.focus;
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::Resize => {}
            Action::Tick => {
                if self.status_clear_countdown > 0 {
                    self.status_clear_countdown -= 1;
                    if self.status_clear_countdown == 0 {
                        self.state.status_message = None;
                    }
                }
            }

            Action::FocusNextField | Action::FocusPrevField => {
                self.state.focus = focus.other();
            }
            Action::SetToday => {
                let request = self.state.view.set_today(focus);
                self.send(request);
            }

            Action::StartEdit => self.state.view.field_mut(focus).begin_edit(),
            Action::CancelEdit => self.state.view.field_mut(focus).cancel_edit(),
            Action::ConfirmEdit => {
                let raw = self.state.view.field_mut(focus).end_edit();
                match self.state.view.set_date(focus, &raw) {
                    Ok(request) => self.send(request),
                    Err(e) => self.set_status(e.to_string(), true),
                }
            }
            Action::EditChar(c) => self.state.view.field_mut(focus).buffer.insert_char(c),
            Action::EditBackspace => self.state.view.field_mut(focus).buffer.delete_back(),
            Action::EditDeleteWord => self.state.view.field_mut(focus).buffer.delete_word_back(),
            Action::EditLeft => self.state.view.field_mut(focus).buffer.move_left(),
            Action::EditRight => self.state.view.field_mut(focus).buffer.move_right(),
            Action::EditHome => self.state.view.field_mut(focus).buffer.move_home(),
            Action::EditEnd => self.state.view.field_mut(focus).buffer.move_end(),

            Action::Refresh => {
                let request = self.state.view.refresh_comparison();
                self.send(request);
            }
            Action::CopyLink => match self.state.view.copy_shareable_link(self.clipboard.as_mut()) {
                Ok(link) => self.set_status(format!("Copied {link}"), false),
                Err(e) => {
                    warn!(error = %e, "clipboard write failed");
                    self.set_status(format!("Clipboard error: {e}"), true);
                }
            },

            Action::ScrollUp => self.state.view.comparison.scroll_by(-1),
            Action::ScrollDown => self.state.view.comparison.scroll_by(1),
            Action::ScrollPageUp => {
                let page = self.page();
                self.state.view.comparison.scroll_by(-page);
            }
            Action::ScrollPageDown => {
                let page = self.page();
                self.state.view.comparison.scroll_by(page);
            }
            Action::ScrollToTop => self.state.view.comparison.scroll_to_top(),
            Action::ScrollToBottom => self.state.view.comparison.scroll_to_bottom(),
        }
    }

    /// Rows per page; each table row is at least two lines tall.
    fn page(&self) -> isize {
        (self.state.table_height / 2).max(1) as isize
    }

    fn set_status(&mut self, msg: String, is_error: bool) {
        self.state.status_message = Some((msg, is_error));
        self.status_clear_countdown = NOTICE_TICKS;
    }
}
