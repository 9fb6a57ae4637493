//! Application core: event loop, global keys, overlays and the status bar.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::CustomersScreen;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::centered_rect;

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

pub struct App {
    screen: CustomersScreen,
    /// Shown in the status bar.
    endpoint: String,
    running: bool,
    help_visible: bool,
    notification: Option<(Notification, Instant)>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(screen: CustomersScreen, endpoint: String) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            screen,
            endpoint,
            running: true,
            help_visible: false,
            notification: None,
            action_tx,
            action_rx,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        let (width, height) = tui.size().unwrap_or((80, 24));
        debug!(width, height, "terminal size");
        self.screen.init(self.action_tx.clone())?;
        debug!(screen = self.screen.id(), "screen initialized");

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(endpoint = %self.endpoint, "event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;
                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        info!("event loop ended");
        Ok(())
    }

    /// Global keys first, unless the screen is taking text input.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?' | 'q') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        if !self.screen.captures_input() {
            match key.code {
                KeyCode::Char('q') => return Ok(Some(Action::Quit)),
                KeyCode::Char('?') => return Ok(Some(Action::ToggleHelp)),
                _ => {}
            }
        }

        self.screen.handle_key_event(key)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::Resize(w, h) => debug!(width = w, height = h, "terminal resized"),
            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::Notify(n) => {
                debug!(message = %n.message, "notification");
                self.notification = Some((n.clone(), Instant::now()));
            }
            Action::Render => {}
            other => {
                if let Action::Tick = other {
                    if self
                        .notification
                        .as_ref()
                        .is_some_and(|(_, shown)| shown.elapsed() > NOTIFICATION_TTL)
                    {
                        self.notification = None;
                    }
                }
                if let Some(follow_up) = self.screen.update(other)? {
                    self.action_tx.send(follow_up)?;
                }
            }
        }
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [content, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        self.screen.render(frame, content);
        self.render_status_bar(frame, status);

        if let Some((ref note, _)) = self.notification {
            render_notification(frame, content, note);
        }
        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mode = self.screen.mode();
        let mode_style = if mode.is_busy() {
            Style::default().fg(theme::ELECTRIC_YELLOW)
        } else {
            Style::default().fg(theme::SUCCESS_GREEN)
        };
        let line = Line::from(vec![
            Span::styled(format!(" {} ", mode.label()), mode_style),
            Span::styled(
                format!("│ {} customers │ {} ", self.screen.record_count(), self.endpoint),
                theme::table_row(),
            ),
            Span::styled("│ ? help  q quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Toast in the bottom-right corner of `area`.
fn render_notification(frame: &mut Frame, area: Rect, note: &Notification) {
    let msg_len = u16::try_from(note.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
    let height = 3u16.min(area.height);
    let x = area.x + area.width.saturating_sub(width + 1);
    let y = area.y + area.height.saturating_sub(height + 1);
    let toast = Rect::new(x, y, width, height);

    let (color, icon) = match note.level {
        NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
        NotificationLevel::Error => (theme::ERROR_RED, "✗"),
        NotificationLevel::Info => (theme::NEON_CYAN, "·"),
    };

    frame.render_widget(Clear, toast);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(toast);
    frame.render_widget(block, toast);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(color)),
            Span::styled(note.message.as_str(), theme::table_row()),
        ])),
        inner,
    );
}

fn help_line(key: &'static str, text: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<12}"), theme::key_hint_key()),
        Span::styled(text, theme::key_hint()),
    ])
}

fn help_section(title: &'static str) -> [Line<'static>; 2] {
    [
        Line::from(Span::styled(
            format!("  {title}"),
            Style::default().fg(theme::NEON_CYAN),
        )),
        Line::from(Span::styled(
            format!("  {}", "─".repeat(title.chars().count())),
            theme::key_hint(),
        )),
    ]
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let panel = centered_rect(52, 24, area);
    frame.render_widget(Clear, panel);

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    let mut lines = vec![Line::from("")];
    lines.extend(help_section("Grid"));
    lines.extend([
        help_line("j/k ↑/↓", "Move up/down"),
        help_line("PgUp/PgDn", "Page up/down"),
        help_line("g/G", "Top / bottom"),
        help_line("Enter", "Edit selected customer"),
        help_line("a / n", "New customer"),
        help_line("r", "Reload list"),
        Line::from(""),
    ]);
    lines.extend(help_section("Dialog"));
    lines.extend([
        help_line("Tab/S-Tab", "Next / previous field"),
        help_line("Enter", "Save or create"),
        help_line("Ctrl+D", "Delete (edit dialog)"),
        help_line("Esc", "Cancel"),
        Line::from(""),
        help_line("?", "This help"),
        help_line("q / Ctrl+C", "Quit"),
        Line::from(""),
        Line::from(Span::styled("          Esc or ? to close", theme::key_hint())),
    ]);
    frame.render_widget(Paragraph::new(lines), inner);
}
