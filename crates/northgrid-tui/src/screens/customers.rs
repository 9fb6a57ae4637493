//! Customer grid with the edit/create dialog on top.
//!
//! All state transitions go through `ViewController`. Network calls run in
//! spawned tasks and come back as `Action::ListLoaded` and
//! `Action::MutationFinished`, so the event loop never waits on the server.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use northgrid_core::{
    CustomerApi, DialogKind, FormField, ListFailurePolicy, Mutation, MutationKind, ViewController,
    ViewError, ViewMode,
};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::form_dialog;

const PAGE: isize = 10;

pub struct CustomersScreen {
    action_tx: Option<UnboundedSender<Action>>,
    api: Arc<dyn CustomerApi>,
    view: ViewController,
    active_field: FormField,
    table_state: TableState,
    throbber_state: ThrobberState,
}

impl CustomersScreen {
    pub fn new(api: Arc<dyn CustomerApi>, list_failure: ListFailurePolicy) -> Self {
        Self {
            action_tx: None,
            api,
            view: ViewController::new(list_failure),
            active_field: FormField::CustomerId,
            table_state: TableState::default(),
            throbber_state: ThrobberState::default(),
        }
    }

    pub fn record_count(&self) -> usize {
        self.view.records().len()
    }

    pub fn mode(&self) -> ViewMode {
        self.view.mode()
    }

    // ── Background work ──────────────────────────────────────────────

    fn request_refresh(&mut self) {
        let ticket = self.view.begin_refresh();
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        let api = Arc::clone(&self.api);
        tokio::spawn(async move {
            let result = api.list().await;
            let _ = tx.send(Action::ListLoaded { ticket, result });
        });
    }

    fn dispatch(&self, tx: UnboundedSender<Action>, mutation: Mutation) {
        debug!(
            kind = mutation.kind().verb(),
            customer_id = mutation.customer_id(),
            "dispatching mutation"
        );
        let api = Arc::clone(&self.api);
        tokio::spawn(async move {
            let result = mutation.execute(api.as_ref()).await;
            let _ = tx.send(Action::MutationFinished(result));
        });
    }

    // ── Grid ─────────────────────────────────────────────────────────

    fn sync_table(&mut self) {
        let selected = (!self.view.records().is_empty()).then_some(self.view.cursor());
        self.table_state.select(selected);
    }

    fn move_cursor(&mut self, delta: isize) {
        self.view.move_cursor(delta);
        self.sync_table();
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::PageUp => self.move_cursor(-PAGE),
            KeyCode::PageDown => self.move_cursor(PAGE),
            KeyCode::Home | KeyCode::Char('g') => {
                self.view.cursor_to_first();
                self.sync_table();
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.view.cursor_to_last();
                self.sync_table();
            }
            KeyCode::Enter => match self.view.select_row(self.view.cursor()) {
                Ok(()) => self.active_field = first_editable(DialogKind::Edit),
                Err(ViewError::NoSuchRow(_)) => {}
                Err(e) => warn!(error = %e, "cannot open edit dialog"),
            },
            KeyCode::Char('a' | 'n') => match self.view.open_create_form() {
                Ok(()) => self.active_field = first_editable(DialogKind::Create),
                Err(e) => warn!(error = %e, "cannot open create dialog"),
            },
            KeyCode::Char('r') => return Some(Action::Refresh),
            _ => {}
        }
        None
    }

    // ── Dialog ───────────────────────────────────────────────────────

    fn focus_next(&mut self, dialog: DialogKind) {
        let mut field = self.active_field.next();
        while !form_dialog::is_editable(field, dialog) {
            field = field.next();
        }
        self.active_field = field;
    }

    fn focus_prev(&mut self, dialog: DialogKind) {
        let mut field = self.active_field.prev();
        while !form_dialog::is_editable(field, dialog) {
            field = field.prev();
        }
        self.active_field = field;
    }

    fn submit(&mut self, dialog: DialogKind, delete: bool) {
        // Checked first so the view never enters Submitting without a way
        // to hear back.
        let Some(tx) = self.action_tx.clone() else {
            warn!("screen not initialized; submit ignored");
            return;
        };
        let begun = match (dialog, delete) {
            (DialogKind::Edit, true) => self.view.begin_delete(),
            (DialogKind::Edit, false) => self.view.begin_update(),
            (DialogKind::Create, _) => self.view.begin_create(),
        };
        match begun {
            Ok(mutation) => self.dispatch(tx, mutation),
            Err(ViewError::Invalid(report)) => {
                if let Some(field) = report
                    .fields()
                    .find(|&f| form_dialog::is_editable(f, dialog))
                {
                    self.active_field = field;
                }
            }
            Err(e) => warn!(error = %e, "submit rejected"),
        }
    }

    fn handle_dialog_key(&mut self, dialog: DialogKind, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.view.close_dialog();
            }
            KeyCode::Tab => self.focus_next(dialog),
            KeyCode::BackTab => self.focus_prev(dialog),
            KeyCode::Enter => self.submit(dialog, false),
            KeyCode::Char('d') if ctrl && dialog == DialogKind::Edit => self.submit(dialog, true),
            KeyCode::Backspace => {
                let field = self.active_field;
                if form_dialog::is_editable(field, dialog) {
                    if let Some(form) = self.view.form_mut() {
                        form.value_mut(field).pop();
                    }
                }
            }
            KeyCode::Char(c) if !ctrl => {
                let field = self.active_field;
                if form_dialog::is_editable(field, dialog) {
                    if let Some(form) = self.view.form_mut() {
                        form.value_mut(field).push(c);
                    }
                }
            }
            _ => {}
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_grid(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(Span::styled(
                format!(" Customers ({}) ", self.record_count()),
                theme::title_style(),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.view.mode() == ViewMode::List {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [table_area, hints_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        if self.view.records().is_empty() {
            frame.render_widget(
                Paragraph::new("No customers. Press r to reload or a to add one.")
                    .style(theme::key_hint())
                    .alignment(Alignment::Center),
                table_area,
            );
        } else {
            let header = Row::new(
                ["ID", "Company", "Contact", "Title", "City", "Country"]
                    .map(|h| Cell::from(h).style(theme::table_header())),
            );
            let rows: Vec<Row> = self
                .view
                .records()
                .iter()
                .map(|c| {
                    Row::new([
                        Cell::from(c.customer_id.as_str()),
                        Cell::from(c.company_name.as_str()),
                        Cell::from(c.contact_name.as_str()),
                        Cell::from(c.contact_title.as_str()),
                        Cell::from(c.address.city.as_str()),
                        Cell::from(c.address.country.as_str()),
                    ])
                    .style(theme::table_row())
                })
                .collect();
            let widths = [
                Constraint::Length(7),
                Constraint::Fill(3),
                Constraint::Fill(2),
                Constraint::Fill(2),
                Constraint::Fill(1),
                Constraint::Fill(1),
            ];
            let table = Table::new(rows, widths)
                .header(header)
                .row_highlight_style(theme::table_selected());
            let mut state = self.table_state;
            frame.render_stateful_widget(table, table_area, &mut state);
        }

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("navigate  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("edit  ", theme::key_hint()),
            Span::styled("a ", theme::key_hint_key()),
            Span::styled("add  ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("reload", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), hints_area);
    }
}

fn first_editable(dialog: DialogKind) -> FormField {
    FormField::ALL
        .into_iter()
        .find(|&f| form_dialog::is_editable(f, dialog))
        .unwrap_or(FormField::CompanyName)
}

fn past_tense(kind: MutationKind) -> &'static str {
    match kind {
        MutationKind::Create => "created",
        MutationKind::Update => "updated",
        MutationKind::Delete => "deleted",
    }
}

// ── Component impl ───────────────────────────────────────────────────

impl Component for CustomersScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        self.request_refresh();
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.view.mode() {
            ViewMode::List => Ok(self.handle_list_key(key)),
            ViewMode::Editing => {
                self.handle_dialog_key(DialogKind::Edit, key);
                Ok(None)
            }
            ViewMode::Creating => {
                self.handle_dialog_key(DialogKind::Create, key);
                Ok(None)
            }
            // Input stays locked until the request settles.
            ViewMode::Submitting { .. } => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Refresh => {
                self.request_refresh();
                return Ok(Some(Action::Notify(Notification::info("Reloading customers"))));
            }
            Action::ListLoaded { ticket, result } => {
                if self.view.apply_list(*ticket, result.clone()) {
                    self.sync_table();
                    if let Err(e) = result {
                        if self.view.list_failure() == ListFailurePolicy::Strict {
                            return Ok(Some(Action::Notify(Notification::error(
                                e.display_message(),
                            ))));
                        }
                    }
                }
            }
            Action::MutationFinished(result) => {
                let ViewMode::Submitting { kind, .. } = self.view.mode() else {
                    return Ok(None);
                };
                let customer_id = self.view.form().value(FormField::CustomerId).trim().to_owned();
                match self.view.finish_mutation(result.clone()) {
                    Ok(true) => {
                        self.request_refresh();
                        return Ok(Some(Action::Notify(Notification::success(format!(
                            "Customer {customer_id} {}",
                            past_tense(kind)
                        )))));
                    }
                    Ok(false) => {}
                    Err(e) => warn!(error = %e, "unexpected mutation result"),
                }
            }
            Action::Tick => {
                if self.view.mode().is_busy() {
                    self.throbber_state.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        self.render_grid(frame, area);
        form_dialog::render(
            frame,
            area,
            &self.view,
            self.active_field,
            &self.throbber_state,
        );
    }

    fn captures_input(&self) -> bool {
        self.view.mode().dialog().is_some()
    }

    fn id(&self) -> &'static str {
        "customers"
    }
}
