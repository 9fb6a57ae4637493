//! Edit/create dialog drawn over the grid.
//!
//! Each field gets a value line and a hint line for its validation message.
//! Below the fields sits either the dialog error message or, while a
//! request is in flight, a throbber.

use northgrid_core::{DialogKind, FormField, MutationKind, ViewController, ViewMode};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use throbber_widgets_tui::{Throbber, ThrobberState};

use super::centered_rect;
use crate::theme;

const LABEL_WIDTH: usize = 15;
// borders + spacer + spacer + hints
const CHROME_HEIGHT: u16 = 2 + 1 + 1 + 1;

/// The identifier of an existing record can't be changed in place.
pub fn is_editable(field: FormField, dialog: DialogKind) -> bool {
    !(dialog == DialogKind::Edit && field == FormField::CustomerId)
}

/// Draw the dialog for the current mode. Does nothing in list mode.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    view: &ViewController,
    active: FormField,
    throbber: &ThrobberState,
) {
    let Some(dialog) = view.mode().dialog() else {
        return;
    };

    let fields_height = 2 * u16::try_from(FormField::ALL.len()).unwrap_or(12);
    let room = area.height.saturating_sub(CHROME_HEIGHT + fields_height);
    let message = view
        .error_message()
        .map(|msg| fit_lines(msg, room))
        .unwrap_or_default();
    let error_lines = u16::try_from(message.len()).unwrap_or(room).max(1);
    let height = CHROME_HEIGHT + fields_height + error_lines;
    let panel = centered_rect(64, height, area);

    frame.render_widget(Clear, panel);
    let title = match dialog {
        DialogKind::Edit => format!(" Edit customer {} ", view.form().value(FormField::CustomerId)),
        DialogKind::Create => " New customer ".to_owned(),
    };
    let block = Block::default()
        .title(Span::styled(title, theme::title_style()))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    let [_, fields_area, _, message_area, hints_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(fields_height),
        Constraint::Length(1),
        Constraint::Length(error_lines),
        Constraint::Length(1),
    ])
    .areas(inner);

    let locked = view.mode().is_busy();
    let rows = Layout::vertical(FormField::ALL.map(|_| Constraint::Length(2))).split(fields_area);
    for (field, row) in FormField::ALL.into_iter().zip(rows.iter()) {
        render_field(frame, *row, view, field, dialog, !locked && field == active);
    }

    match view.mode() {
        ViewMode::Submitting { kind, .. } => {
            let label = match kind {
                MutationKind::Create => "  Creating customer...",
                MutationKind::Update => "  Saving changes...",
                MutationKind::Delete => "  Deleting customer...",
            };
            let spinner = Throbber::default()
                .label(label)
                .style(Style::default().fg(theme::NEON_CYAN))
                .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
            frame.render_stateful_widget(spinner, message_area, &mut throbber.clone());
        }
        _ => {
            let lines: Vec<Line> = message
                .into_iter()
                .map(|l| Line::from(Span::styled(format!("  {l}"), theme::error_text())))
                .collect();
            frame.render_widget(Paragraph::new(lines), message_area);
        }
    }

    frame.render_widget(
        Paragraph::new(hints(dialog, locked)).alignment(Alignment::Center),
        hints_area,
    );
}

/// Split `msg` into at most `max` lines (at least one). When it doesn't fit,
/// the last line says how many were left out.
fn fit_lines(msg: &str, max: u16) -> Vec<String> {
    let max = usize::from(max.max(1));
    let mut lines: Vec<String> = msg.lines().map(str::to_owned).collect();
    if lines.len() > max {
        let hidden = lines.len() - (max - 1);
        lines.truncate(max - 1);
        lines.push(format!("\u{2026} {hidden} more"));
    }
    lines
}

fn render_field(
    frame: &mut Frame,
    area: Rect,
    view: &ViewController,
    field: FormField,
    dialog: DialogKind,
    active: bool,
) {
    let value = view.form().value(field);
    let mut spans = vec![Span::styled(
        format!("  {:<LABEL_WIDTH$}", field.label()),
        theme::field_label(active),
    )];
    if is_editable(field, dialog) {
        let text = if active {
            format!("{value}\u{2588}")
        } else {
            value.to_owned()
        };
        spans.push(Span::styled(text, theme::field_value()));
    } else {
        spans.push(Span::styled(value.to_owned(), theme::key_hint()));
    }

    let [value_area, hint_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);
    frame.render_widget(Paragraph::new(Line::from(spans)), value_area);

    if let Some(err) = view.form().error_for(field) {
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("  {:<LABEL_WIDTH$}{err}", ""),
                theme::field_error(),
            )),
            hint_area,
        );
    }
}

fn hints(dialog: DialogKind, locked: bool) -> Line<'static> {
    if locked {
        return Line::from(Span::styled("waiting for the server", theme::key_hint()));
    }
    let mut spans = vec![
        Span::styled("Tab ", theme::key_hint_key()),
        Span::styled("next  ", theme::key_hint()),
        Span::styled("Enter ", theme::key_hint_key()),
    ];
    match dialog {
        DialogKind::Edit => {
            spans.push(Span::styled("save  ", theme::key_hint()));
            spans.push(Span::styled("Ctrl+D ", theme::key_hint_key()));
            spans.push(Span::styled("delete  ", theme::key_hint()));
        }
        DialogKind::Create => spans.push(Span::styled("create  ", theme::key_hint())),
    }
    spans.push(Span::styled("Esc ", theme::key_hint_key()));
    spans.push(Span::styled("cancel", theme::key_hint()));
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_id_read_only_only_when_editing() {
        assert!(!is_editable(FormField::CustomerId, DialogKind::Edit));
        assert!(is_editable(FormField::CustomerId, DialogKind::Create));
        assert!(is_editable(FormField::City, DialogKind::Edit));
    }

    #[test]
    fn hints_mention_delete_only_in_edit_dialog() {
        let text = |line: Line<'_>| line.spans.iter().map(|s| s.content.to_string()).collect::<String>();
        assert!(text(hints(DialogKind::Edit, false)).contains("delete"));
        assert!(!text(hints(DialogKind::Create, false)).contains("delete"));
        assert_eq!(text(hints(DialogKind::Edit, true)), "waiting for the server");
    }

    #[test]
    fn long_error_messages_keep_a_marker_for_hidden_lines() {
        let msg = "one\ntwo\nthree\nfour\nfive\nsix";
        assert_eq!(fit_lines(msg, 10).len(), 6);
        assert_eq!(
            fit_lines(msg, 4),
            vec!["one", "two", "three", "\u{2026} 3 more"]
        );
        assert_eq!(fit_lines(msg, 0), vec!["\u{2026} 6 more"]);
        assert_eq!(fit_lines("single", 1), vec!["single"]);
    }
}
