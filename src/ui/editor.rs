use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::helpers::panel_block;
use super::theme;
use crate::app::input::GlobField;
use crate::app::{App, Focus};

pub fn render_editor(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Editor;
    let title = match app.workspace.active_agent() {
        Some(agent) => format!("Filters · {}", agent.name),
        None => "Filters".to_string(),
    };
    let block = panel_block(&title, focused).style(Style::default().bg(theme::BG_INPUT));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        field_line("include", &app.input.include, focused && app.input.field == GlobField::Include),
        field_line("exclude", &app.input.exclude, focused && app.input.field == GlobField::Exclude),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn field_line<'a>(label: &'a str, value: &'a str, active: bool) -> Line<'a> {
    let label_color = if active { theme::ACCENT } else { theme::TEXT_MUTED };
    let mut spans = vec![
        Span::styled(format!(" {:<8}", label), Style::default().fg(label_color)),
        Span::styled(value, Style::default().fg(theme::TEXT)),
    ];
    if active {
        spans.push(Span::styled("▏", Style::default().fg(theme::ACCENT)));
    }
    Line::from(spans)
}
