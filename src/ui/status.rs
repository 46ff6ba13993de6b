use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use clarion_base::config::presets;

use super::helpers::truncate_string;
use super::theme;
use crate::app::{App, Focus};

pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let ws = &app.workspace;
    let base_style = Style::default().bg(theme::BG_BASE).fg(theme::TEXT_MUTED);
    let mut spans = vec![Span::styled(" ", base_style)];

    if let Some(agent) = ws.active_agent() {
        let modified = if ws.editor.is_modified(&ws.saved_patterns()) { "*" } else { "" };
        spans.push(Span::styled(
            format!(" {}{} ", agent.name, modified),
            Style::default().fg(theme::BG_BASE).bg(theme::ACCENT_DIM).bold(),
        ));
        spans.push(Span::styled(" ", base_style));
    }

    let mode = if ws.has_filters() { " FILTERS " } else { " MANUAL " };
    spans.push(Span::styled(mode, Style::default().fg(theme::TEXT).bg(theme::BG_ELEVATED)));
    spans.push(Span::styled(" ", base_style));

    if ws.context_loading || app.tree_loading {
        spans.push(Span::styled(" LOADING ", Style::default().fg(theme::BG_BASE).bg(theme::WARNING).bold()));
    } else {
        spans.push(Span::styled(
            format!(" {} in context ", ws.context_set.len()),
            Style::default().fg(theme::BG_BASE).bg(theme::SUCCESS).bold(),
        ));
    }
    spans.push(Span::styled(" ", base_style));

    if let Some(at) = ws.last_refresh {
        spans.push(Span::styled(format!("{} ", at.format("%H:%M:%S")), base_style));
    }

    if let Some(msg) = &app.status {
        let color = if msg.contains("failed") { theme::ERROR } else { theme::TEXT_SECONDARY };
        spans.push(Span::styled(truncate_string(msg, 48), Style::default().fg(color)));
    }

    let hints = match app.focus {
        Focus::Editor => "tab done  enter switch field  ctrl+q quit ".to_string(),
        _ => format!(
            "space select  x remove  a agent  1-{} preset  e edit  s save  ^r reload  q quit ",
            presets::all().len()
        ),
    };
    let used: usize = spans.iter().map(|s| s.width()).sum();
    let pad = (area.width as usize).saturating_sub(used + hints.chars().count());
    spans.push(Span::styled(" ".repeat(pad), base_style));
    spans.push(Span::styled(hints, base_style));

    frame.render_widget(Paragraph::new(Line::from(spans)).style(base_style), area);
}
