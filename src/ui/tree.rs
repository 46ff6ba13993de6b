use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use clarion_base::FileTreeNode;
use clarion_mod_tree::{SelectionStatus, TreeRow, selection_status, visible_rows};

use super::helpers::{panel_block, scroll_offset, truncate_string};
use super::theme;
use crate::app::{App, Focus};

pub fn render_tree(frame: &mut Frame, app: &App, area: Rect) {
    let ws = &app.workspace;
    let title = if app.tree_loading && ws.tree.is_empty() { "Files (loading)".to_string() } else { "Files".to_string() };
    let block = panel_block(&title, app.focus == Focus::Tree);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if ws.tree.is_empty() {
        let msg = if app.tree_loading { "Loading..." } else { "No files" };
        frame.render_widget(Paragraph::new(Span::styled(format!(" {}", msg), Style::default().fg(theme::TEXT_MUTED))), inner);
        return;
    }

    let rows = visible_rows(&ws.tree, &|p| app.tree_view.is_open(p));
    let height = inner.height as usize;
    let offset = scroll_offset(app.tree_view.cursor, height);
    // Filters own the context; the markers only mirror the result then
    let locked = ws.has_filters();

    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, row)| {
            let status = selection_status(row.node, &ws.context_set);
            tree_line(row, status, locked, i == app.tree_view.cursor, inner.width as usize)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn tree_line(
    row: &TreeRow<'_, FileTreeNode>,
    status: SelectionStatus,
    locked: bool,
    selected: bool,
    width: usize,
) -> Line<'static> {
    let marker_color = match (status, locked) {
        (SelectionStatus::Unchecked, _) => theme::TEXT_MUTED,
        (_, true) => theme::ACCENT_DIM,
        (_, false) => theme::SUCCESS,
    };
    let (icon, name_color) = match (row.node.is_folder(), row.is_open) {
        (true, true) => ("▼ ", theme::FOLDER),
        (true, false) => ("▶ ", theme::FOLDER),
        (false, _) => ("", theme::TEXT),
    };

    let used = row.prefix.chars().count() + 4 + 4 + icon.chars().count();
    let name = truncate_string(&row.node.name, width.saturating_sub(used));
    let mut line = Line::from(vec![
        Span::styled(format!("{} ", status.marker()), Style::default().fg(marker_color)),
        Span::styled(format!("{}{}", row.prefix, row.connector), Style::default().fg(theme::CONNECTOR)),
        Span::styled(icon, Style::default().fg(theme::FOLDER)),
        Span::styled(name, Style::default().fg(name_color)),
    ]);
    if selected {
        line = line.style(Style::default().bg(theme::BG_ELEVATED));
    }
    line
}
