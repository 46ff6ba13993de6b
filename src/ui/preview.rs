use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use clarion_mod_tree::visible_rows;

use super::helpers::{panel_block, truncate_string};
use super::theme;
use crate::app::{App, Focus};
use crate::context::PreviewStatus;

pub fn render_preview(frame: &mut Frame, app: &App, area: Rect) {
    let editor = &app.workspace.editor;
    let title = if editor.is_stale() {
        "Preview · Updating...".to_string()
    } else {
        format!("Preview · {} files included", editor.preview.included_count)
    };
    let block = panel_block(&title, app.focus == Focus::Preview);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let preview = &editor.preview;
    if preview.nodes.is_empty() {
        let msg = if editor.draft.is_empty() { "Add include globs to preview" } else { "No files match" };
        frame.render_widget(Paragraph::new(Span::styled(format!(" {}", msg), Style::default().fg(theme::TEXT_MUTED))), inner);
        return;
    }

    let rows = visible_rows(&preview.nodes, &|_| true);
    let width = inner.width as usize;
    let height = inner.height as usize;
    let offset = app.preview_scroll.min(rows.len().saturating_sub(height));

    let lines: Vec<Line> = rows
        .iter()
        .skip(offset)
        .take(height)
        .map(|row| {
            let color = match row.node.status {
                PreviewStatus::Folder => theme::FOLDER,
                PreviewStatus::Included => theme::SUCCESS,
                PreviewStatus::Excluded => theme::TEXT_MUTED,
            };
            let tree_part = format!(" {}{}", row.prefix, row.connector);
            let name = truncate_string(&row.node.name, width.saturating_sub(tree_part.chars().count()));
            let mut style = Style::default().fg(color);
            if row.node.status == PreviewStatus::Excluded {
                style = style.add_modifier(Modifier::CROSSED_OUT);
            }
            Line::from(vec![Span::styled(tree_part, Style::default().fg(theme::CONNECTOR)), Span::styled(name, style)])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
