mod editor;
mod helpers;
mod preview;
mod status;
mod theme;
mod tree;

use ratatui::{prelude::*, widgets::Block};

use crate::app::App;
use crate::infra::constants::{EDITOR_HEIGHT, TREE_PANEL_PERCENT};

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Fill base background
    frame.render_widget(Block::default().style(Style::default().bg(theme::BG_BASE)), area);

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),                // Tree + preview
            Constraint::Length(EDITOR_HEIGHT), // Glob editor
            Constraint::Length(1),             // Status bar
        ])
        .split(area);

    render_body(frame, app, main_layout[0]);
    editor::render_editor(frame, app, main_layout[1]);
    status::render_status_bar(frame, app, main_layout[2]);
}

fn render_body(frame: &mut Frame, app: &App, area: Rect) {
    let body_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(TREE_PANEL_PERCENT), Constraint::Min(1)])
        .split(area);

    tree::render_tree(frame, app, body_layout[0]);
    preview::render_preview(frame, app, body_layout[1]);
}
