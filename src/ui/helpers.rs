use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme;

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for c in s.chars() {
        let cw = c.width().unwrap_or(0);
        if width + cw + 1 > max_width {
            result.push('…');
            break;
        }
        result.push(c);
        width += cw;
    }
    result
}

/// Rounded panel frame; the border lights up when the panel has focus.
pub fn panel_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { theme::BORDER_FOCUS } else { theme::BORDER };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(theme::BG_SURFACE))
        .title(Span::styled(format!(" {} ", title), Style::default().fg(theme::ACCENT).bold()))
}

/// First row to draw so that `cursor` stays inside a window of `height` rows.
pub fn scroll_offset(cursor: usize, height: usize) -> usize {
    if height == 0 || cursor < height { 0 } else { cursor + 1 - height }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_string("src", 10), "src");
        assert_eq!(truncate_string("abcdefgh", 5), "abcd…");
    }

    #[test]
    fn scroll_follows_cursor() {
        assert_eq!(scroll_offset(3, 10), 0);
        assert_eq!(scroll_offset(10, 10), 1);
        assert_eq!(scroll_offset(5, 0), 0);
    }
}
