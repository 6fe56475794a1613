use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};

/// Bordered pane; the focused pane gets the highlight border.
pub fn panel_block<'a>(title: &'a str, focused: bool) -> Block<'a> {
    let style = if focused {
        crate::theme::border_focused()
    } else {
        Style::default().fg(crate::theme::Theme::default().frame)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}
