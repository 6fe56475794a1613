use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Tabs};

use crate::ui::AppState;

pub fn draw_schema_tabs(f: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let current = state.schema_index;

    // Build tab titles with function key indicators: [F1] Standard
    let mut titles: Vec<Line> = Vec::new();
    for (i, schema) in state.catalog.schemas.iter().enumerate() {
        let is_selected = i == current;
        let fn_key = format!("F{}", i + 1);
        let text_style = if is_selected {
            Style::default()
                .fg(theme.selected)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted)
        };
        let key_style = if is_selected {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted)
        };
        titles.push(Line::from(vec![
            Span::styled("[", Style::default().fg(theme.frame)),
            Span::styled(fn_key, key_style),
            Span::styled("]", Style::default().fg(theme.frame)),
            Span::raw(" "),
            Span::styled(schema.title.clone(), text_style),
        ]));
    }

    let tabs = Tabs::new(titles)
        .select(current)
        .style(Style::default().fg(theme.fg))
        .highlight_style(
            Style::default()
                .fg(theme.selected)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::styled(" │ ", Style::default().fg(theme.frame)));

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(theme.frame));
    f.render_widget(tabs.block(block), area);
}

/// F1 maps to the first schema. Returns the index to switch to, or None
/// when the key is out of range or the tab is already active.
pub fn handle_function_key(state: &AppState, key_num: u8) -> Option<usize> {
    let index = (key_num - 1) as usize;
    if index < state.catalog.schemas.len() && index != state.schema_index {
        Some(index)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Catalog;

    #[test]
    fn function_keys_map_to_schema_indexes() {
        let state = AppState {
            catalog: Catalog::sample(),
            ..Default::default()
        };
        assert_eq!(handle_function_key(&state, 1), None); // already active
        assert_eq!(handle_function_key(&state, 2), Some(1));
        assert_eq!(handle_function_key(&state, 9), None);
    }
}
