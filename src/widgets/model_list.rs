use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::ui::AppState;
use crate::widgets::chrome::panel_block;

pub(crate) fn compute_scroll_window(total: usize, selected: usize, inner_h: u16) -> (usize, usize) {
    if inner_h == 0 || total == 0 {
        return (0, 0);
    }
    let sel = selected.min(total.saturating_sub(1));
    let ih = inner_h as usize;
    let start = sel.saturating_sub(ih - 1);
    let end = (start + ih).min(total);
    (start, end)
}

pub fn draw_model_list(f: &mut Frame, area: Rect, state: &AppState, focused: bool) {
    let models = &state.catalog.models;
    let inner_h = area.height.saturating_sub(2); // account for borders
    let (start, end) = compute_scroll_window(models.len(), state.selected, inner_h);
    let items: Vec<ListItem> = models
        .iter()
        .enumerate()
        .skip(start)
        .take(end - start)
        .map(|(idx, m)| {
            let sel = if idx == state.selected { "> " } else { "  " };
            let text = format!("{sel}{}  (id {})", m.name, m.id);
            let mut item = ListItem::new(text);
            if idx == state.selected {
                item = item.style(state.theme.text_active_bold());
            }
            item
        })
        .collect();
    let title = format!("Models ({})", models.len());
    let list = List::new(items).block(panel_block(&title, focused));
    f.render_widget(list, area);
}
