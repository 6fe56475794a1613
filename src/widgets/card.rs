use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::model::{ParamDef, ProductModel};
use crate::ui::AppState;
use crate::widgets::chrome::panel_block;

fn id_label(model: &ProductModel) -> String {
    if model.id == 0 {
        "(unsaved)".to_string()
    } else {
        format!("(id {})", model.id)
    }
}

/// Plain-text rendition of the card, used for clipboard export.
pub fn card_text(model: &ProductModel, params: &[ParamDef]) -> String {
    let mut out = format!("{} {}\n", model.name, id_label(model));
    for p in params {
        // Stored values as-is; no entry at all shows as N/A
        let v = model.value_of(p.id).unwrap_or("N/A");
        out.push_str(&format!("  {}: {v}\n", p.name));
    }
    let colors: Vec<&str> = model.colors.iter().map(|c| c.name.as_str()).collect();
    out.push_str(&format!("Colors: {}\n", colors.join(", ")));
    out
}

/// Detail card for the selected model. While a dialog is open the card
/// follows the session's live snapshot instead of the stored collection
/// entry, so every keystroke in the dialog is visible here.
pub fn draw_card(f: &mut Frame, area: Rect, state: &AppState) {
    let (model, params): (&ProductModel, &[ParamDef]) = match &state.editor {
        Some(ed) => (ed.form.session.model(), ed.form.session.params()),
        None => match state.catalog.models.get(state.selected) {
            Some(m) => (m, state.active_params()),
            None => {
                let p = Paragraph::new("No models in the catalog. Press 'n' to add one.")
                    .style(state.theme.text_muted())
                    .block(panel_block("Model", false));
                f.render_widget(p, area);
                return;
            }
        },
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled(
            model.name.clone(),
            state.theme.title_style().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", id_label(model)), state.theme.text_muted()),
    ]));
    lines.push(Line::from(""));
    for p in params {
        match model.value_of(p.id) {
            Some(v) => lines.push(Line::from(vec![
                Span::raw(format!("  {}: ", p.name)),
                Span::raw(v.to_string()),
            ])),
            None => lines.push(Line::from(vec![
                Span::raw(format!("  {}: ", p.name)),
                Span::styled("N/A", state.theme.text_muted()),
            ])),
        }
    }
    lines.push(Line::from(""));
    let colors: Vec<String> = model.colors.iter().map(|c| c.name.clone()).collect();
    lines.push(Line::from(vec![
        Span::raw("Colors: "),
        Span::styled(colors.join(", "), state.theme.text_muted()),
    ]));

    let title = if state.editor.is_some() {
        "Model (editing)"
    } else {
        "Model"
    };
    let p = Paragraph::new(lines)
        .block(panel_block(title, false))
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}
