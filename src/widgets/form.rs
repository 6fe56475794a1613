use crate::model::{ParamDef, ParamKind, ProductModel};
use crate::session::{select_options, EditSession};
use crate::widgets::chrome::panel_block;
use ratatui::prelude::*;
use ratatui::widgets::*;

/// Per-row input behavior, chosen by the parameter's value kind. Values are
/// not stored here; every row reads and writes the session snapshot so the
/// dialog always renders what the session holds.
#[derive(Clone, Debug)]
pub enum FieldKind {
    Text,
    Number,
    Select {
        options: Vec<String>,
        cursor: usize,
        offset: usize,
    },
    Unsupported {
        kind: String,
    },
}

pub const OPTIONS_VISIBLE: usize = 8;

#[derive(Clone, Debug)]
pub struct FormField {
    pub param_id: u32,
    pub label: String,
    pub kind: FieldKind,
}

/// One UI row per schema parameter, in schema order. Selects capture their
/// option source here; an unknown kind degrades to a placeholder row and the
/// rest of the dialog still renders.
pub fn fields_for(params: &[ParamDef], model: &ProductModel) -> Vec<FormField> {
    params
        .iter()
        .map(|p| {
            let kind = match &p.kind {
                ParamKind::Text => FieldKind::Text,
                ParamKind::Number => FieldKind::Number,
                ParamKind::SingleSelect => FieldKind::Select {
                    options: select_options(p, model),
                    cursor: 0,
                    offset: 0,
                },
                ParamKind::Unknown(k) => FieldKind::Unsupported { kind: k.clone() },
            };
            FormField {
                param_id: p.id,
                label: p.name.clone(),
                kind,
            }
        })
        .collect()
}

/// Dialog state for one edit session. Row 0 is the model name, rows
/// 1..=fields.len() are the schema parameters, then Save/Reset/Cancel.
#[derive(Clone, Debug)]
pub struct EditorState {
    pub title: String,
    pub session: EditSession,
    pub fields: Vec<FormField>,
    pub selected: usize,
    pub editing: bool,
    pub message: Option<String>,
    pub name_error: Option<String>,
    // Model as handed in at open time; Reset and dirty both derive from it
    opened: ProductModel,
    pub dirty: bool,
}

impl EditorState {
    pub fn open(title: String, model: ProductModel, params: &[ParamDef]) -> Self {
        let opened = model.clone();
        let session = EditSession::open(model, params);
        let fields = fields_for(session.params(), session.model());
        let mut ed = Self {
            title,
            session,
            fields,
            selected: 0,
            editing: false,
            message: None,
            name_error: None,
            opened,
            dirty: false,
        };
        ed.sync_select_cursors();
        ed
    }

    pub fn save_idx(&self) -> usize {
        self.fields.len() + 1
    }

    pub fn reset_idx(&self) -> usize {
        self.fields.len() + 2
    }

    pub fn cancel_idx(&self) -> usize {
        self.fields.len() + 3
    }

    /// Save precondition: the name must contain something visible.
    pub fn can_save(&self) -> bool {
        !self.session.model().name.trim().is_empty()
    }

    /// What this dialog would show if opened under the current schema with
    /// no edits. Reset target and dirty reference.
    fn baseline(&self) -> ProductModel {
        EditSession::open(self.opened.clone(), self.session.params()).into_model()
    }

    pub fn compute_dirty(&mut self) -> bool {
        self.dirty = *self.session.model() != self.baseline();
        self.dirty
    }

    pub fn reset_to_initial(&mut self) {
        let params = self.session.params().to_vec();
        self.session = EditSession::open(self.opened.clone(), &params);
        self.sync_select_cursors();
        self.name_error = None;
        self.message = Some("Reset to opening values".into());
        self.compute_dirty();
    }

    /// Schema switch while the dialog is open: re-reconcile and rebuild rows.
    pub fn rebind(&mut self, params: &[ParamDef]) {
        self.editing = false;
        self.session.rebind(params);
        self.fields = fields_for(params, self.session.model());
        self.selected = self.selected.min(self.cancel_idx());
        self.sync_select_cursors();
        self.compute_dirty();
    }

    /// Put each select cursor on its stored value.
    pub fn sync_select_cursors(&mut self) {
        let session = &self.session;
        for fld in &mut self.fields {
            if let FieldKind::Select {
                options,
                cursor,
                offset,
            } = &mut fld.kind
            {
                let stored = session.value(fld.param_id);
                *cursor = options.iter().position(|o| o == stored).unwrap_or(0);
                *offset = if *cursor >= OPTIONS_VISIBLE {
                    *cursor + 1 - OPTIONS_VISIBLE
                } else {
                    0
                };
            }
        }
    }
}

pub fn validate_name(ed: &mut EditorState) -> bool {
    if ed.can_save() {
        ed.name_error = None;
        ed.message = None;
        true
    } else {
        ed.name_error = Some("This field is required".into());
        ed.message = Some("Name is required to save".into());
        false
    }
}

pub fn draw_form(f: &mut Frame, area: Rect, ed: &EditorState, highlight: bool, cursor_on: bool) {
    let model = ed.session.model();
    let mut lines: Vec<Line> = Vec::new();

    // Name row; the one required field in the dialog
    let sel = if ed.selected == 0 { '›' } else { ' ' };
    let mut name_val = model.name.clone();
    if ed.editing && ed.selected == 0 && cursor_on {
        name_val.push('▏');
    }
    let name_style = if ed.selected == 0 {
        if ed.editing {
            crate::theme::text_editing_bold()
        } else {
            crate::theme::text_active_bold()
        }
    } else {
        Style::default()
    };
    lines.push(Line::from(vec![
        Span::raw(format!("{sel} Name *: ")),
        Span::styled(name_val, name_style),
    ]));
    if let Some(err) = &ed.name_error {
        lines.push(Line::from(Span::styled(
            format!("  ! {err}"),
            crate::theme::text_error(),
        )));
    }

    for (i, fld) in ed.fields.iter().enumerate() {
        let row = i + 1;
        let sel = if row == ed.selected { '›' } else { ' ' };
        let stored = ed.session.value(fld.param_id);
        match &fld.kind {
            FieldKind::Text | FieldKind::Number => {
                let mut val = stored.to_string();
                if ed.editing && row == ed.selected && cursor_on {
                    val.push('▏');
                }
                let value_style = if row == ed.selected {
                    if ed.editing {
                        crate::theme::text_editing_bold()
                    } else {
                        crate::theme::text_active_bold()
                    }
                } else {
                    Style::default()
                };
                lines.push(Line::from(vec![
                    Span::raw(format!("{sel} {}: ", fld.label)),
                    Span::styled(val, value_style),
                ]));
            }
            FieldKind::Select {
                options,
                cursor,
                offset,
            } => {
                // Header line with the committed value
                let summary = if stored.is_empty() {
                    "(none)".to_string()
                } else {
                    stored.to_string()
                };
                let header_style = if row == ed.selected && ed.editing {
                    crate::theme::text_editing_bold()
                } else if row == ed.selected {
                    crate::theme::text_active_bold()
                } else {
                    Style::default()
                };
                lines.push(Line::from(vec![
                    Span::raw(format!("{sel} {}: ", fld.label)),
                    Span::styled(summary, header_style),
                ]));
                // Options list when editing this field
                if ed.editing && row == ed.selected {
                    let start = (*offset).min(options.len());
                    let end = (start + OPTIONS_VISIBLE).min(options.len());
                    for (oi, opt) in options.iter().enumerate().take(end).skip(start) {
                        let mark = if opt == stored { "(•)" } else { "( )" };
                        let cur = if oi == *cursor { '›' } else { ' ' };
                        let st = if oi == *cursor {
                            crate::theme::list_cursor_style()
                        } else {
                            crate::theme::text_muted()
                        };
                        lines.push(Line::from(vec![Span::styled(
                            format!("  {cur} {mark} {opt}"),
                            st,
                        )]));
                    }
                }
            }
            FieldKind::Unsupported { .. } => {
                lines.push(Line::from(vec![
                    Span::raw(format!("{sel} {}: ", fld.label)),
                    Span::styled(
                        "(unsupported parameter type)".to_string(),
                        crate::theme::text_muted(),
                    ),
                ]));
            }
        }
    }

    // Buttons: Save | Reset | Cancel
    lines.push(Line::from(""));
    let can_save = ed.can_save();
    let can_reset = ed.dirty;
    let save_label = "[ Save ]";
    let mut save_style = if can_save {
        crate::theme::text_active_bold()
    } else {
        crate::theme::text_muted()
    };
    let reset_label = "Reset";
    let mut reset_style = if can_reset {
        Style::default().fg(crate::theme::ACTIVE)
    } else {
        crate::theme::text_muted()
    };
    let mut cancel_style = crate::theme::text_muted();
    if ed.selected == ed.save_idx() {
        save_style = if can_save {
            crate::theme::list_cursor_style()
        } else {
            Style::default()
                .fg(crate::theme::MUTED)
                .bg(crate::theme::ACCENT)
        };
    }
    if ed.selected == ed.reset_idx() {
        reset_style = crate::theme::list_cursor_style();
    }
    if ed.selected == ed.cancel_idx() {
        cancel_style = crate::theme::list_cursor_style();
    }
    lines.push(Line::from(vec![
        Span::styled(format!("  {save_label}  "), save_style),
        Span::styled(format!("{reset_label}  "), reset_style),
        Span::styled("Cancel", cancel_style),
    ]));
    if let Some(msg) = &ed.message {
        lines.push(Line::from(Span::styled(
            msg.clone(),
            crate::theme::text_muted(),
        )));
    }

    let title = if ed.editing {
        format!("{} (editing)", ed.title)
    } else {
        ed.title.clone()
    };
    let block = panel_block(&title, highlight);
    let p = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColorOption, ParamValue};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn schema() -> Vec<ParamDef> {
        vec![
            ParamDef {
                id: 1,
                name: "Purpose".into(),
                kind: ParamKind::Text,
                options: None,
            },
            ParamDef {
                id: 3,
                name: "Quantity".into(),
                kind: ParamKind::Number,
                options: None,
            },
            ParamDef {
                id: 4,
                name: "Color".into(),
                kind: ParamKind::SingleSelect,
                options: None,
            },
        ]
    }

    fn beta() -> ProductModel {
        ProductModel {
            id: 2,
            name: "Beta".into(),
            values: vec![
                ParamValue {
                    param_id: 1,
                    value: "Special".into(),
                },
                ParamValue {
                    param_id: 4,
                    value: "".into(),
                },
            ],
            colors: vec![
                ColorOption {
                    id: 101,
                    name: "Red".into(),
                },
                ColorOption {
                    id: 102,
                    name: "Blue".into(),
                },
            ],
        }
    }

    #[test]
    fn fields_follow_kinds_and_option_sources() {
        let mut params = schema();
        params.push(ParamDef {
            id: 5,
            name: "Material".into(),
            kind: ParamKind::SingleSelect,
            options: Some(vec!["Steel".into(), "Aluminum".into()]),
        });
        params.push(ParamDef {
            id: 8,
            name: "Finish".into(),
            kind: ParamKind::Unknown("gradient".into()),
            options: None,
        });
        let fields = fields_for(&params, &beta());
        assert_eq!(fields.len(), 5);
        assert!(matches!(fields[0].kind, FieldKind::Text));
        assert!(matches!(fields[1].kind, FieldKind::Number));
        match &fields[2].kind {
            FieldKind::Select { options, .. } => {
                assert_eq!(options, &vec!["Red".to_string(), "Blue".to_string()]);
            }
            _ => panic!("color param not a select"),
        }
        match &fields[3].kind {
            FieldKind::Select { options, .. } => {
                assert_eq!(options, &vec!["Steel".to_string(), "Aluminum".to_string()]);
            }
            _ => panic!("material param not a select"),
        }
        match &fields[4].kind {
            FieldKind::Unsupported { kind } => assert_eq!(kind, "gradient"),
            _ => panic!("unknown kind not degraded"),
        }
    }

    #[test]
    fn validate_name_blocks_blank_names() {
        let mut ed = EditorState::open(
            "New Model".into(),
            ProductModel::template(&beta().colors),
            &schema(),
        );
        assert!(!ed.can_save());
        assert!(!validate_name(&mut ed));
        assert!(ed.name_error.is_some());
        ed.session.set_name("   ".into());
        assert!(!validate_name(&mut ed));
        ed.session.set_name("Gamma".into());
        assert!(validate_name(&mut ed));
        assert!(ed.name_error.is_none());
    }

    #[test]
    fn dirty_tracks_session_and_reset_restores() {
        let mut ed = EditorState::open("Edit".into(), beta(), &schema());
        assert!(!ed.compute_dirty());
        ed.session.set_value(1, "Changed".into());
        assert!(ed.compute_dirty());
        ed.reset_to_initial();
        assert_eq!(ed.session.value(1), "Special");
        assert!(!ed.dirty);
    }

    #[test]
    fn rebind_rebuilds_rows_and_keeps_stored_values() {
        let mut ed = EditorState::open("Edit".into(), beta(), &schema());
        ed.session.set_value(3, "7".into());
        let narrow = vec![ParamDef {
            id: 1,
            name: "Purpose".into(),
            kind: ParamKind::Text,
            options: None,
        }];
        ed.rebind(&narrow);
        assert_eq!(ed.fields.len(), 1);
        assert_eq!(ed.session.value(3), "7");
        ed.rebind(&schema());
        assert_eq!(ed.fields.len(), 3);
        assert!(ed.dirty);
    }

    #[test]
    fn golden_select_editor_renders_expected_window() {
        let mut ed = EditorState::open("Edit Model 'Beta'".into(), beta(), &schema());
        ed.selected = 3;
        ed.editing = true;
        let backend = TestBackend::new(40, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let _ = terminal.draw(|f| {
            let area = ratatui::layout::Rect {
                x: 0,
                y: 0,
                width: 40,
                height: 12,
            };
            draw_form(f, area, &ed, true, true);
        });
        // Extract inner content (strip 1-char border)
        let buf = terminal.backend().buffer().clone();
        let mut inner_lines: Vec<String> = Vec::new();
        for y in 1..(buf.area.height - 1) {
            let mut line = String::new();
            for x in 1..(buf.area.width - 1) {
                let cell = &buf[(x, y)];
                let ch = cell.symbol().chars().next().unwrap_or(' ');
                line.push(ch);
            }
            while line.ends_with(' ') {
                line.pop();
            }
            inner_lines.push(line);
        }
        let current_top = inner_lines
            .iter()
            .take(8)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n");
        let golden = include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/golden/select_editor.txt"
        ));
        assert_eq!(current_top.trim_end(), golden.trim_end());
    }

    #[test]
    fn golden_unsupported_kind_renders_placeholder_row() {
        let params = vec![
            ParamDef {
                id: 8,
                name: "Finish".into(),
                kind: ParamKind::Unknown("gradient".into()),
                options: None,
            },
            ParamDef {
                id: 3,
                name: "Quantity".into(),
                kind: ParamKind::Number,
                options: None,
            },
        ];
        let model = ProductModel {
            name: "Probe".into(),
            ..Default::default()
        };
        let mut ed = EditorState::open("Edit Model 'Probe'".into(), model, &params);
        ed.selected = 1;
        let backend = TestBackend::new(42, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let _ = terminal.draw(|f| {
            let area = ratatui::layout::Rect {
                x: 0,
                y: 0,
                width: 42,
                height: 10,
            };
            draw_form(f, area, &ed, true, false);
        });
        let buf = terminal.backend().buffer().clone();
        let mut inner_lines: Vec<String> = Vec::new();
        for y in 1..(buf.area.height - 1) {
            let mut line = String::new();
            for x in 1..(buf.area.width - 1) {
                let cell = &buf[(x, y)];
                let ch = cell.symbol().chars().next().unwrap_or(' ');
                line.push(ch);
            }
            while line.ends_with(' ') {
                line.pop();
            }
            inner_lines.push(line);
        }
        let current_top = inner_lines
            .iter()
            .take(5)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n");
        let golden = include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/golden/unsupported_kind.txt"
        ));
        assert_eq!(current_top.trim_end(), golden.trim_end());
    }
}
