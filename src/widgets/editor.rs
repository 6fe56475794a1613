use crate::app::Effect;
use crate::widgets::form::{draw_form, validate_name, EditorState, FieldKind, OPTIONS_VISIBLE};
use crossterm::event::KeyCode;
use ratatui::prelude::*;

/// Step a string-encoded number by whole units. The value stays a string;
/// unparseable input counts as 0.
fn step_number(value: &str, dir: i64) -> String {
    let cur: f64 = value.trim().parse().unwrap_or(0.0);
    let next = cur + dir as f64;
    if next.fract() == 0.0 {
        format!("{}", next as i64)
    } else {
        format!("{next}")
    }
}

/// Modal dialog over one edit session. When `form.editing` is set, keys
/// mutate the focused row's value in the session; otherwise they move the
/// row cursor and activate the Save/Reset/Cancel buttons.
pub struct EditorWidget {
    pub form: EditorState,
}

impl EditorWidget {
    pub fn new(form: EditorState) -> Self {
        Self { form }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, cursor_on: bool) {
        draw_form(f, area, &self.form, true, cursor_on);
    }

    /// Field index for the selected row; None on the name row or buttons.
    fn field_idx(&self) -> Option<usize> {
        if self.form.selected >= 1 && self.form.selected <= self.form.fields.len() {
            Some(self.form.selected - 1)
        } else {
            None
        }
    }

    fn adjust_edit(&mut self, dir: i64) {
        let Some(idx) = self.field_idx() else {
            return;
        };
        let param_id = self.form.fields[idx].param_id;
        if matches!(self.form.fields[idx].kind, FieldKind::Number) {
            let next = step_number(self.form.session.value(param_id), dir);
            self.form.session.set_value(param_id, next);
            self.form.compute_dirty();
            return;
        }
        if let FieldKind::Select {
            options,
            cursor,
            offset,
        } = &mut self.form.fields[idx].kind
        {
            if dir > 0 {
                if *cursor > 0 {
                    *cursor -= 1;
                }
                if *cursor < *offset {
                    *offset = *cursor;
                }
            } else {
                if *cursor + 1 < options.len() {
                    *cursor += 1;
                }
                if *cursor >= *offset + OPTIONS_VISIBLE {
                    *offset = *cursor + 1 - OPTIONS_VISIBLE;
                }
            }
        }
    }

    /// Commit the select cursor into the session and leave editing mode.
    fn commit_select(&mut self, effects: &mut Vec<Effect>) {
        let Some(idx) = self.field_idx() else {
            return;
        };
        let picked = match &self.form.fields[idx].kind {
            FieldKind::Select {
                options, cursor, ..
            } => options.get(*cursor).cloned(),
            _ => return,
        };
        if let Some(opt) = picked {
            let param_id = self.form.fields[idx].param_id;
            let label = self.form.fields[idx].label.clone();
            self.form.session.set_value(param_id, opt.clone());
            effects.push(Effect::Log(format!("set {label} = {opt:?}")));
        }
        self.form.editing = false;
        self.form.compute_dirty();
    }

    /// Left/Right on a select row while browsing: cycle through the options
    /// without opening the list.
    fn cycle_select(&mut self, dir: i64, effects: &mut Vec<Effect>) {
        let Some(idx) = self.field_idx() else {
            return;
        };
        let options = match &self.form.fields[idx].kind {
            FieldKind::Select { options, .. } if !options.is_empty() => options.clone(),
            _ => return,
        };
        let param_id = self.form.fields[idx].param_id;
        let label = self.form.fields[idx].label.clone();
        let stored = self.form.session.value(param_id).to_string();
        let pos = options.iter().position(|o| *o == stored);
        let next = match (pos, dir > 0) {
            (Some(p), true) => (p + 1) % options.len(),
            (Some(p), false) => (p + options.len() - 1) % options.len(),
            (None, true) => 0,
            (None, false) => options.len() - 1,
        };
        let opt = options[next].clone();
        self.form.session.set_value(param_id, opt.clone());
        effects.push(Effect::Log(format!("set {label} = {opt:?}")));
        self.form.sync_select_cursors();
        self.form.compute_dirty();
    }

    fn log_commit(&self, effects: &mut Vec<Effect>) {
        if self.form.selected == 0 {
            effects.push(Effect::Log(format!(
                "set name = {:?}",
                self.form.session.model().name
            )));
        } else if let Some(idx) = self.field_idx() {
            let fld = &self.form.fields[idx];
            effects.push(Effect::Log(format!(
                "set {} = {:?}",
                fld.label,
                self.form.session.value(fld.param_id)
            )));
        }
    }

    fn edit_push(&mut self, c: char) {
        if self.form.selected == 0 {
            let mut name = self.form.session.model().name.clone();
            name.push(c);
            self.form.session.set_name(name);
            self.form.compute_dirty();
            return;
        }
        let Some(idx) = self.field_idx() else {
            return;
        };
        let accepts = match self.form.fields[idx].kind {
            FieldKind::Text => true,
            FieldKind::Number => c.is_ascii_digit() || c == '.' || c == '-',
            _ => false,
        };
        if accepts {
            let param_id = self.form.fields[idx].param_id;
            let mut v = self.form.session.value(param_id).to_string();
            v.push(c);
            self.form.session.set_value(param_id, v);
            self.form.compute_dirty();
        }
    }

    fn edit_pop(&mut self) {
        if self.form.selected == 0 {
            let mut name = self.form.session.model().name.clone();
            name.pop();
            self.form.session.set_name(name);
            self.form.compute_dirty();
            return;
        }
        let Some(idx) = self.field_idx() else {
            return;
        };
        if matches!(
            self.form.fields[idx].kind,
            FieldKind::Text | FieldKind::Number
        ) {
            let param_id = self.form.fields[idx].param_id;
            let mut v = self.form.session.value(param_id).to_string();
            v.pop();
            self.form.session.set_value(param_id, v);
            self.form.compute_dirty();
        }
    }

    pub fn on_key(&mut self, key: KeyCode) -> Vec<Effect> {
        let mut effects: Vec<Effect> = Vec::new();
        match key {
            KeyCode::Up => {
                if self.form.editing {
                    self.adjust_edit(1);
                } else if self.form.selected > 0 {
                    self.form.selected -= 1;
                }
            }
            KeyCode::Down => {
                if self.form.editing {
                    self.adjust_edit(-1);
                } else if self.form.selected < self.form.cancel_idx() {
                    self.form.selected += 1;
                }
            }
            KeyCode::Left => {
                if self.form.editing {
                    self.commit_select(&mut effects);
                } else if self.field_idx().is_some() {
                    self.cycle_select(-1, &mut effects);
                } else if self.form.selected == self.form.cancel_idx() {
                    self.form.selected = self.form.reset_idx();
                } else if self.form.selected == self.form.reset_idx() {
                    self.form.selected = self.form.save_idx();
                }
            }
            KeyCode::Right => {
                if self.form.editing {
                    self.commit_select(&mut effects);
                } else if self.field_idx().is_some() {
                    self.cycle_select(1, &mut effects);
                } else if self.form.selected == self.form.save_idx() {
                    self.form.selected = self.form.reset_idx();
                } else if self.form.selected == self.form.reset_idx() {
                    self.form.selected = self.form.cancel_idx();
                }
            }
            KeyCode::Enter => {
                if self.form.editing {
                    let on_select = self
                        .field_idx()
                        .map(|i| matches!(self.form.fields[i].kind, FieldKind::Select { .. }))
                        .unwrap_or(false);
                    if on_select {
                        self.commit_select(&mut effects);
                    } else {
                        self.form.editing = false;
                        self.log_commit(&mut effects);
                        self.form.compute_dirty();
                    }
                } else if self.form.selected == self.form.save_idx() {
                    if validate_name(&mut self.form) {
                        effects.push(Effect::CommitModel(self.form.session.model().clone()));
                    }
                } else if self.form.selected == self.form.reset_idx() {
                    if self.form.dirty {
                        self.form.reset_to_initial();
                        effects.push(Effect::Log("editor: reset".into()));
                    }
                } else if self.form.selected == self.form.cancel_idx() {
                    effects.push(Effect::CloseEditor);
                } else if self.form.selected == 0 {
                    self.form.editing = true;
                    self.form.message = None;
                } else if let Some(idx) = self.field_idx() {
                    match self.form.fields[idx].kind {
                        FieldKind::Text | FieldKind::Number => {
                            self.form.editing = true;
                            self.form.message = None;
                        }
                        FieldKind::Select { .. } => {
                            self.form.sync_select_cursors();
                            self.form.editing = true;
                            self.form.message = None;
                        }
                        FieldKind::Unsupported { .. } => {}
                    }
                }
            }
            KeyCode::Backspace => {
                if self.form.editing {
                    self.edit_pop();
                }
            }
            KeyCode::Esc => {
                if self.form.editing {
                    // Selects keep their committed value; text rows already
                    // wrote through to the session
                    self.form.editing = false;
                    self.form.message = None;
                    self.form.sync_select_cursors();
                } else {
                    effects.push(Effect::CloseEditor);
                }
            }
            KeyCode::Char(c) => {
                if self.form.editing {
                    self.edit_push(c);
                }
            }
            _ => {}
        }
        effects
    }
}
