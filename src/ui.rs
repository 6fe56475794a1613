use crate::app::{update, AppMsg, Effect};
use crate::model::{validate_catalog, Catalog, ParamDef, ParamSchema};
use crate::widgets::card::{card_text, draw_card};
use crate::widgets::editor::EditorWidget;
use crate::widgets::model_list::draw_model_list;
use crate::widgets::schema_tabs;
use crate::widgets::status_bar::draw_footer_combined;
use anyhow::{Context, Result};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::widgets::*;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Default)]
pub(crate) struct AppState {
    pub(crate) catalog: Catalog,
    pub(crate) catalog_path: Option<PathBuf>,
    pub(crate) schema_index: usize,
    pub(crate) selected: usize,
    // Browser list viewport (for PgUp/PgDn)
    pub(crate) list_viewport_h: u16,
    pub(crate) editor: Option<EditorWidget>,
    pub(crate) tick: u64,
    pub(crate) toast: Option<Toast>,
    pub(crate) theme: crate::theme::Theme,
    // Mutation log (rendered in the bottom debug pane)
    pub(crate) debug_log: VecDeque<String>,
}

impl AppState {
    pub fn dbg(&mut self, msg: impl Into<String>) {
        const MAX_LOG_LINES: usize = 200;
        if self.debug_log.len() >= MAX_LOG_LINES {
            self.debug_log.pop_front();
        }
        self.debug_log.push_back(msg.into());
    }

    pub(crate) fn active_schema(&self) -> Option<&ParamSchema> {
        self.catalog.schemas.get(self.schema_index)
    }

    pub(crate) fn active_params(&self) -> &[ParamDef] {
        self.active_schema()
            .map(|s| s.params.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Clone, Copy)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

pub struct Toast {
    pub text: String,
    pub level: ToastLevel,
    pub expires_at_tick: u64,
}

fn run_effects(state: &mut AppState, effects: Vec<Effect>) {
    for eff in effects {
        match eff {
            Effect::CommitModel(model) => {
                let more = update(state, AppMsg::CommitModel(model));
                run_effects(state, more);
            }
            Effect::CloseEditor => {
                let more = update(state, AppMsg::CloseEditor);
                run_effects(state, more);
            }
            Effect::ShowToast {
                text,
                level,
                seconds,
            } => {
                let ticks = seconds.saturating_mul(5); // ~200ms tick
                let exp = state.tick.saturating_add(ticks);
                state.toast = Some(Toast {
                    text,
                    level,
                    expires_at_tick: exp,
                });
            }
            Effect::Log(msg) => state.dbg(msg),
        }
    }
}

pub fn run() -> Result<()> {
    let (catalog, catalog_path) = load_catalog()?;
    let mut state = AppState {
        catalog,
        catalog_path,
        theme: crate::theme::Theme::steel_dark(),
        ..Default::default()
    };
    match state.catalog_path.clone() {
        Some(p) => state.dbg(format!("catalog: {}", p.display())),
        None => state.dbg("catalog: built-in sample"),
    }

    // Headless smoke mode
    let headless = std::env::var("PARAMDESK_HEADLESS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes"))
        .unwrap_or(false);
    let headless_ticks: u64 = std::env::var("PARAMDESK_TICKS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(10);
    let headless_edit: Option<u32> = std::env::var("PARAMDESK_HEADLESS_EDIT")
        .ok()
        .and_then(|s| s.parse::<u32>().ok());
    if headless {
        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend)?;
        let mut edit_done = false;
        for _ in 0..headless_ticks {
            if !edit_done {
                if let Some(id) = headless_edit {
                    let effs = if id == 0 {
                        update(&mut state, AppMsg::OpenNewModel)
                    } else {
                        update(&mut state, AppMsg::OpenEditor { model_id: id })
                    };
                    run_effects(&mut state, effs);
                    edit_done = true;
                }
            }
            terminal.draw(|f| ui(f, &mut state))?;
            state.tick = state.tick.wrapping_add(1);
        }
        let summary = serde_json::json!({
            "ok": true,
            "models": state.catalog.models.len(),
            "schema": state.active_schema().map(|s| s.id.clone()),
            "editing": state.editor.is_some(),
        });
        println!("{summary}");
        return Ok(());
    }

    // Setup terminal (interactive)
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();
    let res: Result<()> = loop {
        if let Err(e) = terminal.draw(|f| ui(f, &mut state)) {
            break Err(e.into());
        }
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_millis(0));
        match event::poll(timeout) {
            Err(e) => break Err(e.into()),
            Ok(false) => {}
            Ok(true) => match event::read() {
                Err(e) => break Err(e.into()),
                Ok(Event::Key(key)) => match key.code {
                    // F-keys switch the active schema even while a dialog
                    // is open (the open session re-reconciles)
                    KeyCode::F(n) if (1..=12).contains(&n) => {
                        if let Some(idx) = schema_tabs::handle_function_key(&state, n) {
                            let effs = update(&mut state, AppMsg::SwitchSchema(idx));
                            run_effects(&mut state, effs);
                        }
                    }
                    code => {
                        if state.editor.is_some() {
                            // The dialog traps all other input while open
                            let effs = match &mut state.editor {
                                Some(ed) => ed.on_key(code),
                                None => Vec::new(),
                            };
                            run_effects(&mut state, effs);
                        } else if !handle_browser_key(&mut state, code) {
                            break Ok(());
                        }
                    }
                },
                Ok(_) => {}
            },
        }
        if last_tick.elapsed() >= tick_rate {
            state.tick = state.tick.wrapping_add(1);
            last_tick = Instant::now();
        }
    };
    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    res
}

/// Browser-mode keys. Returns false when the app should quit.
fn handle_browser_key(state: &mut AppState, code: KeyCode) -> bool {
    let total = state.catalog.models.len();
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return false,
        KeyCode::Up => state.selected = state.selected.saturating_sub(1),
        KeyCode::Down => {
            if state.selected + 1 < total {
                state.selected += 1;
            }
        }
        KeyCode::Home => state.selected = 0,
        KeyCode::End => state.selected = total.saturating_sub(1),
        KeyCode::PageUp => {
            let page = state.list_viewport_h.max(1) as usize;
            state.selected = state.selected.saturating_sub(page);
        }
        KeyCode::PageDown => {
            let page = state.list_viewport_h.max(1) as usize;
            state.selected = (state.selected + page).min(total.saturating_sub(1));
        }
        KeyCode::Enter => {
            if let Some(m) = state.catalog.models.get(state.selected) {
                let id = m.id;
                let effs = update(state, AppMsg::OpenEditor { model_id: id });
                run_effects(state, effs);
            }
        }
        KeyCode::Char('n') => {
            let effs = update(state, AppMsg::OpenNewModel);
            run_effects(state, effs);
        }
        KeyCode::Char('y') => copy_card(state),
        _ => {}
    }
    true
}

fn copy_card(state: &mut AppState) {
    let Some((id, text)) = state
        .catalog
        .models
        .get(state.selected)
        .map(|m| (m.id, card_text(m, state.active_params())))
    else {
        return;
    };
    if let Ok(mut clipboard) = arboard::Clipboard::new() {
        let _ = clipboard.set_text(&text);
        state.dbg(format!("copied card: model {id}"));
        run_effects(
            state,
            vec![Effect::ShowToast {
                text: "Copied to clipboard".into(),
                level: ToastLevel::Success,
                seconds: 2,
            }],
        );
    }
}

fn load_catalog() -> Result<(Catalog, Option<PathBuf>)> {
    // 1) Explicit path via PARAMDESK_CATALOG
    if let Ok(path) = std::env::var("PARAMDESK_CATALOG") {
        let p = PathBuf::from(&path);
        let s = fs::read_to_string(&p).with_context(|| format!("reading catalog: {p:?}"))?;
        let cat = parse_catalog(&p, &s)?;
        return Ok((cat, Some(p)));
    }
    // 2) paramdesk.yaml in CWD or any ancestor
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut cur = Some(cwd.as_path());
    while let Some(dir) = cur {
        let p = dir.join("paramdesk.yaml");
        if p.exists() {
            let s = fs::read_to_string(&p).with_context(|| format!("reading catalog: {p:?}"))?;
            let cat = parse_catalog(&p, &s)?;
            return Ok((cat, Some(p)));
        }
        cur = dir.parent();
    }
    // 3) Built-in sample dataset
    Ok((Catalog::sample(), None))
}

fn parse_catalog(path: &Path, s: &str) -> Result<Catalog> {
    let cat: Catalog = if path.extension().and_then(|e| e.to_str()) == Some("json") {
        serde_json::from_str(s).with_context(|| format!("parsing catalog: {path:?}"))?
    } else {
        serde_yaml::from_str(s).with_context(|| format!("parsing catalog: {path:?}"))?
    };
    validate_catalog(&cat).map_err(|e| anyhow::anyhow!("invalid catalog {path:?}: {e}"))?;
    Ok(cat)
}

const DEBUG_H: u16 = 4;

fn ui(f: &mut Frame, state: &mut AppState) {
    // Clear expired toast
    if let Some(t) = &state.toast {
        if state.tick >= t.expires_at_tick {
            state.toast = None;
        }
    }

    // Fill entire screen with theme background
    let screen = f.area();
    let bg = Block::default().style(Style::default().bg(state.theme.bg));
    f.render_widget(bg, screen);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(2), // Schema tabs
            Constraint::Min(0),    // Browser
            Constraint::Length(DEBUG_H),
            Constraint::Length(1), // Footer
        ])
        .split(screen);

    draw_header_line(f, chunks[0], state);
    schema_tabs::draw_schema_tabs(f, chunks[1], state);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
        .split(chunks[2]);
    state.list_viewport_h = main[0].height.saturating_sub(2);
    draw_model_list(f, main[0], state, state.editor.is_none());
    draw_card(f, main[1], state);

    draw_debug(f, chunks[3], state);

    let help_text = match &state.editor {
        Some(ed) if ed.form.editing => {
            "Enter commit  Up/Down adjust  Backspace delete  Esc stop editing"
        }
        Some(_) => "Up/Down rows  Enter edit/activate  Left/Right cycle  F-keys schema  Esc close",
        None => "Up/Down select  Enter edit  n new  y copy  F-keys schema  q quit",
    };
    draw_footer_combined(f, chunks[4], state, help_text);

    // Edit dialog as a centered modal over the browser
    if state.editor.is_some() {
        let rect = centered_rect(62, 80, screen);
        f.render_widget(Clear, rect);
        let cursor_on = state.tick % 2 == 0;
        if let Some(ed) = &mut state.editor {
            ed.render(f, rect, cursor_on);
        }
    }
}

fn draw_header_line(f: &mut Frame, area: Rect, state: &AppState) {
    let title = state
        .catalog
        .header
        .clone()
        .unwrap_or_else(|| "PARAMDESK".to_string());
    let line = Line::from(vec![
        Span::styled(title, state.theme.title_style().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  | {} models", state.catalog.models.len()),
            state.theme.text_muted(),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_debug(f: &mut Frame, area: Rect, state: &AppState) {
    let b = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            "Debug",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        ));
    // Take last `area.height` lines
    let h = area.height as usize;
    let mut lines: Vec<Line> = Vec::new();
    let total = state.debug_log.len();
    let start = total.saturating_sub(h);
    for s in state.debug_log.iter().skip(start) {
        lines.push(Line::raw(s.clone()));
    }
    let p = Paragraph::new(lines)
        .style(Style::default().fg(Color::Gray))
        .block(b)
        .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(area);
    let h = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(v[1]);
    h[1]
}
