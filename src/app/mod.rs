use crate::model::ProductModel;
use crate::ui::{AppState, ToastLevel};
use crate::widgets::editor::EditorWidget;
use crate::widgets::form::EditorState;

pub enum AppMsg {
    OpenEditor { model_id: u32 },
    OpenNewModel,
    SwitchSchema(usize),
    CommitModel(ProductModel),
    CloseEditor,
}

pub enum Effect {
    CommitModel(ProductModel),
    CloseEditor,
    ShowToast {
        text: String,
        level: ToastLevel,
        seconds: u64,
    },
    Log(String),
}

pub fn update(state: &mut AppState, msg: AppMsg) -> Vec<Effect> {
    use AppMsg::*;
    let mut effects: Vec<Effect> = Vec::new();
    match msg {
        OpenEditor { model_id } => {
            let Some(model) = state
                .catalog
                .models
                .iter()
                .find(|m| m.id == model_id)
                .cloned()
            else {
                state.dbg(format!("open editor: no model with id {model_id}"));
                return effects;
            };
            let params = state.active_params().to_vec();
            let title = format!("Edit {}", model.name);
            state.dbg(format!("open editor: model {model_id}"));
            state.editor = Some(EditorWidget::new(EditorState::open(title, model, &params)));
        }
        OpenNewModel => {
            let params = state.active_params().to_vec();
            let model = ProductModel::template(&state.catalog.palette);
            state.dbg("open editor: new model");
            state.editor = Some(EditorWidget::new(EditorState::open(
                "New Model".to_string(),
                model,
                &params,
            )));
        }
        SwitchSchema(index) => {
            if index >= state.catalog.schemas.len() || index == state.schema_index {
                return effects;
            }
            state.schema_index = index;
            let params = state.catalog.schemas[index].params.clone();
            state.dbg(format!(
                "switch schema: {}",
                state.catalog.schemas[index].id
            ));
            // An open dialog re-reconciles against the new schema in place
            if let Some(ed) = &mut state.editor {
                ed.form.rebind(&params);
            }
        }
        CommitModel(model) => {
            let id = commit_model(&mut state.catalog.models, model);
            if let Some(pos) = state.catalog.models.iter().position(|m| m.id == id) {
                state.selected = pos;
            }
            state.editor = None;
            state.dbg(format!("saved model {id}"));
            effects.push(Effect::ShowToast {
                text: format!("Saved model {id}"),
                level: ToastLevel::Success,
                seconds: 2,
            });
        }
        CloseEditor => {
            state.dbg("editor closed");
            state.editor = None;
        }
    }
    effects
}

/// Merge an edited snapshot into the collection: replace the entry with the
/// same id, or append. An unsaved model (id 0) gets max existing id + 1.
pub fn commit_model(models: &mut Vec<ProductModel>, mut model: ProductModel) -> u32 {
    if model.id == 0 {
        model.id = models.iter().map(|m| m.id).max().unwrap_or(0) + 1;
    }
    let id = model.id;
    match models.iter_mut().find(|m| m.id == id) {
        Some(slot) => *slot = model,
        None => models.push(model),
    }
    id
}

// Keep test module at the very end to satisfy clippy::items-after-test-module
#[cfg(test)]
mod tests;
