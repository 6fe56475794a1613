use super::*;
use crate::model::{Catalog, ParamValue};

fn sample_state() -> AppState {
    AppState {
        catalog: Catalog::sample(),
        ..Default::default()
    }
}

#[test]
fn open_editor_reconciles_the_selected_model() {
    let mut st = sample_state();
    let effs = update(&mut st, AppMsg::OpenEditor { model_id: 2 });
    assert!(effs.is_empty());
    let ed = st.editor.as_ref().expect("editor open");
    let m = ed.form.session.model();
    assert_eq!(m.id, 2);
    // Standard schema: one row (and one value entry) per parameter
    assert_eq!(ed.form.fields.len(), 4);
    assert_eq!(m.values.len(), 4);
    assert_eq!(ed.form.session.value(3), "12");
}

#[test]
fn open_editor_ignores_an_unknown_id() {
    let mut st = sample_state();
    let _ = update(&mut st, AppMsg::OpenEditor { model_id: 99 });
    assert!(st.editor.is_none());
}

#[test]
fn open_new_model_copies_the_palette() {
    let mut st = sample_state();
    let _ = update(&mut st, AppMsg::OpenNewModel);
    let ed = st.editor.as_ref().expect("editor open");
    let m = ed.form.session.model();
    assert_eq!(m.id, 0);
    assert_eq!(m.name, "");
    assert_eq!(m.colors.len(), st.catalog.palette.len());
    // Template starts empty; reconciliation fills the defaults
    assert_eq!(ed.form.session.value(3), "0");
}

#[test]
fn switch_schema_rebinds_an_open_editor() {
    let mut st = sample_state();
    let _ = update(&mut st, AppMsg::OpenEditor { model_id: 1 });
    let _ = update(&mut st, AppMsg::SwitchSchema(1));
    assert_eq!(st.schema_index, 1);
    let ed = st.editor.as_ref().expect("editor open");
    // Extended schema: Purpose, Quantity, Material, Color
    assert_eq!(ed.form.fields.len(), 4);
    // The Length entry (not in the Extended schema) survives as an extra
    assert_eq!(ed.form.session.value(2), "100 m");
}

#[test]
fn switch_schema_out_of_range_or_same_is_a_no_op() {
    let mut st = sample_state();
    let _ = update(&mut st, AppMsg::SwitchSchema(9));
    assert_eq!(st.schema_index, 0);
    let _ = update(&mut st, AppMsg::SwitchSchema(0));
    assert_eq!(st.schema_index, 0);
}

#[test]
fn commit_new_model_allocates_the_next_id() {
    let mut st = sample_state();
    st.catalog.models.push(ProductModel {
        id: 3,
        name: "Model 'Gamma'".into(),
        ..Default::default()
    });
    let mut m = ProductModel::template(&st.catalog.palette);
    m.name = "Model 'Delta'".into();
    let effs = update(&mut st, AppMsg::CommitModel(m));
    assert!(matches!(effs.as_slice(), [Effect::ShowToast { .. }]));
    assert_eq!(st.catalog.models.len(), 4);
    let saved = st.catalog.models.last().unwrap();
    assert_eq!(saved.id, 4);
    assert_eq!(saved.name, "Model 'Delta'");
    assert!(st.editor.is_none());
    // Selection follows the saved model
    assert_eq!(st.selected, 3);
}

#[test]
fn commit_existing_model_replaces_in_place() {
    let mut st = sample_state();
    let mut m = st.catalog.models[0].clone();
    m.name = "Model 'Alpha' rev B".into();
    m.values.push(ParamValue {
        param_id: 9,
        value: "legacy".into(),
    });
    let _ = update(&mut st, AppMsg::CommitModel(m));
    assert_eq!(st.catalog.models.len(), 2);
    assert_eq!(st.catalog.models[0].name, "Model 'Alpha' rev B");
    assert_eq!(st.catalog.models[0].value_of(9), Some("legacy"));
}

#[test]
fn close_editor_discards_without_touching_the_collection() {
    let mut st = sample_state();
    let before = st.catalog.models.clone();
    let _ = update(&mut st, AppMsg::OpenEditor { model_id: 1 });
    if let Some(ed) = &mut st.editor {
        ed.form.session.set_value(1, "Scrapped".into());
        ed.form.session.set_name("Scrapped".into());
    }
    let _ = update(&mut st, AppMsg::CloseEditor);
    assert!(st.editor.is_none());
    assert_eq!(st.catalog.models, before);
}

#[test]
fn commit_model_keeps_explicit_ids() {
    let mut models = Catalog::sample().models;
    let id = commit_model(
        &mut models,
        ProductModel {
            id: 7,
            name: "Model 'Eta'".into(),
            ..Default::default()
        },
    );
    assert_eq!(id, 7);
    assert_eq!(models.len(), 3);
}
