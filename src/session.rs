use crate::model::{ParamDef, ParamKind, ParamValue, ProductModel};

/// Default string for a parameter with no stored value.
pub fn default_value(kind: &ParamKind) -> &'static str {
    match kind {
        ParamKind::Number => "0",
        _ => "",
    }
}

/// Option source for a select parameter: the model's own color names when
/// the parameter is color-designated, else its static options, else empty.
pub fn select_options(param: &ParamDef, model: &ProductModel) -> Vec<String> {
    if param.is_color_designated() {
        model.colors.iter().map(|c| c.name.clone()).collect()
    } else {
        param.options.clone().unwrap_or_default()
    }
}

/// Complete a sparse value list against a schema.
///
/// Every parameter in `params` gets exactly one entry, in schema order: the
/// stored value when present, else a kind-appropriate default. The
/// color-designated parameter only keeps a stored value that names one of
/// the model's current colors; a stale value resets to "". Entries whose
/// parameter id is not in the schema are preserved verbatim after the
/// schema-ordered ones.
pub fn reconcile(params: &[ParamDef], model: &ProductModel) -> Vec<ParamValue> {
    let mut out: Vec<ParamValue> = Vec::with_capacity(params.len().max(model.values.len()));
    for p in params {
        let value = match model.value_of(p.id) {
            Some(v) if p.is_color_designated() => {
                if model.colors.iter().any(|c| c.name == v) {
                    v.to_string()
                } else {
                    String::new()
                }
            }
            Some(v) => v.to_string(),
            None => default_value(&p.kind).to_string(),
        };
        out.push(ParamValue {
            param_id: p.id,
            value,
        });
    }
    for v in &model.values {
        if !params.iter().any(|p| p.id == v.param_id) {
            out.push(v.clone());
        }
    }
    out
}

/// Live edit session over one model. Owns the authoritative in-progress
/// copy; the backing collection is only touched when the host commits the
/// snapshot, so closing without saving is a plain drop.
#[derive(Debug, Clone)]
pub struct EditSession {
    params: Vec<ParamDef>,
    model: ProductModel,
}

impl EditSession {
    /// Open a session: reconcile the model against the schema once.
    pub fn open(model: ProductModel, params: &[ParamDef]) -> Self {
        let mut s = Self {
            params: params.to_vec(),
            model,
        };
        s.model.values = reconcile(&s.params, &s.model);
        s
    }

    /// Swap in a different schema while open and re-reconcile.
    pub fn rebind(&mut self, params: &[ParamDef]) {
        self.params = params.to_vec();
        self.model.values = reconcile(&self.params, &self.model);
    }

    pub fn params(&self) -> &[ParamDef] {
        &self.params
    }

    /// Current full snapshot; reflects every set_value/set_name since open.
    pub fn model(&self) -> &ProductModel {
        &self.model
    }

    pub fn into_model(self) -> ProductModel {
        self.model
    }

    pub fn value(&self, param_id: u32) -> &str {
        self.model.value_of(param_id).unwrap_or("")
    }

    /// Store raw widget output for one parameter: replace the existing entry
    /// or append a new one. No coercion, no validation.
    pub fn set_value(&mut self, param_id: u32, value: String) {
        match self
            .model
            .values
            .iter_mut()
            .find(|v| v.param_id == param_id)
        {
            Some(slot) => slot.value = value,
            None => self.model.values.push(ParamValue { param_id, value }),
        }
    }

    pub fn set_name(&mut self, name: String) {
        self.model.name = name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColorOption;

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
    fn reconcile_completes_every_schema_param() {
        let vals = reconcile(&schema(), &beta());
        assert_eq!(vals.len(), 3);
        assert_eq!(vals[0], ParamValue { param_id: 1, value: "Special".into() });
        assert_eq!(vals[1], ParamValue { param_id: 3, value: "0".into() });
        assert_eq!(vals[2], ParamValue { param_id: 4, value: "".into() });
    }

    #[test]
    fn reconcile_preserves_entries_outside_schema() {
        let mut m = beta();
        m.values.insert(
            0,
            ParamValue {
                param_id: 9,
                value: "legacy".into(),
            },
        );
        let vals = reconcile(&schema(), &m);
        assert_eq!(vals.len(), 4);
        assert_eq!(vals[3], ParamValue { param_id: 9, value: "legacy".into() });
    }

    #[test]
    fn defaults_are_kind_appropriate() {
        let empty = ProductModel::default();
        let vals = reconcile(&schema(), &empty);
        assert_eq!(vals[0].value, "");
        assert_eq!(vals[1].value, "0");
        assert_eq!(vals[2].value, "");
    }

    #[test]
    fn unknown_kind_defaults_to_empty() {
        let params = vec![ParamDef {
            id: 8,
            name: "Finish".into(),
            kind: ParamKind::Unknown("gradient".into()),
            options: None,
        }];
        let vals = reconcile(&params, &ProductModel::default());
        assert_eq!(vals[0].value, "");
    }

    #[test]
    fn stale_color_value_resets_to_empty() {
        let mut m = beta();
        m.values[1].value = "Green".into();
        let vals = reconcile(&schema(), &m);
        assert_eq!(vals[2].value, "");
    }

    #[test]
    fn matching_color_value_survives() {
        let mut m = beta();
        m.values[1].value = "Blue".into();
        let vals = reconcile(&schema(), &m);
        assert_eq!(vals[2].value, "Blue");
    }

    #[test]
    fn non_color_select_values_are_not_checked() {
        let params = vec![ParamDef {
            id: 5,
            name: "Material".into(),
            kind: ParamKind::SingleSelect,
            options: Some(vec!["Steel".into(), "Aluminum".into()]),
        }];
        let m = ProductModel {
            values: vec![ParamValue {
                param_id: 5,
                value: "Wood".into(),
            }],
            ..Default::default()
        };
        assert_eq!(reconcile(&params, &m)[0].value, "Wood");
    }

    #[test]
    fn reconcile_is_idempotent() {
        let mut m = beta();
        m.values.push(ParamValue {
            param_id: 9,
            value: "legacy".into(),
        });
        let once = reconcile(&schema(), &m);
        let mut again_input = m.clone();
        again_input.values = once.clone();
        assert_eq!(reconcile(&schema(), &again_input), once);
    }

    #[test]
    fn set_value_changes_exactly_one_entry() {
        let mut s = EditSession::open(beta(), &schema());
        let before = s.model().values.clone();
        s.set_value(3, "7".into());
        let after = &s.model().values;
        assert_eq!(after.len(), before.len());
        for (b, a) in before.iter().zip(after.iter()) {
            if b.param_id == 3 {
                assert_eq!(a.value, "7");
            } else {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn set_value_appends_when_absent() {
        let mut s = EditSession::open(beta(), &schema());
        let n = s.model().values.len();
        s.set_value(9, "legacy".into());
        assert_eq!(s.model().values.len(), n + 1);
        assert_eq!(s.value(9), "legacy");
    }

    #[test]
    fn set_name_leaves_values_untouched() {
        let mut s = EditSession::open(beta(), &schema());
        let before = s.model().values.clone();
        s.set_name("Beta II".into());
        assert_eq!(s.model().name, "Beta II");
        assert_eq!(&s.model().values, &before);
    }

    #[test]
    fn rebind_re_reconciles_and_keeps_extras() {
        let mut s = EditSession::open(beta(), &schema());
        s.set_value(3, "12".into());
        let narrow = vec![ParamDef {
            id: 1,
            name: "Purpose".into(),
            kind: ParamKind::Text,
            options: None,
        }];
        s.rebind(&narrow);
        assert_eq!(s.value(3), "12");
        assert_eq!(s.value(4), "");
        s.rebind(&schema());
        let vals = &s.model().values;
        assert_eq!(vals[1], ParamValue { param_id: 3, value: "12".into() });
    }

    #[test]
    fn open_keeps_the_model_color_list() {
        let s = EditSession::open(beta(), &schema());
        assert_eq!(s.model().colors.len(), 2);
        assert_eq!(s.model().colors[0].name, "Red");
    }

    #[test]
    fn select_options_follow_the_color_designation() {
        let m = beta();
        let color_param = &schema()[2];
        assert_eq!(select_options(color_param, &m), vec!["Red", "Blue"]);
        let material = ParamDef {
            id: 5,
            name: "Material".into(),
            kind: ParamKind::SingleSelect,
            options: Some(vec!["Steel".into()]),
        };
        assert_eq!(select_options(&material, &m), vec!["Steel"]);
        let bare = ParamDef {
            id: 6,
            name: "Grade".into(),
            kind: ParamKind::SingleSelect,
            options: None,
        };
        assert!(select_options(&bare, &m).is_empty());
    }
}
