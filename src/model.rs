use serde::Deserialize;

/// Value kind of a parameter. Unknown kind strings are kept verbatim so a
/// dataset written for a newer build still loads; rows with an unknown kind
/// render as a placeholder instead of failing the whole dialog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ParamKind {
    Text,
    Number,
    SingleSelect,
    Unknown(String),
}

impl Default for ParamKind {
    fn default() -> Self {
        ParamKind::Text
    }
}

impl From<String> for ParamKind {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "text" | "string" => ParamKind::Text,
            "number" => ParamKind::Number,
            "single-select" | "select" => ParamKind::SingleSelect,
            _ => ParamKind::Unknown(s),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ParamDef {
    pub id: u32,
    pub name: String,
    pub kind: ParamKind,
    // Static choices for selects; ignored for the color-designated parameter
    #[serde(default)]
    pub options: Option<Vec<String>>,
}

impl ParamDef {
    /// The color parameter draws its choices from the model's own color list
    /// instead of static options. Designation is by display name.
    pub fn is_color_designated(&self) -> bool {
        self.kind == ParamKind::SingleSelect && self.name.eq_ignore_ascii_case("color")
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ColorOption {
    pub id: u32,
    pub name: String,
}

/// One stored value. The list on a model is sparse and order-preserving;
/// values are strings regardless of the parameter's declared kind.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ParamValue {
    pub param_id: u32,
    pub value: String,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ProductModel {
    // 0 means not yet persisted; a real id is assigned on first save.
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub values: Vec<ParamValue>,
    #[serde(default)]
    pub colors: Vec<ColorOption>,
}

impl ProductModel {
    pub fn value_of(&self, param_id: u32) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.param_id == param_id)
            .map(|v| v.value.as_str())
    }

    /// Fresh model for the "add" flow: unsaved id, no values, and its own
    /// copy of the default color set.
    pub fn template(default_colors: &[ColorOption]) -> Self {
        Self {
            id: 0,
            name: String::new(),
            values: Vec::new(),
            colors: default_colors.to_vec(),
        }
    }
}

/// A named, ordered parameter schema. Immutable while an edit session is
/// open; switching the active schema re-reconciles any open session.
#[derive(Debug, Deserialize, Clone)]
pub struct ParamSchema {
    pub id: String,
    pub title: String,
    pub params: Vec<ParamDef>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Catalog {
    #[serde(default)]
    pub header: Option<String>,
    pub schemas: Vec<ParamSchema>,
    // Catalog-wide color registry; new models start with a copy of it
    #[serde(default)]
    pub palette: Vec<ColorOption>,
    #[serde(default)]
    pub models: Vec<ProductModel>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            header: Some("PARAMDESK".to_string()),
            schemas: vec![],
            palette: vec![],
            models: vec![],
        }
    }
}

impl Catalog {
    /// Built-in dataset used when no catalog file is found.
    pub fn sample() -> Self {
        fn color(id: u32, name: &str) -> ColorOption {
            ColorOption {
                id,
                name: name.to_string(),
            }
        }
        fn pv(param_id: u32, value: &str) -> ParamValue {
            ParamValue {
                param_id,
                value: value.to_string(),
            }
        }
        fn param(id: u32, name: &str, kind: ParamKind) -> ParamDef {
            ParamDef {
                id,
                name: name.to_string(),
                kind,
                options: None,
            }
        }

        let palette = vec![
            color(101, "Red"),
            color(102, "Blue"),
            color(103, "Green"),
            color(104, "Black"),
            color(105, "White"),
            color(106, "Yellow"),
        ];

        let standard = ParamSchema {
            id: "standard".to_string(),
            title: "Standard".to_string(),
            params: vec![
                param(1, "Purpose", ParamKind::Text),
                param(2, "Length", ParamKind::Text),
                param(3, "Quantity", ParamKind::Number),
                param(4, "Color", ParamKind::SingleSelect),
            ],
        };
        let extended = ParamSchema {
            id: "extended".to_string(),
            title: "Extended".to_string(),
            params: vec![
                param(1, "Purpose", ParamKind::Text),
                param(3, "Quantity", ParamKind::Number),
                ParamDef {
                    id: 5,
                    name: "Material".to_string(),
                    kind: ParamKind::SingleSelect,
                    options: Some(vec![
                        "Steel".to_string(),
                        "Aluminum".to_string(),
                        "Composite".to_string(),
                    ]),
                },
                param(4, "Color", ParamKind::SingleSelect),
            ],
        };

        Self {
            header: Some("PARAMDESK".to_string()),
            schemas: vec![standard, extended],
            models: vec![
                ProductModel {
                    id: 1,
                    name: "Model 'Alpha'".to_string(),
                    values: vec![
                        pv(1, "Primary"),
                        pv(2, "100 m"),
                        pv(3, "5"),
                        pv(4, "Red"),
                    ],
                    colors: vec![color(101, "Red"), color(102, "Blue"), color(104, "Black")],
                },
                ProductModel {
                    id: 2,
                    name: "Model 'Beta'".to_string(),
                    values: vec![
                        pv(1, "Special"),
                        pv(2, "250 m"),
                        pv(3, "12"),
                        pv(4, ""),
                    ],
                    colors: vec![
                        color(103, "Green"),
                        color(105, "White"),
                        color(101, "Red"),
                        color(102, "Blue"),
                        color(104, "Black"),
                    ],
                },
            ],
            palette,
        }
    }
}

pub(crate) fn validate_catalog(cat: &Catalog) -> Result<(), String> {
    use std::collections::HashSet;
    if cat.schemas.is_empty() {
        return Err("catalog has no parameter schemas".to_string());
    }
    let mut schema_ids = HashSet::new();
    for s in &cat.schemas {
        if !schema_ids.insert(&s.id) {
            return Err(format!("duplicate schema id: '{}'", s.id));
        }
        let mut ids = HashSet::new();
        for (i, p) in s.params.iter().enumerate() {
            if !ids.insert(p.id) {
                return Err(format!(
                    "schema '{}': duplicate parameter id {} at index {}",
                    s.id, p.id, i
                ));
            }
            if p.name.trim().is_empty() {
                return Err(format!("schema '{}': parameter {} has an empty name", s.id, p.id));
            }
            if let Some(opts) = &p.options {
                if opts.iter().any(|o| o.trim().is_empty()) {
                    return Err(format!(
                        "schema '{}': parameter {} has a blank option",
                        s.id, p.id
                    ));
                }
            }
        }
    }
    let mut color_ids = HashSet::new();
    for c in &cat.palette {
        if !color_ids.insert(c.id) {
            return Err(format!("duplicate palette color id {}", c.id));
        }
    }
    let mut model_ids = HashSet::new();
    for m in &cat.models {
        if m.id == 0 {
            return Err(format!(
                "model '{}' has id 0 (reserved for unsaved models)",
                m.name
            ));
        }
        if !model_ids.insert(m.id) {
            return Err(format!("duplicate model id {}", m.id));
        }
    }
    Ok(())
}
