use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A saved default field configuration bound to a component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<u64>,
    /// Preset body. Absent when listed as part of a component's `all_presets`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Preset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            component_id: None,
            preset: None,
            image: None,
            description: None,
            extra: Map::new(),
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_component_id(mut self, component_id: u64) -> Self {
        self.component_id = Some(component_id);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.preset = Some(body);
        self
    }
}
