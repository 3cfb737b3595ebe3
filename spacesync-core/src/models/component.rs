use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::Preset;

/// Mapping of field name to field definition, in the order the API returned it.
pub type Schema = Map<String, Value>;

/// Field types whose definition carries a `component_group_whitelist`.
const WHITELIST_FIELD_TYPES: [&str; 2] = ["bloks", "richtext"];

/// A reusable content-schema definition.
///
/// `name` is the natural key used to match a component across spaces.
/// Fields this crate does not interpret are kept in `extra` and sent back
/// untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Component {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub schema: Schema,
    #[serde(default)]
    pub component_group_uuid: Option<String>,
    #[serde(default, deserialize_with = "lenient_ids")]
    pub internal_tag_ids: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub internal_tags_list: Vec<TagRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub all_presets: Vec<Preset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            schema: Schema::new(),
            component_group_uuid: None,
            internal_tag_ids: Vec::new(),
            internal_tags_list: Vec::new(),
            all_presets: Vec::new(),
            created_at: None,
            extra: Map::new(),
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_group(mut self, group_uuid: impl Into<String>) -> Self {
        self.component_group_uuid = Some(group_uuid.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, field: Value) -> Self {
        self.schema.insert(name.into(), field);
        self
    }

    pub fn with_tags(mut self, tags: Vec<TagRef>) -> Self {
        self.internal_tags_list = tags;
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Tag reference embedded in a component's `internal_tags_list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagRef {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
}

impl TagRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// One entry of a component schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDefinition {
    #[serde(rename = "type", default)]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_group_whitelist: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldDefinition {
    /// Returns true for `bloks` and `richtext` fields.
    pub fn carries_group_whitelist(&self) -> bool {
        Self::is_whitelist_type(&self.field_type)
    }

    /// Whether fields of `field_type` carry a `component_group_whitelist`.
    pub fn is_whitelist_type(field_type: &str) -> bool {
        WHITELIST_FIELD_TYPES.contains(&field_type)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Tag ids arrive as strings or numbers depending on the endpoint.
fn lenient_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect())
}
