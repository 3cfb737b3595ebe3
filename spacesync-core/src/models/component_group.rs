use serde::{Deserialize, Serialize};

/// A named category of components.
///
/// The `uuid` is only meaningful inside its own space. Across spaces a
/// group is identified by `name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentGroup {
    pub uuid: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl ComponentGroup {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            id: None,
        }
    }
}
