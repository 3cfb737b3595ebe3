use serde::{Deserialize, Serialize};

/// Object type used for tags attached to components.
pub const COMPONENT_OBJECT_TYPE: &str = "component";

/// A space-scoped label. Matched across spaces by `name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InternalTag {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub object_type: Option<String>,
}

impl InternalTag {
    /// Returns true if the tag can be attached to components.
    ///
    /// Tags without an object type are treated as component tags.
    pub fn is_component_tag(&self) -> bool {
        self.object_type
            .as_deref()
            .map_or(true, |t| t == COMPONENT_OBJECT_TYPE)
    }
}
