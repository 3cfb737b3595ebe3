//! Create and update payloads for target components.

use serde_json::{Map, Value};

use super::options::MergeMode;
use crate::models::{Component, Schema};

/// Top-level fields of a component request body.
pub type Payload = Map<String, Value>;

/// Remote-assigned fields never sent on create.
const TRANSIENT_FIELDS: [&str; 2] = ["id", "created_at"];

/// Listing-only fields of a target component, never written back.
const LISTING_FIELDS: [&str; 2] = ["internal_tags_list", "all_presets"];

/// References already translated to the target space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedRefs {
    /// `None` leaves the component outside any group
    pub component_group_uuid: Option<String>,
    pub internal_tag_ids: Vec<String>,
    pub schema: Schema,
}

/// Builds the create payload from a source component.
///
/// Transient fields are dropped. The schema, group and tag ids come from
/// `resolved`; the source's raw tag fields are not carried over.
pub fn source_payload(component: &Component, resolved: ResolvedRefs) -> Payload {
    let mut payload = Payload::new();
    payload.insert("name".to_string(), Value::from(component.name.clone()));
    payload.extend(component.extra.clone());
    for field in TRANSIENT_FIELDS {
        payload.remove(field);
    }

    payload.insert("schema".to_string(), Value::Object(resolved.schema));
    payload.insert(
        "component_group_uuid".to_string(),
        resolved.component_group_uuid.map_or(Value::Null, Value::from),
    );
    payload.insert(
        "internal_tag_ids".to_string(),
        Value::from(resolved.internal_tag_ids),
    );
    payload
}

/// Builds the update payload for an existing target component.
///
/// `source` is a payload from [`source_payload`]. With
/// [`MergeMode::Overlay`] the target's fields are kept and overwritten by the
/// source's on collision. The schema and tag ids always come from `source`.
pub fn update_payload(source: &Payload, target: &Component, mode: MergeMode) -> Payload {
    let mut payload = match mode {
        MergeMode::Replace => source.clone(),
        MergeMode::Overlay => {
            let mut merged = component_fields(target);
            merged.extend(source.clone());
            merged
        }
    };

    for forced in ["schema", "internal_tag_ids"] {
        if let Some(value) = source.get(forced) {
            payload.insert(forced.to_string(), value.clone());
        }
    }
    payload
}

fn component_fields(component: &Component) -> Payload {
    let mut fields = match serde_json::to_value(component) {
        Ok(Value::Object(fields)) => fields,
        _ => Payload::new(),
    };
    for field in LISTING_FIELDS {
        fields.remove(field);
    }
    fields
}
