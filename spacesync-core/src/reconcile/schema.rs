//! Translation of group references embedded in component schemas.

use serde_json::Value;

use super::groups::GroupSnapshot;
use crate::models::{FieldDefinition, Schema};

/// Maps source group uuids to the uuids of same-named target groups.
///
/// Entries without a target counterpart are dropped.
pub fn remap_whitelist<'s, I>(whitelist: I, groups: &GroupSnapshot) -> Vec<String>
where
    I: IntoIterator<Item = &'s str>,
{
    whitelist
        .into_iter()
        .filter_map(|uuid| groups.translate(uuid))
        .map(str::to_string)
        .collect()
}

/// Rebuilds a source schema for the target space.
///
/// `bloks` and `richtext` fields get their `component_group_whitelist`
/// rewritten; every other field is copied as is. Field order is kept.
pub fn remap_schema(schema: &Schema, groups: &GroupSnapshot) -> Schema {
    schema
        .iter()
        .map(|(name, field)| (name.clone(), remap_field(field, groups)))
        .collect()
}

/// Reads the raw field so a malformed whitelist is still rewritten. Entries
/// that are not strings are dropped along with unresolvable ones.
fn remap_field(field: &Value, groups: &GroupSnapshot) -> Value {
    let field_type = field.get("type").and_then(Value::as_str).unwrap_or_default();
    if !FieldDefinition::is_whitelist_type(field_type) {
        return field.clone();
    }

    let whitelist: Vec<String> = field
        .get("component_group_whitelist")
        .and_then(Value::as_array)
        .map(|entries| remap_whitelist(entries.iter().filter_map(Value::as_str), groups))
        .unwrap_or_default();

    let mut field = field.clone();
    if let Some(object) = field.as_object_mut() {
        object.insert(
            "component_group_whitelist".to_string(),
            Value::from(whitelist),
        );
    }
    field
}
