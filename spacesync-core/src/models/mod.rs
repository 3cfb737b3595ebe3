mod component;
mod component_group;
mod internal_tag;
mod preset;

pub use component::{Component, FieldDefinition, Schema, TagRef};
pub use component_group::ComponentGroup;
pub use internal_tag::{InternalTag, COMPONENT_OBJECT_TYPE};
pub use preset::Preset;
