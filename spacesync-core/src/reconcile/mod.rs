//! Cross-space reconciliation engine.
//!
//! A run first makes sure every source component group exists in the
//! target space ([`GroupReconciler`]), then walks the source components in
//! order ([`ComponentReconciler`]). For each component it resolves group and
//! tag references by name, rewrites group uuids embedded in the schema, and
//! creates or updates the target component before reconciling its presets.
//!
//! Everything is sequential. Entities created during a run are appended to
//! the in-memory snapshots so later lookups in the same run see them. Nothing
//! on the target side is ever deleted.

mod components;
mod error;
mod groups;
mod options;
mod payload;
mod presets;
mod report;
mod schema;
mod tags;

pub use components::ComponentReconciler;
pub use error::SyncError;
pub use groups::{GroupReconciler, GroupSnapshot};
pub use options::{MergeMode, SyncOptions};
pub use payload::{source_payload, update_payload, Payload, ResolvedRefs};
pub use presets::{PresetDiff, PresetIndex};
pub use report::{ComponentOutcome, ComponentResult, SyncReport};
pub use schema::{remap_schema, remap_whitelist};
pub use tags::TagReconciler;
