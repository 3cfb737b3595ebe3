//! Spacesync Core Library
//!
//! Copies component schema definitions (component groups, components,
//! internal tags, presets) from one space to another and reconciles the
//! differences without deleting anything on the target side.

pub mod index;
pub mod models;
pub mod reconcile;
pub mod remote;

pub use index::Indexed;
pub use models::{Component, ComponentGroup, FieldDefinition, InternalTag, Preset, Schema, TagRef};
pub use reconcile::{
    ComponentOutcome, ComponentReconciler, GroupReconciler, GroupSnapshot, SyncError,
    SyncOptions, SyncReport,
};
pub use remote::{ApiError, ManagementClient, Region, RetryConfig, Space, SpaceApi, UnknownRegion};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
