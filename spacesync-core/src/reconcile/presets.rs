//! Preset reconciliation for synced components.

use serde_json::Value;

use super::payload::Payload;
use super::report::SyncReport;
use crate::models::Preset;
use crate::remote::{ApiError, Space};

/// Fields of a source preset that must not reach the target.
const SPACE_LOCAL_FIELDS: [&str; 4] = ["id", "space_id", "created_at", "updated_at"];

/// Presets of the source space, grouped by the component they belong to.
#[derive(Debug, Clone, Default)]
pub struct PresetIndex {
    presets: Vec<Preset>,
}

/// What has to happen to bring a target component's presets in line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetDiff {
    pub new_presets: Vec<Preset>,
    /// Source presets carrying the id of the target preset they replace
    pub update_presets: Vec<Preset>,
}

impl PresetIndex {
    pub fn new(presets: Vec<Preset>) -> Self {
        Self { presets }
    }

    pub async fn load(space: Space<'_>) -> Result<Self, ApiError> {
        tracing::info!(space_id = space.id(), "Loading presets");
        let index = Self::new(space.presets().await?);
        if index.is_empty() {
            tracing::debug!(space_id = space.id(), "Space has no presets");
        }
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Presets bound to a source component.
    pub fn for_component(&self, component_id: Option<u64>) -> Vec<Preset> {
        match component_id {
            Some(id) => self
                .presets
                .iter()
                .filter(|p| p.component_id == Some(id))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }
}

impl PresetDiff {
    /// Every desired preset is new. Used for freshly created components.
    pub fn all_new(desired: Vec<Preset>) -> Self {
        Self {
            new_presets: desired,
            update_presets: Vec::new(),
        }
    }

    /// Compares desired presets with the ones a target component already has,
    /// matching them by name.
    pub fn between(desired: Vec<Preset>, existing: &[Preset]) -> Self {
        let mut diff = Self::default();
        for preset in desired {
            match existing.iter().find(|e| e.name == preset.name) {
                None => diff.new_presets.push(preset),
                Some(current) if differs(&preset, current) => {
                    let mut update = preset;
                    update.id = current.id;
                    diff.update_presets.push(update);
                }
                Some(_) => {}
            }
        }
        diff
    }

    pub fn is_empty(&self) -> bool {
        self.new_presets.is_empty() && self.update_presets.is_empty()
    }

    /// Creates and updates presets on the target component, in order.
    ///
    /// Failures are logged and counted.
    pub async fn apply(self, target: Space<'_>, component_id: u64, report: &mut SyncReport) {
        for preset in self.new_presets {
            let payload = preset_payload(&preset, component_id);
            match target.create_preset(&payload).await {
                Ok(_) => {
                    tracing::info!(preset = %preset.name, "Preset created");
                    report.presets_created += 1;
                }
                Err(e) => {
                    tracing::error!(preset = %preset.name, space_id = target.id(), "Preset creation failed: {}", e);
                    report.presets_failed += 1;
                }
            }
        }

        for preset in self.update_presets {
            let Some(preset_id) = preset.id else {
                continue;
            };
            let payload = preset_payload(&preset, component_id);
            match target.update_preset(preset_id, &payload).await {
                Ok(()) => {
                    tracing::info!(preset = %preset.name, "Preset updated");
                    report.presets_updated += 1;
                }
                Err(e) => {
                    tracing::error!(preset = %preset.name, space_id = target.id(), "Preset update failed: {}", e);
                    report.presets_failed += 1;
                }
            }
        }
    }
}

/// An existing preset listed without a body cannot be compared and is
/// always updated.
fn differs(desired: &Preset, existing: &Preset) -> bool {
    match &existing.preset {
        None => true,
        Some(body) => {
            desired.preset.as_ref() != Some(body)
                || desired.image != existing.image
                || desired.description != existing.description
        }
    }
}

/// Request body for a preset bound to `component_id` in the target space.
pub(crate) fn preset_payload(preset: &Preset, component_id: u64) -> Payload {
    let mut payload = preset.extra.clone();
    for field in SPACE_LOCAL_FIELDS {
        payload.remove(field);
    }
    payload.insert("name".to_string(), Value::from(preset.name.clone()));
    payload.insert("component_id".to_string(), Value::from(component_id));
    if let Some(body) = &preset.preset {
        payload.insert("preset".to_string(), body.clone());
    }
    if let Some(image) = &preset.image {
        payload.insert("image".to_string(), Value::from(image.clone()));
    }
    if let Some(description) = &preset.description {
        payload.insert("description".to_string(), Value::from(description.clone()));
    }
    payload
}
