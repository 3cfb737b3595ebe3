//! Typed, space-scoped resource calls.

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use super::error::ApiError;
use super::SpaceApi;
use crate::models::{Component, ComponentGroup, InternalTag, Preset, COMPONENT_OBJECT_TYPE};

/// A single space on a [`SpaceApi`].
#[derive(Clone, Copy)]
pub struct Space<'a> {
    api: &'a dyn SpaceApi,
    id: &'a str,
}

impl<'a> Space<'a> {
    pub fn new(api: &'a dyn SpaceApi, id: &'a str) -> Self {
        Self { api, id }
    }

    pub fn id(&self) -> &'a str {
        self.id
    }

    fn path(&self, resource: &str) -> String {
        format!("spaces/{}/{}", self.id, resource)
    }

    pub async fn component_groups(&self) -> Result<Vec<ComponentGroup>, ApiError> {
        let body = self.api.get(&self.path("component_groups")).await?;
        list(body, "component_groups")
    }

    pub async fn create_component_group(&self, name: &str) -> Result<ComponentGroup, ApiError> {
        let payload = json!({ "component_group": { "name": name } });
        let body = self
            .api
            .post(&self.path("component_groups"), &payload)
            .await?;
        single(body, "component_group")
    }

    pub async fn components(&self) -> Result<Vec<Component>, ApiError> {
        let body = self.api.get(&self.path("components")).await?;
        list(body, "components")
    }

    pub async fn create_component(&self, payload: &Map<String, Value>) -> Result<Component, ApiError> {
        let payload = json!({ "component": payload });
        let body = self.api.post(&self.path("components"), &payload).await?;
        single(body, "component")
    }

    pub async fn update_component(
        &self,
        component_id: u64,
        payload: &Map<String, Value>,
    ) -> Result<(), ApiError> {
        let payload = json!({ "component": payload });
        self.api
            .put(&self.path(&format!("components/{}", component_id)), &payload)
            .await?;
        Ok(())
    }

    pub async fn internal_tags(&self) -> Result<Vec<InternalTag>, ApiError> {
        let body = self.api.get(&self.path("internal_tags")).await?;
        list(body, "internal_tags")
    }

    /// Creates a tag usable on components.
    pub async fn create_internal_tag(&self, name: &str) -> Result<InternalTag, ApiError> {
        let payload = json!({
            "internal_tag": { "name": name, "object_type": COMPONENT_OBJECT_TYPE }
        });
        let body = self.api.post(&self.path("internal_tags"), &payload).await?;
        single(body, "internal_tag")
    }

    pub async fn presets(&self) -> Result<Vec<Preset>, ApiError> {
        let body = self.api.get(&self.path("presets")).await?;
        list(body, "presets")
    }

    pub async fn create_preset(&self, payload: &Map<String, Value>) -> Result<Preset, ApiError> {
        let payload = json!({ "preset": payload });
        let body = self.api.post(&self.path("presets"), &payload).await?;
        single(body, "preset")
    }

    pub async fn update_preset(
        &self,
        preset_id: u64,
        payload: &Map<String, Value>,
    ) -> Result<(), ApiError> {
        let payload = json!({ "preset": payload });
        self.api
            .put(&self.path(&format!("presets/{}", preset_id)), &payload)
            .await?;
        Ok(())
    }
}

/// Unwraps a list envelope. A missing or null key is an empty list.
fn list<T: DeserializeOwned>(mut body: Value, key: &str) -> Result<Vec<T>, ApiError> {
    match body.get_mut(key).map(Value::take) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(items) => serde_json::from_value(items)
            .map_err(|e| ApiError::Decode(format!("{}: {}", key, e))),
    }
}

/// Unwraps a single-entity envelope.
fn single<T: DeserializeOwned>(mut body: Value, key: &str) -> Result<T, ApiError> {
    match body.get_mut(key).map(Value::take) {
        None | Some(Value::Null) => Err(ApiError::Decode(format!("missing '{}' in response", key))),
        Some(item) => {
            serde_json::from_value(item).map_err(|e| ApiError::Decode(format!("{}: {}", key, e)))
        }
    }
}
