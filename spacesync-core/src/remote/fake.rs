//! In-memory stand-in for the management API, used by tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Map, Value};

use super::error::ApiError;
use super::SpaceApi;
use crate::models::{Component, ComponentGroup, InternalTag, Preset};

/// A request received by the fake.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

impl Call {
    pub fn is_write(&self) -> bool {
        self.method != "GET"
    }
}

struct Failure {
    method: &'static str,
    path: String,
    needle: Option<String>,
    status: u16,
}

#[derive(Default)]
struct SpaceData {
    resources: HashMap<String, Vec<Value>>,
}

struct State {
    spaces: HashMap<String, SpaceData>,
    calls: Vec<Call>,
    failures: Vec<Failure>,
    next_id: u64,
}

pub struct FakeSpaces {
    state: Mutex<State>,
}

fn singular(resource: &str) -> &str {
    match resource {
        "component_groups" => "component_group",
        "components" => "component",
        "internal_tags" => "internal_tag",
        "presets" => "preset",
        other => other,
    }
}

fn to_values<T: Serialize>(items: Vec<T>) -> Vec<Value> {
    items
        .into_iter()
        .map(|item| serde_json::to_value(item).unwrap())
        .collect()
}

fn http(status: u16, message: &str) -> ApiError {
    ApiError::Http {
        status,
        message: message.to_string(),
    }
}

impl FakeSpaces {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                spaces: HashMap::new(),
                calls: Vec::new(),
                failures: Vec::new(),
                next_id: 1000,
            }),
        }
    }

    fn seed(self, space: &str, resource: &str, items: Vec<Value>) -> Self {
        self.state
            .lock()
            .unwrap()
            .spaces
            .entry(space.to_string())
            .or_default()
            .resources
            .entry(resource.to_string())
            .or_default()
            .extend(items);
        self
    }

    pub fn with_groups(self, space: &str, groups: Vec<ComponentGroup>) -> Self {
        self.seed(space, "component_groups", to_values(groups))
    }

    pub fn with_components(self, space: &str, components: Vec<Component>) -> Self {
        self.seed(space, "components", to_values(components))
    }

    pub fn with_tags(self, space: &str, tags: Vec<InternalTag>) -> Self {
        self.seed(space, "internal_tags", to_values(tags))
    }

    pub fn with_presets(self, space: &str, presets: Vec<Preset>) -> Self {
        self.seed(space, "presets", to_values(presets))
    }

    /// Answers every `method` call on `path` with `status`.
    pub fn fail(&self, method: &'static str, path: &str, status: u16) {
        self.state.lock().unwrap().failures.push(Failure {
            method,
            path: path.to_string(),
            needle: None,
            status,
        });
    }

    /// Answers `method` calls on `path` whose body contains `needle` with `status`.
    pub fn fail_matching(&self, method: &'static str, path: &str, needle: &str, status: u16) {
        self.state.lock().unwrap().failures.push(Failure {
            method,
            path: path.to_string(),
            needle: Some(needle.to_string()),
            status,
        });
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn stored(&self, space: &str, resource: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .spaces
            .get(space)
            .and_then(|s| s.resources.get(resource))
            .cloned()
            .unwrap_or_default()
    }

    pub fn groups(&self, space: &str) -> Vec<ComponentGroup> {
        serde_json::from_value(Value::Array(self.stored(space, "component_groups"))).unwrap()
    }

    pub fn components(&self, space: &str) -> Vec<Component> {
        serde_json::from_value(Value::Array(self.stored(space, "components"))).unwrap()
    }

    pub fn tags(&self, space: &str) -> Vec<InternalTag> {
        serde_json::from_value(Value::Array(self.stored(space, "internal_tags"))).unwrap()
    }

    pub fn presets(&self, space: &str) -> Vec<Preset> {
        serde_json::from_value(Value::Array(self.stored(space, "presets"))).unwrap()
    }

    fn handle(&self, method: &'static str, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });

        let body_text = body.map(|b| b.to_string()).unwrap_or_default();
        if let Some(failure) = state.failures.iter().find(|f| {
            f.method == method
                && f.path == path
                && f.needle.as_ref().map_or(true, |n| body_text.contains(n))
        }) {
            return Err(http(failure.status, "injected failure"));
        }

        let segments: Vec<&str> = path.split('/').collect();
        let (space, resource, entity_id) = match segments.as_slice() {
            ["spaces", space, resource] => (*space, *resource, None),
            ["spaces", space, resource, id] => (*space, *resource, id.parse::<u64>().ok()),
            _ => return Err(http(404, "unknown path")),
        };

        let next_id = state.next_id;
        state.next_id += 1;
        let data = state.spaces.entry(space.to_string()).or_default();

        match (method, entity_id) {
            ("GET", None) => {
                let mut items = data.resources.get(resource).cloned().unwrap_or_default();
                if resource == "components" {
                    let presets = data.resources.get("presets").cloned().unwrap_or_default();
                    for item in &mut items {
                        let bound: Vec<Value> = presets
                            .iter()
                            .filter(|p| p.get("component_id") == item.get("id"))
                            .cloned()
                            .collect();
                        item["all_presets"] = Value::Array(bound);
                    }
                }
                Ok(json!({ resource: items }))
            }
            ("POST", None) => {
                let mut entity: Map<String, Value> = body
                    .and_then(|b| b.get(singular(resource)))
                    .and_then(Value::as_object)
                    .cloned()
                    .ok_or_else(|| http(400, "missing envelope"))?;
                let items = data.resources.entry(resource.to_string()).or_default();

                if resource == "components"
                    && items.iter().any(|c| c.get("name") == entity.get("name"))
                {
                    return Err(http(422, "{\"name\":[\"has already been taken\"]}"));
                }

                entity.insert("id".to_string(), json!(next_id));
                if resource == "component_groups" {
                    entity.insert("uuid".to_string(), json!(uuid::Uuid::new_v4().to_string()));
                }
                let entity = Value::Object(entity);
                items.push(entity.clone());
                Ok(json!({ singular(resource): entity }))
            }
            ("PUT", Some(id)) => {
                let mut entity: Map<String, Value> = body
                    .and_then(|b| b.get(singular(resource)))
                    .and_then(Value::as_object)
                    .cloned()
                    .ok_or_else(|| http(400, "missing envelope"))?;
                entity.insert("id".to_string(), json!(id));
                let items = data.resources.entry(resource.to_string()).or_default();
                let slot = items
                    .iter_mut()
                    .find(|item| item.get("id") == Some(&json!(id)))
                    .ok_or_else(|| http(404, "not found"))?;
                *slot = Value::Object(entity);
                Ok(json!({ singular(resource): slot.clone() }))
            }
            _ => Err(http(405, "method not allowed")),
        }
    }
}

#[async_trait]
impl SpaceApi for FakeSpaces {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.handle("GET", path, None)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.handle("POST", path, Some(body))
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.handle("PUT", path, Some(body))
    }
}
