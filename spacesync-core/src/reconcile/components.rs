//! Component reconciliation, the entry point of a sync run.

use super::error::SyncError;
use super::groups::{GroupReconciler, GroupSnapshot};
use super::options::SyncOptions;
use super::payload::{source_payload, update_payload, ResolvedRefs};
use super::presets::{PresetDiff, PresetIndex};
use super::report::{ComponentOutcome, SyncReport};
use super::schema::remap_schema;
use super::tags::TagReconciler;
use crate::index::Indexed;
use crate::models::Component;
use crate::remote::{Space, SpaceApi};

fn by_name(component: &Component) -> &str {
    &component.name
}

/// State loaded once at the start of a run and appended to as entities
/// are created.
struct Session {
    groups: GroupSnapshot,
    target_components: Indexed<Component>,
    presets: PresetIndex,
}

/// Copies every source component into the target space.
pub struct ComponentReconciler<'a> {
    api: &'a dyn SpaceApi,
    options: SyncOptions,
}

impl<'a> ComponentReconciler<'a> {
    pub fn new(api: &'a dyn SpaceApi, options: SyncOptions) -> Self {
        Self { api, options }
    }

    fn source(&self) -> Space<'_> {
        Space::new(self.api, &self.options.source_space_id)
    }

    fn target(&self) -> Space<'_> {
        Space::new(self.api, &self.options.target_space_id)
    }

    /// Runs group reconciliation, then processes source components in order.
    ///
    /// Only failures while loading the initial state are returned as errors.
    pub async fn sync(&self) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::default();

        let groups = GroupReconciler::new(self.source(), self.target())
            .sync(&mut report)
            .await?;

        tracing::info!("Syncing components...");
        let (source_components, mut session) = self.load(groups).await.map_err(|e| {
            tracing::error!("An error occurred when loading data to sync: {}", e);
            e
        })?;

        tracing::info!(
            space_id = %self.options.source_space_id,
            presets = session.presets.len(),
            groups = session.groups.source.len(),
            components = source_components.len(),
            "Loaded source space"
        );
        tracing::info!(
            space_id = %self.options.target_space_id,
            groups = session.groups.target.len(),
            components = session.target_components.len(),
            "Loaded target space"
        );

        let mut tags = TagReconciler::new(self.target());
        for component in &source_components {
            let outcome = self
                .process(component, &mut session, &mut tags, &mut report)
                .await;
            report.record(component.name.clone(), outcome);
        }

        Ok(report)
    }

    async fn load(&self, groups: GroupSnapshot) -> Result<(Vec<Component>, Session), SyncError> {
        let source = self.source();
        let target = self.target();

        tracing::info!(space_id = source.id(), "Loading components");
        let source_components = source
            .components()
            .await
            .map_err(SyncError::load("components", source.id()))?;

        tracing::info!(space_id = target.id(), "Loading components");
        let target_components = target
            .components()
            .await
            .map_err(SyncError::load("components", target.id()))?;

        let presets = PresetIndex::load(source)
            .await
            .map_err(SyncError::load("presets", source.id()))?;

        let session = Session {
            groups,
            target_components: Indexed::new(target_components, by_name),
            presets,
        };
        Ok((source_components, session))
    }

    async fn process(
        &self,
        component: &Component,
        session: &mut Session,
        tags: &mut TagReconciler<'_>,
        report: &mut SyncReport,
    ) -> ComponentOutcome {
        let name = component.name.as_str();
        tracing::info!(component = name, "Processing component");

        let source_group = component.component_group_uuid.as_deref();
        if !self.options.includes_group(source_group) {
            tracing::warn!(
                component = name,
                "Component does not belong to the selected group(s), skipping"
            );
            return ComponentOutcome::Filtered;
        }

        let component_group_uuid = source_group.and_then(|uuid| {
            let resolved = session.groups.translate(uuid);
            match resolved {
                Some(target_uuid) => tracing::info!(
                    component = name,
                    group = session.groups.source_name(uuid).unwrap_or_default(),
                    target_uuid,
                    "Linking the component to the group"
                ),
                None => tracing::warn!(
                    component = name,
                    source_uuid = uuid,
                    "No same-named group in the target space, leaving the component ungrouped"
                ),
            }
            resolved.map(str::to_string)
        });

        let internal_tag_ids = match tags.resolve(&component.internal_tags_list, report).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(
                    component = name,
                    space_id = %self.options.target_space_id,
                    "Internal tags could not be resolved: {}",
                    e
                );
                return ComponentOutcome::Failed;
            }
        };

        let payload = source_payload(
            component,
            ResolvedRefs {
                component_group_uuid,
                internal_tag_ids,
                schema: remap_schema(&component.schema, &session.groups),
            },
        );
        let presets = session.presets.for_component(component.id);
        let target = self.target();

        let conflict = match target.create_component(&payload).await {
            Ok(created) => {
                tracing::info!(component = name, "Component created");
                if let Some(created_id) = created.id {
                    PresetDiff::all_new(presets).apply(target, created_id, report).await;
                }
                session.target_components.push(created);
                return ComponentOutcome::Created;
            }
            Err(e) if e.is_conflict() => e,
            Err(e) => {
                tracing::error!(
                    component = name,
                    space_id = target.id(),
                    "Component sync failed: {}",
                    e
                );
                return ComponentOutcome::Failed;
            }
        };

        tracing::info!(component = name, "Component already exists, updating it...");
        let Some(existing) = session.target_components.get(name) else {
            tracing::error!(
                component = name,
                space_id = target.id(),
                "Component sync failed: {} but no component with this name was loaded",
                conflict
            );
            return ComponentOutcome::Failed;
        };
        let Some(existing_id) = existing.id else {
            tracing::error!(component = name, "Component sync failed: target component has no id");
            return ComponentOutcome::Failed;
        };

        let update = update_payload(&payload, existing, self.options.merge_mode());
        if let Err(e) = target.update_component(existing_id, &update).await {
            tracing::error!(
                component = name,
                space_id = target.id(),
                "Component sync failed: {}",
                e
            );
            return ComponentOutcome::Failed;
        }
        tracing::info!(component = name, "Component synced");

        let diff = PresetDiff::between(presets, &existing.all_presets);
        if diff.is_empty() {
            tracing::debug!(component = name, "No preset changes");
        } else {
            diff.apply(target, existing_id, report).await;
        }
        tracing::info!(component = name, "Presets in sync");

        ComponentOutcome::Updated
    }
}
