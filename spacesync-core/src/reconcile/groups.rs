//! Component group reconciliation.

use super::error::SyncError;
use super::report::SyncReport;
use crate::index::Indexed;
use crate::models::ComponentGroup;
use crate::remote::Space;

fn by_uuid(group: &ComponentGroup) -> &str {
    &group.uuid
}

fn by_name(group: &ComponentGroup) -> &str {
    &group.name
}

/// Source and target groups of one run.
///
/// Source groups are looked up by uuid, target groups by name, which is
/// exactly the path a space-local uuid takes to its target counterpart.
#[derive(Debug, Clone)]
pub struct GroupSnapshot {
    pub source: Indexed<ComponentGroup>,
    pub target: Indexed<ComponentGroup>,
}

impl GroupSnapshot {
    pub fn new(source: Vec<ComponentGroup>, target: Vec<ComponentGroup>) -> Self {
        Self {
            source: Indexed::new(source, by_uuid),
            target: Indexed::new(target, by_name),
        }
    }

    /// Name of a source group.
    pub fn source_name(&self, source_uuid: &str) -> Option<&str> {
        self.source.get(source_uuid).map(|g| g.name.as_str())
    }

    /// Target uuid of the group sharing the source group's name.
    pub fn translate(&self, source_uuid: &str) -> Option<&str> {
        let name = self.source_name(source_uuid)?;
        self.target.get(name).map(|g| g.uuid.as_str())
    }
}

/// Makes sure every source group also exists, by name, in the target.
///
/// Existing target groups are never changed.
pub struct GroupReconciler<'a> {
    source: Space<'a>,
    target: Space<'a>,
}

impl<'a> GroupReconciler<'a> {
    pub fn new(source: Space<'a>, target: Space<'a>) -> Self {
        Self { source, target }
    }

    /// Fetches the group lists of both spaces.
    pub async fn init(&self) -> Result<GroupSnapshot, SyncError> {
        tracing::info!("Syncing component groups...");

        let source = self.load(self.source).await?;
        let target = self.load(self.target).await?;

        Ok(GroupSnapshot::new(source, target))
    }

    async fn load(&self, space: Space<'_>) -> Result<Vec<ComponentGroup>, SyncError> {
        tracing::info!(space_id = space.id(), "Loading component groups");
        space.component_groups().await.map_err(|e| {
            tracing::error!(
                space_id = space.id(),
                "Error loading component groups: {}",
                e
            );
            SyncError::load("component groups", space.id())(e)
        })
    }

    /// Creates the missing groups and returns the matched snapshot.
    ///
    /// A failed creation is logged and counted; the remaining groups are
    /// still processed.
    pub async fn sync(&self, report: &mut SyncReport) -> Result<GroupSnapshot, SyncError> {
        let mut snapshot = self.init().await?;

        let source_groups: Vec<ComponentGroup> = snapshot.source.as_slice().to_vec();
        for group in &source_groups {
            tracing::info!(group = %group.name, "Processing component group");

            if snapshot.target.contains(&group.name) {
                tracing::info!(group = %group.name, "Component group already exists");
                report.groups_existing += 1;
                continue;
            }

            tracing::info!(group = %group.name, space_id = self.target.id(), "Creating component group");
            match self.target.create_component_group(&group.name).await {
                Ok(created) => {
                    tracing::info!(group = %created.name, uuid = %created.uuid, "Component group created");
                    snapshot.target.push(created);
                    report.groups_created += 1;
                }
                Err(e) => {
                    tracing::error!(
                        group = %group.name,
                        space_id = self.target.id(),
                        "Component group creation failed: {}",
                        e
                    );
                    report.groups_failed += 1;
                }
            }
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::fake::FakeSpaces;

    #[test]
    fn test_translate_by_name() {
        let snapshot = GroupSnapshot::new(
            vec![
                ComponentGroup::new("src-hero", "hero"),
                ComponentGroup::new("src-footer", "footer"),
            ],
            vec![ComponentGroup::new("tgt-hero", "hero")],
        );

        assert_eq!(snapshot.translate("src-hero"), Some("tgt-hero"));
        assert_eq!(snapshot.translate("src-footer"), None);
        assert_eq!(snapshot.translate("unknown"), None);
        assert_eq!(snapshot.source_name("src-footer"), Some("footer"));
    }

    #[tokio::test]
    async fn test_sync_creates_missing_groups() {
        let fake = FakeSpaces::new()
            .with_groups(
                "1",
                vec![
                    ComponentGroup::new("src-content", "content"),
                    ComponentGroup::new("src-layout", "layout"),
                ],
            )
            .with_groups("2", vec![ComponentGroup::new("tgt-layout", "layout")]);

        let reconciler = GroupReconciler::new(Space::new(&fake, "1"), Space::new(&fake, "2"));
        let mut report = SyncReport::default();
        let snapshot = reconciler.sync(&mut report).await.unwrap();

        assert_eq!(report.groups_created, 1);
        assert_eq!(report.groups_existing, 1);

        let created = fake
            .groups("2")
            .into_iter()
            .find(|g| g.name == "content")
            .unwrap();
        assert_eq!(snapshot.translate("src-content"), Some(created.uuid.as_str()));
        assert_eq!(snapshot.translate("src-layout"), Some("tgt-layout"));
        assert_eq!(fake.groups("2").len(), 2);
    }

    #[tokio::test]
    async fn test_sync_is_idempotent() {
        let fake = FakeSpaces::new().with_groups(
            "1",
            vec![ComponentGroup::new("src-content", "content")],
        );
        let reconciler = GroupReconciler::new(Space::new(&fake, "1"), Space::new(&fake, "2"));

        reconciler.sync(&mut SyncReport::default()).await.unwrap();
        fake.clear_calls();

        let mut report = SyncReport::default();
        reconciler.sync(&mut report).await.unwrap();

        assert_eq!(report.groups_created, 0);
        assert_eq!(report.groups_existing, 1);
        assert!(fake.writes().is_empty());
        assert_eq!(fake.groups("2").len(), 1);
    }

    #[tokio::test]
    async fn test_creation_failure_does_not_stop_loop() {
        let fake = FakeSpaces::new().with_groups(
            "1",
            vec![
                ComponentGroup::new("src-a", "alpha"),
                ComponentGroup::new("src-b", "beta"),
            ],
        );
        fake.fail_matching("POST", "spaces/2/component_groups", "alpha", 500);

        let reconciler = GroupReconciler::new(Space::new(&fake, "1"), Space::new(&fake, "2"));
        let mut report = SyncReport::default();
        let snapshot = reconciler.sync(&mut report).await.unwrap();

        assert_eq!(report.groups_failed, 1);
        assert_eq!(report.groups_created, 1);
        assert_eq!(snapshot.translate("src-a"), None);
        assert!(snapshot.translate("src-b").is_some());
    }

    #[tokio::test]
    async fn test_init_failure_is_fatal() {
        let fake = FakeSpaces::new();
        fake.fail("GET", "spaces/2/component_groups", 401);

        let reconciler = GroupReconciler::new(Space::new(&fake, "1"), Space::new(&fake, "2"));
        let err = reconciler.sync(&mut SyncReport::default()).await.unwrap_err();

        assert!(err.to_string().contains("space #2"));
        assert!(fake.writes().is_empty());
    }
}
