use std::collections::BTreeSet;

/// How an existing target component is combined with the source on update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// Target top-level fields overlaid by source fields. Keys only the
    /// target has survive.
    #[default]
    Overlay,
    /// Source fields only.
    Replace,
}

/// Inputs of a sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub source_space_id: String,
    pub target_space_id: String,
    /// Only components in one of these source group uuids are synced
    pub components_groups: Option<BTreeSet<String>>,
    /// Source is authoritative on update
    pub components_full_sync: bool,
}

impl SyncOptions {
    pub fn new(source_space_id: impl Into<String>, target_space_id: impl Into<String>) -> Self {
        Self {
            source_space_id: source_space_id.into(),
            target_space_id: target_space_id.into(),
            components_groups: None,
            components_full_sync: false,
        }
    }

    pub fn with_components_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.components_groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_full_sync(mut self, full_sync: bool) -> Self {
        self.components_full_sync = full_sync;
        self
    }

    pub fn merge_mode(&self) -> MergeMode {
        if self.components_full_sync {
            MergeMode::Replace
        } else {
            MergeMode::Overlay
        }
    }

    /// Whether a component in `group_uuid` passes the group allow-list.
    ///
    /// Without an allow-list every component passes. With one, components
    /// outside any group never pass.
    pub fn includes_group(&self, group_uuid: Option<&str>) -> bool {
        match (&self.components_groups, group_uuid) {
            (None, _) => true,
            (Some(allowed), Some(uuid)) => allowed.contains(uuid),
            (Some(_), None) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_includes_group() {
        let options = SyncOptions::new("1", "2");
        assert!(options.includes_group(Some("g1")));
        assert!(options.includes_group(None));

        let options = options.with_components_groups(["g1"]);
        assert!(options.includes_group(Some("g1")));
        assert!(!options.includes_group(Some("g2")));
        assert!(!options.includes_group(None));
    }

    #[test]
    fn test_merge_mode() {
        assert_eq!(SyncOptions::new("1", "2").merge_mode(), MergeMode::Overlay);
        assert_eq!(
            SyncOptions::new("1", "2").with_full_sync(true).merge_mode(),
            MergeMode::Replace
        );
    }
}
