/// Terminal state of one source component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentOutcome {
    /// Excluded by the group allow-list
    Filtered,
    Created,
    Updated,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentResult {
    pub name: String,
    pub outcome: ComponentOutcome,
}

/// Counters collected during a run. Advisory only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub groups_created: usize,
    pub groups_existing: usize,
    pub groups_failed: usize,
    pub tags_created: usize,
    pub tags_reused: usize,
    pub tags_failed: usize,
    pub presets_created: usize,
    pub presets_updated: usize,
    pub presets_failed: usize,
    pub components: Vec<ComponentResult>,
}

impl SyncReport {
    pub fn record(&mut self, name: impl Into<String>, outcome: ComponentOutcome) {
        self.components.push(ComponentResult {
            name: name.into(),
            outcome,
        });
    }

    pub fn count(&self, outcome: ComponentOutcome) -> usize {
        self.components
            .iter()
            .filter(|c| c.outcome == outcome)
            .count()
    }

    pub fn outcome_of(&self, name: &str) -> Option<ComponentOutcome> {
        self.components
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.outcome)
    }

    pub fn has_failures(&self) -> bool {
        self.groups_failed > 0
            || self.tags_failed > 0
            || self.presets_failed > 0
            || self.count(ComponentOutcome::Failed) > 0
    }
}
