//! Internal tag resolution.

use super::report::SyncReport;
use crate::index::Indexed;
use crate::models::{InternalTag, TagRef};
use crate::remote::{ApiError, Space};

fn by_name(tag: &InternalTag) -> &str {
    &tag.name
}

/// Translates source tag references into target tag ids by name, creating
/// tags the target does not have yet.
///
/// Target tags are fetched on first use and cached for the rest of the run.
/// Only tags usable on components take part in name matching: a same-named
/// tag with another `object_type` (an asset tag, say) is not reused, and a
/// new component tag is created alongside it.
pub struct TagReconciler<'a> {
    target: Space<'a>,
    tags: Option<Indexed<InternalTag>>,
}

impl<'a> TagReconciler<'a> {
    pub fn new(target: Space<'a>) -> Self {
        Self { target, tags: None }
    }

    async fn loaded(&mut self) -> Result<&mut Indexed<InternalTag>, ApiError> {
        if self.tags.is_none() {
            tracing::info!(space_id = self.target.id(), "Loading internal tags");
            let tags = self
                .target
                .internal_tags()
                .await?
                .into_iter()
                .filter(InternalTag::is_component_tag)
                .collect();
            self.tags = Some(Indexed::new(tags, by_name));
        }
        Ok(self.tags.get_or_insert_with(|| Indexed::new(Vec::new(), by_name)))
    }

    /// Resolves every reference, one at a time, to a target tag id.
    ///
    /// The returned list is complete before it is handed back. A failed
    /// creation drops that tag and is counted. Listing the target tags can
    /// fail, which fails the whole resolution.
    pub async fn resolve(
        &mut self,
        refs: &[TagRef],
        report: &mut SyncReport,
    ) -> Result<Vec<String>, ApiError> {
        let mut ids: Vec<String> = Vec::with_capacity(refs.len());
        if refs.is_empty() {
            return Ok(ids);
        }

        let target = self.target;
        let tags = self.loaded().await?;

        for tag in refs {
            let id = match tags.get(&tag.name) {
                Some(existing) => {
                    report.tags_reused += 1;
                    existing.id
                }
                None => match target.create_internal_tag(&tag.name).await {
                    Ok(created) => {
                        tracing::info!(tag = %created.name, space_id = target.id(), "Internal tag created");
                        let id = created.id;
                        tags.push(created);
                        report.tags_created += 1;
                        id
                    }
                    Err(e) => {
                        tracing::error!(
                            tag = %tag.name,
                            space_id = target.id(),
                            "Internal tag creation failed: {}",
                            e
                        );
                        report.tags_failed += 1;
                        continue;
                    }
                },
            };

            let id = id.to_string();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        Ok(ids)
    }
}
