use thiserror::Error;

use crate::remote::ApiError;

/// Failures that abort a whole run.
///
/// Per-entity failures are logged and counted in the
/// [`SyncReport`](super::SyncReport) instead.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to load {what} from space #{space_id}: {source}")]
    Load {
        what: &'static str,
        space_id: String,
        #[source]
        source: ApiError,
    },
}

impl SyncError {
    pub(crate) fn load(what: &'static str, space_id: &str) -> impl FnOnce(ApiError) -> Self {
        let space_id = space_id.to_string();
        move |source| SyncError::Load {
            what,
            space_id,
            source,
        }
    }
}
