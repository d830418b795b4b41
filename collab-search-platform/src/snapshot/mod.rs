//! In-memory store backed by a JSON snapshot of the platform's data.
//!
//! The snapshot holds fully loaded domain records. Posts and whiteboards
//! live inside their callouts, and callouts reference their collaboration by
//! id. [`SnapshotStore`] serves every read interface from it.

mod projection;
mod store;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use collab_search_shared::{Callout, Organization, Space, User, UserGroup};

use crate::errors::StoreError;

pub use store::SnapshotStore;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub spaces: Vec<Space>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub organizations: Vec<Organization>,
    #[serde(default)]
    pub user_groups: Vec<UserGroup>,
    #[serde(default)]
    pub callouts: Vec<Callout>,
}

impl Snapshot {
    /// Read and parse a snapshot file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::snapshot(format!("{}: {}", path.display(), e)))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)
            .map_err(|e| StoreError::snapshot(format!("{}: {}", path.display(), e)))?;

        info!(
            path = %path.display(),
            spaces = snapshot.spaces.len(),
            users = snapshot.users.len(),
            organizations = snapshot.organizations.len(),
            callouts = snapshot.callouts.len(),
            "Loaded platform snapshot"
        );

        Ok(snapshot)
    }
}
