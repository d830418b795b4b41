//! Get-or-fail lookups used to hydrate search results.

use async_trait::async_trait;
use uuid::Uuid;

use collab_search_shared::{Callout, Organization, Post, Space, User, UserGroup};

use crate::errors::StoreError;

/// Single-entity reads that fail with [`StoreError::NotFound`] when the
/// entity is missing, and with [`StoreError::RelationshipNotFound`] when an
/// owning relation cannot be resolved.
#[async_trait]
pub trait EntityLookup: Send + Sync {
    async fn get_user_or_fail(&self, id: Uuid) -> Result<User, StoreError>;

    async fn get_organization_or_fail(&self, id: Uuid) -> Result<Organization, StoreError>;

    async fn get_user_group_or_fail(&self, id: Uuid) -> Result<UserGroup, StoreError>;

    async fn get_space_or_fail(&self, id: Uuid) -> Result<Space, StoreError>;

    async fn get_post_or_fail(&self, id: Uuid) -> Result<Post, StoreError>;

    async fn get_callout_or_fail(&self, id: Uuid) -> Result<Callout, StoreError>;

    /// The callout a post was contributed to.
    async fn get_callout_for_post(&self, post_id: Uuid) -> Result<Callout, StoreError>;

    /// The space whose collaboration has the given id.
    async fn get_space_for_collaboration(&self, collaboration_id: Uuid)
        -> Result<Space, StoreError>;
}
