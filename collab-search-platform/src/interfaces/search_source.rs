//! Full-record reads used by the query engine.

use async_trait::async_trait;
use uuid::Uuid;

use collab_search_shared::{
    Callout, Credential, Organization, Post, Space, SpaceLevel, User, UserGroup,
};

use crate::errors::StoreError;

/// Read side of the relational store as seen by the term matcher.
///
/// The `ids` argument of the `find_*` methods is an allow-list: `None` reads
/// every record of the kind, `Some` restricts the read to the listed ids.
#[async_trait]
pub trait SearchSource: Send + Sync {
    async fn find_users(&self, ids: Option<&[Uuid]>) -> Result<Vec<User>, StoreError>;

    async fn find_user_groups(&self) -> Result<Vec<UserGroup>, StoreError>;

    async fn find_organizations(&self, ids: Option<&[Uuid]>)
        -> Result<Vec<Organization>, StoreError>;

    /// Spaces of one level, including archived ones.
    async fn find_spaces(
        &self,
        level: SpaceLevel,
        ids: Option<&[Uuid]>,
    ) -> Result<Vec<Space>, StoreError>;

    async fn find_posts(&self, ids: Option<&[Uuid]>) -> Result<Vec<Post>, StoreError>;

    async fn find_callouts(&self, ids: Option<&[Uuid]>) -> Result<Vec<Callout>, StoreError>;

    /// Look up a single space, returning `None` when it does not exist.
    async fn find_space(&self, id: Uuid) -> Result<Option<Space>, StoreError>;

    /// Ids of the spaces at `level` whose top-level ancestor is `level_zero_space_id`.
    async fn find_space_ids_in_level_zero(
        &self,
        level_zero_space_id: Uuid,
        level: SpaceLevel,
    ) -> Result<Vec<Uuid>, StoreError>;

    /// Ids of users holding at least one of the given credentials.
    async fn find_user_ids_with_credentials(
        &self,
        credentials: &[Credential],
    ) -> Result<Vec<Uuid>, StoreError>;

    /// Ids of organizations holding at least one of the given credentials.
    async fn find_organization_ids_with_credentials(
        &self,
        credentials: &[Credential],
    ) -> Result<Vec<Uuid>, StoreError>;

    /// Ids of posts contributed to callouts of the given collaborations.
    async fn find_post_ids_in_collaborations(
        &self,
        collaboration_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, StoreError>;

    /// Ids of callouts of the given collaborations.
    async fn find_callout_ids_in_collaborations(
        &self,
        collaboration_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, StoreError>;
}
