//! Paginated projection reads used by the ingestion fetchers.

use async_trait::async_trait;

use collab_search_shared::{
    CollaborationRow, OrganizationRow, Page, SpaceLevel, SpaceRow, UserRow,
};

use crate::errors::StoreError;

/// Read side of the relational store as seen by the ingestion pipeline.
///
/// Every method returns one page of projections. An empty page means the
/// source is exhausted. Implementations must return rows in a stable order
/// so consecutive pages do not overlap.
#[async_trait]
pub trait IngestSource: Send + Sync {
    /// Spaces of the given level whose visibility is not archived.
    ///
    /// Rows of level one and two carry their parent chain up to the
    /// top-level space.
    async fn find_spaces(&self, level: SpaceLevel, page: Page) -> Result<Vec<SpaceRow>, StoreError>;

    /// All organizations.
    async fn find_organizations(&self, page: Page) -> Result<Vec<OrganizationRow>, StoreError>;

    /// Users without a service profile. Private fields are never projected.
    async fn find_users(&self, page: Page) -> Result<Vec<UserRow>, StoreError>;

    /// Non-archived spaces of every level with their collaboration callouts,
    /// contributions, posts and whiteboards loaded.
    async fn find_collaborations(&self, page: Page) -> Result<Vec<CollaborationRow>, StoreError>;
}
