//! Resolution of a space scope into per-kind id allow-lists.

use tracing::{debug, instrument};
use uuid::Uuid;

use collab_search_platform::SearchSource;
use collab_search_shared::{AuthorizationCredential, Credential, SpaceLevel};

use crate::errors::QueryError;
use crate::matcher::MatchKind;

/// Per-kind allow-lists. `None` leaves a kind unrestricted; an empty list
/// means the kind has nothing to search in this scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchScope {
    pub space_id: Option<Uuid>,
    pub subspaces: Option<Vec<Uuid>>,
    pub subsubspaces: Option<Vec<Uuid>>,
    pub users: Option<Vec<Uuid>>,
    pub organizations: Option<Vec<Uuid>>,
    pub posts: Option<Vec<Uuid>>,
    pub callouts: Option<Vec<Uuid>>,
}

impl SearchScope {
    pub fn unscoped() -> Self {
        Self::default()
    }

    pub fn is_scoped(&self) -> bool {
        self.space_id.is_some()
    }

    /// Allow-list for one kind.
    pub fn allow_list(&self, kind: MatchKind) -> Option<&[Uuid]> {
        let list = match kind {
            MatchKind::Subspace => &self.subspaces,
            MatchKind::Subsubspace => &self.subsubspaces,
            MatchKind::User => &self.users,
            MatchKind::Organization => &self.organizations,
            MatchKind::Post => &self.posts,
            MatchKind::Callout => &self.callouts,
            MatchKind::Space | MatchKind::UserGroup => return None,
        };
        list.as_deref()
    }

    /// Build the allow-lists for a search inside one space.
    ///
    /// Subspaces and subsubspaces are taken from the whole tree of the
    /// space's level-zero space. Contributors are the credential holders of
    /// the space itself. Posts and callouts come from the collaborations of
    /// the space and of the allowed subspaces and subsubspaces.
    #[instrument(skip(source))]
    pub async fn resolve(source: &dyn SearchSource, space_id: Uuid) -> Result<Self, QueryError> {
        let space = source
            .find_space(space_id)
            .await?
            .ok_or(QueryError::SpaceNotFound(space_id))?;

        let subspaces = source
            .find_space_ids_in_level_zero(space.level_zero_space_id, SpaceLevel::L1)
            .await?;
        let subsubspaces = source
            .find_space_ids_in_level_zero(space.level_zero_space_id, SpaceLevel::L2)
            .await?;

        let user_credentials = [
            Credential::new(AuthorizationCredential::SpaceMember, space.id.to_string()),
            Credential::new(AuthorizationCredential::SpaceAdmin, space.id.to_string()),
        ];
        let users = source.find_user_ids_with_credentials(&user_credentials).await?;

        let mut organization_credentials = user_credentials.to_vec();
        organization_credentials.push(Credential::new(
            AuthorizationCredential::SpaceLead,
            space.id.to_string(),
        ));
        let organizations = source
            .find_organization_ids_with_credentials(&organization_credentials)
            .await?;

        let mut collaborations: Vec<Uuid> = space.collaboration_id.into_iter().collect();
        for (level, ids) in [(SpaceLevel::L1, &subspaces), (SpaceLevel::L2, &subsubspaces)] {
            collaborations.extend(
                source
                    .find_spaces(level, Some(ids.as_slice()))
                    .await?
                    .iter()
                    .filter_map(|s| s.collaboration_id),
            );
        }
        let posts = source.find_post_ids_in_collaborations(&collaborations).await?;
        let callouts = source.find_callout_ids_in_collaborations(&collaborations).await?;

        debug!(
            subspaces = subspaces.len(),
            subsubspaces = subsubspaces.len(),
            users = users.len(),
            organizations = organizations.len(),
            posts = posts.len(),
            callouts = callouts.len(),
            "Resolved search scope"
        );

        Ok(Self {
            space_id: Some(space.id),
            subspaces: Some(subspaces),
            subsubspaces: Some(subsubspaces),
            users: Some(users),
            organizations: Some(organizations),
            posts: Some(posts),
            callouts: Some(callouts),
        })
    }
}
