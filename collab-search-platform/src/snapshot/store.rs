use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use collab_search_shared::{
    Callout, CollaborationRow, Credential, Organization, OrganizationRow, Page, ParentSpaceRef,
    Post, Space, SpaceLevel, SpaceRow, SpaceVisibility, User, UserGroup, UserRow,
};

use super::projection::{callout_row, organization_row, profile_row, user_row};
use super::Snapshot;
use crate::errors::StoreError;
use crate::interfaces::{EntityLookup, IngestSource, SearchSource};

/// Serves all store interfaces from an in-memory [`Snapshot`].
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    snapshot: Arc<Snapshot>,
}

fn paginate<T>(items: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    items.skip(page.offset).take(page.limit).collect()
}

fn allowed(ids: Option<&[Uuid]>, id: &Uuid) -> bool {
    ids.map_or(true, |ids| ids.contains(id))
}

impl SnapshotStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
        }
    }

    fn space(&self, id: Uuid) -> Option<&Space> {
        self.snapshot.spaces.iter().find(|space| space.id == id)
    }

    fn live_spaces(&self) -> impl Iterator<Item = &Space> {
        self.snapshot
            .spaces
            .iter()
            .filter(|space| space.visibility != SpaceVisibility::Archived)
    }

    /// Parent chain of a space, cut short where a parent is missing.
    fn parent_chain(&self, space: &Space) -> Option<ParentSpaceRef> {
        let parent = self.space(space.parent_space_id?)?;
        Some(ParentSpaceRef {
            id: parent.id,
            parent: self.parent_chain(parent).map(Box::new),
        })
    }

    fn space_row(&self, space: &Space) -> SpaceRow {
        SpaceRow {
            id: space.id,
            name_id: space.name_id.clone(),
            level: space.level,
            visibility: Some(space.visibility),
            parent: self.parent_chain(space),
            profile: profile_row(&space.profile),
            context: space.context.clone(),
        }
    }

    fn collaboration_row(&self, space: &Space) -> CollaborationRow {
        let callouts = match space.collaboration_id {
            Some(collaboration_id) => self
                .snapshot
                .callouts
                .iter()
                .filter(|callout| callout.collaboration_id == collaboration_id)
                .map(callout_row)
                .collect(),
            None => Vec::new(),
        };

        CollaborationRow {
            space_id: space.id,
            level: space.level,
            visibility: Some(space.visibility),
            parent: self.parent_chain(space),
            collaboration_id: space.collaboration_id,
            callouts,
        }
    }

    fn posts(&self) -> impl Iterator<Item = &Post> {
        self.snapshot.callouts.iter().flat_map(Callout::posts)
    }

    fn callouts_in<'a>(
        &'a self,
        collaboration_ids: &'a [Uuid],
    ) -> impl Iterator<Item = &'a Callout> + 'a {
        self.snapshot
            .callouts
            .iter()
            .filter(move |callout| collaboration_ids.contains(&callout.collaboration_id))
    }
}

#[async_trait]
impl IngestSource for SnapshotStore {
    async fn find_spaces(
        &self,
        level: SpaceLevel,
        page: Page,
    ) -> Result<Vec<SpaceRow>, StoreError> {
        Ok(paginate(
            self.live_spaces()
                .filter(|space| space.level == level)
                .map(|space| self.space_row(space)),
            page,
        ))
    }

    async fn find_organizations(&self, page: Page) -> Result<Vec<OrganizationRow>, StoreError> {
        Ok(paginate(
            self.snapshot.organizations.iter().map(organization_row),
            page,
        ))
    }

    async fn find_users(&self, page: Page) -> Result<Vec<UserRow>, StoreError> {
        Ok(paginate(
            self.snapshot
                .users
                .iter()
                .filter(|user| !user.service_profile)
                .map(user_row),
            page,
        ))
    }

    async fn find_collaborations(&self, page: Page) -> Result<Vec<CollaborationRow>, StoreError> {
        Ok(paginate(
            self.live_spaces().map(|space| self.collaboration_row(space)),
            page,
        ))
    }
}

#[async_trait]
impl SearchSource for SnapshotStore {
    async fn find_users(&self, ids: Option<&[Uuid]>) -> Result<Vec<User>, StoreError> {
        Ok(self
            .snapshot
            .users
            .iter()
            .filter(|user| allowed(ids, &user.id))
            .cloned()
            .collect())
    }

    async fn find_user_groups(&self) -> Result<Vec<UserGroup>, StoreError> {
        Ok(self.snapshot.user_groups.clone())
    }

    async fn find_organizations(
        &self,
        ids: Option<&[Uuid]>,
    ) -> Result<Vec<Organization>, StoreError> {
        Ok(self
            .snapshot
            .organizations
            .iter()
            .filter(|organization| allowed(ids, &organization.id))
            .cloned()
            .collect())
    }

    async fn find_spaces(
        &self,
        level: SpaceLevel,
        ids: Option<&[Uuid]>,
    ) -> Result<Vec<Space>, StoreError> {
        Ok(self
            .snapshot
            .spaces
            .iter()
            .filter(|space| space.level == level && allowed(ids, &space.id))
            .cloned()
            .collect())
    }

    async fn find_posts(&self, ids: Option<&[Uuid]>) -> Result<Vec<Post>, StoreError> {
        Ok(self
            .posts()
            .filter(|post| allowed(ids, &post.id))
            .cloned()
            .collect())
    }

    async fn find_callouts(&self, ids: Option<&[Uuid]>) -> Result<Vec<Callout>, StoreError> {
        Ok(self
            .snapshot
            .callouts
            .iter()
            .filter(|callout| allowed(ids, &callout.id))
            .cloned()
            .collect())
    }

    async fn find_space(&self, id: Uuid) -> Result<Option<Space>, StoreError> {
        Ok(self.space(id).cloned())
    }

    async fn find_space_ids_in_level_zero(
        &self,
        level_zero_space_id: Uuid,
        level: SpaceLevel,
    ) -> Result<Vec<Uuid>, StoreError> {
        Ok(self
            .snapshot
            .spaces
            .iter()
            .filter(|space| {
                space.level == level && space.level_zero_space_id == level_zero_space_id
            })
            .map(|space| space.id)
            .collect())
    }

    async fn find_user_ids_with_credentials(
        &self,
        credentials: &[Credential],
    ) -> Result<Vec<Uuid>, StoreError> {
        Ok(self
            .snapshot
            .users
            .iter()
            .filter(|user| user.credentials.iter().any(|c| credentials.contains(c)))
            .map(|user| user.id)
            .collect())
    }

    async fn find_organization_ids_with_credentials(
        &self,
        credentials: &[Credential],
    ) -> Result<Vec<Uuid>, StoreError> {
        Ok(self
            .snapshot
            .organizations
            .iter()
            .filter(|organization| organization.credentials.iter().any(|c| credentials.contains(c)))
            .map(|organization| organization.id)
            .collect())
    }

    async fn find_post_ids_in_collaborations(
        &self,
        collaboration_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, StoreError> {
        Ok(self
            .callouts_in(collaboration_ids)
            .flat_map(Callout::posts)
            .map(|post| post.id)
            .collect())
    }

    async fn find_callout_ids_in_collaborations(
        &self,
        collaboration_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, StoreError> {
        Ok(self
            .callouts_in(collaboration_ids)
            .map(|callout| callout.id)
            .collect())
    }
}

#[async_trait]
impl EntityLookup for SnapshotStore {
    async fn get_user_or_fail(&self, id: Uuid) -> Result<User, StoreError> {
        self.snapshot
            .users
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("user", id))
    }

    async fn get_organization_or_fail(&self, id: Uuid) -> Result<Organization, StoreError> {
        self.snapshot
            .organizations
            .iter()
            .find(|organization| organization.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("organization", id))
    }

    async fn get_user_group_or_fail(&self, id: Uuid) -> Result<UserGroup, StoreError> {
        self.snapshot
            .user_groups
            .iter()
            .find(|group| group.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("user group", id))
    }

    async fn get_space_or_fail(&self, id: Uuid) -> Result<Space, StoreError> {
        self.space(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("space", id))
    }

    async fn get_post_or_fail(&self, id: Uuid) -> Result<Post, StoreError> {
        self.posts()
            .find(|post| post.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("post", id))
    }

    async fn get_callout_or_fail(&self, id: Uuid) -> Result<Callout, StoreError> {
        self.snapshot
            .callouts
            .iter()
            .find(|callout| callout.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("callout", id))
    }

    async fn get_callout_for_post(&self, post_id: Uuid) -> Result<Callout, StoreError> {
        self.snapshot
            .callouts
            .iter()
            .find(|callout| callout.posts().any(|post| post.id == post_id))
            .cloned()
            .ok_or_else(|| {
                StoreError::relationship_not_found(format!("no callout for post {}", post_id))
            })
    }

    async fn get_space_for_collaboration(
        &self,
        collaboration_id: Uuid,
    ) -> Result<Space, StoreError> {
        self.snapshot
            .spaces
            .iter()
            .find(|space| space.collaboration_id == Some(collaboration_id))
            .cloned()
            .ok_or_else(|| {
                StoreError::relationship_not_found(format!(
                    "no space for collaboration {}",
                    collaboration_id
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collab_search_shared::{
        AuthorizationCredential, CalloutContribution, CalloutFraming, Profile,
    };

    fn space(level: SpaceLevel, parent: Option<&Space>, visibility: SpaceVisibility) -> Space {
        let id = Uuid::new_v4();
        Space {
            id,
            name_id: format!("space-{}", id),
            level,
            level_zero_space_id: parent.map_or(id, |p| p.level_zero_space_id),
            parent_space_id: parent.map(|p| p.id),
            visibility,
            collaboration_id: Some(Uuid::new_v4()),
            profile: Profile::named("Space"),
            context: None,
            authorization: None,
        }
    }

    fn user(name: &str, service_profile: bool) -> User {
        User {
            id: Uuid::new_v4(),
            name_id: name.to_string(),
            first_name: name.to_string(),
            last_name: "Test".to_string(),
            email: format!("{}@example.org", name),
            service_profile,
            profile: Profile::named(name),
            credentials: Vec::new(),
        }
    }

    fn post(name: &str) -> Post {
        Post {
            id: Uuid::new_v4(),
            name_id: name.to_string(),
            created_by: None,
            created_date: None,
            profile: Profile::named(name),
            authorization: None,
        }
    }

    fn callout(collaboration_id: Uuid, posts: Vec<Post>) -> Callout {
        Callout {
            id: Uuid::new_v4(),
            name_id: "callout".to_string(),
            collaboration_id,
            created_by: None,
            created_date: None,
            framing: CalloutFraming {
                profile: Profile::named("Callout"),
                whiteboard: None,
            },
            contributions: posts
                .into_iter()
                .map(|post| CalloutContribution {
                    id: Uuid::new_v4(),
                    post: Some(post),
                    whiteboard: None,
                })
                .collect(),
            authorization: None,
        }
    }

    #[tokio::test]
    async fn test_find_spaces_excludes_archived_and_pages() {
        let l0 = space(SpaceLevel::L0, None, SpaceVisibility::Active);
        let archived = space(SpaceLevel::L0, None, SpaceVisibility::Archived);
        let demo = space(SpaceLevel::L0, None, SpaceVisibility::Demo);
        let store = SnapshotStore::new(Snapshot {
            spaces: vec![l0.clone(), archived, demo.clone()],
            ..Default::default()
        });

        let first = IngestSource::find_spaces(&store, SpaceLevel::L0, Page::new(0, 1))
            .await
            .unwrap();
        let second = IngestSource::find_spaces(&store, SpaceLevel::L0, Page::new(1, 1))
            .await
            .unwrap();
        let third = IngestSource::find_spaces(&store, SpaceLevel::L0, Page::new(2, 1))
            .await
            .unwrap();

        assert_eq!(first[0].id, l0.id);
        assert_eq!(second[0].id, demo.id);
        assert!(third.is_empty());
    }

    #[tokio::test]
    async fn test_subsubspace_row_carries_parent_chain() {
        let l0 = space(SpaceLevel::L0, None, SpaceVisibility::Active);
        let l1 = space(SpaceLevel::L1, Some(&l0), SpaceVisibility::Active);
        let l2 = space(SpaceLevel::L2, Some(&l1), SpaceVisibility::Active);
        let store = SnapshotStore::new(Snapshot {
            spaces: vec![l0.clone(), l1, l2],
            ..Default::default()
        });

        let rows = IngestSource::find_spaces(&store, SpaceLevel::L2, Page::new(0, 10))
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].top_level_space_id(), Some(l0.id));
    }

    #[tokio::test]
    async fn test_find_users_skips_service_profiles() {
        let person = user("ada", false);
        let store = SnapshotStore::new(Snapshot {
            users: vec![person.clone(), user("bot", true)],
            ..Default::default()
        });

        let rows = IngestSource::find_users(&store, Page::new(0, 10)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, person.id);
    }

    #[tokio::test]
    async fn test_collaboration_lookups() {
        let l0 = space(SpaceLevel::L0, None, SpaceVisibility::Active);
        let collaboration_id = l0.collaboration_id.unwrap();
        let contributed = post("idea");
        let callout = callout(collaboration_id, vec![contributed.clone()]);
        let store = SnapshotStore::new(Snapshot {
            spaces: vec![l0.clone()],
            callouts: vec![callout.clone()],
            ..Default::default()
        });

        let rows = store.find_collaborations(Page::new(0, 10)).await.unwrap();
        assert_eq!(rows[0].callouts.len(), 1);

        let post_ids = store
            .find_post_ids_in_collaborations(&[collaboration_id])
            .await
            .unwrap();
        assert_eq!(post_ids, vec![contributed.id]);

        let owner = store.get_callout_for_post(contributed.id).await.unwrap();
        assert_eq!(owner.id, callout.id);

        let owning_space = store
            .get_space_for_collaboration(collaboration_id)
            .await
            .unwrap();
        assert_eq!(owning_space.id, l0.id);
    }

    #[tokio::test]
    async fn test_missing_relations_fail() {
        let store = SnapshotStore::default();

        assert!(matches!(
            store.get_callout_for_post(Uuid::new_v4()).await,
            Err(StoreError::RelationshipNotFound(_))
        ));
        assert!(matches!(
            store.get_space_or_fail(Uuid::new_v4()).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_credential_holders() {
        let space_id = Uuid::new_v4().to_string();
        let mut member = user("member", false);
        member.credentials = vec![Credential::new(AuthorizationCredential::SpaceMember, &space_id)];
        let store = SnapshotStore::new(Snapshot {
            users: vec![member.clone(), user("outsider", false)],
            ..Default::default()
        });

        let ids = store
            .find_user_ids_with_credentials(&[
                Credential::new(AuthorizationCredential::SpaceMember, &space_id),
                Credential::new(AuthorizationCredential::SpaceAdmin, &space_id),
            ])
            .await
            .unwrap();

        assert_eq!(ids, vec![member.id]);
    }
}
