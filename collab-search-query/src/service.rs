//! Search service: the query-time entry point.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, instrument};

use collab_search_platform::{AuthorizationEvaluator, EntityLookup, SearchSource};
use collab_search_shared::{Principal, SearchInput, SearchResults};

use crate::accumulator::MatchAccumulator;
use crate::assembler::{ResultAssembler, RESULTS_LIMIT};
use crate::errors::QueryError;
use crate::matcher::{enabled_kinds, MatchContext, TermMatcher};
use crate::scope::SearchScope;
use crate::validation::validate;

/// Configuration for the search service.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Results kept per output group.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: RESULTS_LIMIT,
        }
    }
}

/// Term search over users, groups, organizations, spaces, posts and
/// callouts.
///
/// Every (kind, term) pair is evaluated concurrently. Their matches are
/// merged afterwards by a single accumulator, then hydrated and ranked.
pub struct SearchService {
    source: Arc<dyn SearchSource>,
    matcher: TermMatcher,
    assembler: ResultAssembler,
}

impl SearchService {
    /// Create a new search service with the default result limit.
    pub fn new(
        source: Arc<dyn SearchSource>,
        lookup: Arc<dyn EntityLookup>,
        authorization: Arc<dyn AuthorizationEvaluator>,
    ) -> Self {
        Self::with_config(source, lookup, authorization, SearchConfig::default())
    }

    /// Create a new search service with custom configuration.
    pub fn with_config(
        source: Arc<dyn SearchSource>,
        lookup: Arc<dyn EntityLookup>,
        authorization: Arc<dyn AuthorizationEvaluator>,
        config: SearchConfig,
    ) -> Self {
        Self {
            matcher: TermMatcher::new(source.clone(), authorization),
            assembler: ResultAssembler::new(lookup, config.max_results),
            source,
        }
    }

    /// Run a search on behalf of a principal.
    ///
    /// # Arguments
    ///
    /// * `input` - Terms, optional type filter, tagset names and space scope
    /// * `principal` - The agent the results are filtered for
    ///
    /// # Returns
    ///
    /// * `Ok(SearchResults)` - Ranked groups; matches that fail hydration are left out
    /// * `Err(QueryError)` - If the input is invalid, the scope space does not
    ///   exist, or a store read failed while matching
    #[instrument(skip(self, input, principal), fields(terms = input.terms.len()))]
    pub async fn search(
        &self,
        input: &SearchInput,
        principal: &Principal,
    ) -> Result<SearchResults, QueryError> {
        let query = validate(input)?;

        let scope = match query.space {
            Some(space_id) => SearchScope::resolve(self.source.as_ref(), space_id).await?,
            None => SearchScope::unscoped(),
        };
        let kinds = enabled_kinds(&query.types, principal, scope.is_scoped());
        debug!(kinds = ?kinds, scoped = scope.is_scoped(), "Search kinds enabled");

        let context = &MatchContext {
            principal,
            tagset_names: &query.tagset_names,
            scope: &scope,
        };
        let evaluations = kinds.iter().flat_map(|kind| {
            query
                .terms
                .iter()
                .map(move |term| self.matcher.match_term(*kind, term, context))
        });

        let mut accumulator = MatchAccumulator::new();
        for outcome in join_all(evaluations).await {
            for found in outcome? {
                accumulator.add(found)?;
            }
        }

        info!(matches = accumulator.len(), "Search matched");
        Ok(self.assembler.assemble(accumulator.into_matches()).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use collab_search_platform::{
        CredentialAuthorizationEvaluator, Snapshot, SnapshotStore, StoreError,
    };
    use collab_search_shared::{
        Callout, Credential, Organization, Post, Profile, SearchResultEntity, Space, SpaceLevel,
        SpaceVisibility, User, UserGroup,
    };
    use uuid::Uuid;

    fn registered() -> Principal {
        Principal {
            user_id: Some(Uuid::new_v4()),
            email: Some("viewer@example.org".to_string()),
            credentials: Vec::new(),
        }
    }

    fn user(first: &str, last: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name_id: format!("{}-{}", first, last).to_lowercase(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}@example.org", first.to_lowercase()),
            service_profile: false,
            profile: Profile::named(format!("{} {}", first, last)),
            credentials: Vec::new(),
        }
    }

    fn organization(name: &str) -> Organization {
        Organization {
            id: Uuid::new_v4(),
            name_id: name.to_lowercase().replace(' ', "-"),
            profile: Profile::named(name),
            credentials: Vec::new(),
        }
    }

    fn space(name: &str, visibility: SpaceVisibility) -> Space {
        let id = Uuid::new_v4();
        Space {
            id,
            name_id: name.to_string(),
            level: SpaceLevel::L0,
            level_zero_space_id: id,
            parent_space_id: None,
            visibility,
            collaboration_id: None,
            profile: Profile::named(name),
            context: None,
            authorization: None,
        }
    }

    fn service(snapshot: Snapshot) -> SearchService {
        let store = Arc::new(SnapshotStore::new(snapshot));
        SearchService::new(
            store.clone(),
            store,
            Arc::new(CredentialAuthorizationEvaluator::default()),
        )
    }

    #[tokio::test]
    async fn test_acme_matches_only_the_organization() {
        let acme = organization("Acme Corp");
        let service = service(Snapshot {
            organizations: vec![acme.clone()],
            users: vec![user("Jane", "Doe")],
            ..Default::default()
        });

        let results = service
            .search(&SearchInput::new(["acme"]), &registered())
            .await
            .unwrap();

        assert_eq!(results.contributor_results.len(), 1);
        let result = &results.contributor_results[0];
        assert_eq!(result.id, format!("organization-{}", acme.id));
        assert_eq!(result.score, 10);
        assert_eq!(result.terms, vec!["acme"]);
        assert_eq!(results.contributor_results_count, 1);
    }

    #[tokio::test]
    async fn test_two_terms_accumulate() {
        let acme = organization("Acme Corp");
        let service = service(Snapshot {
            organizations: vec![acme],
            ..Default::default()
        });

        let results = service
            .search(&SearchInput::new(["acme", "corp", "ACME"]), &registered())
            .await
            .unwrap();

        let result = &results.contributor_results[0];
        assert_eq!(result.score, 30);
        assert_eq!(result.terms, vec!["acme", "corp", "ACME"]);
    }

    #[tokio::test]
    async fn test_archived_space_never_returned() {
        let service = service(Snapshot {
            spaces: vec![
                space("acme-archive", SpaceVisibility::Archived),
                space("acme-demo", SpaceVisibility::Demo),
            ],
            ..Default::default()
        });

        let results = service
            .search(&SearchInput::new(["acme", "demo"]), &registered())
            .await
            .unwrap();

        assert_eq!(results.journey_results.len(), 1);
        assert_eq!(results.journey_results[0].score, 10);
        match &results.journey_results[0].result {
            SearchResultEntity::Space { space } => assert_eq!(space.name_id, "acme-demo"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_truncates_to_eight() {
        let groups: Vec<UserGroup> = (0..12)
            .map(|i| UserGroup {
                id: Uuid::new_v4(),
                name: format!("maintainers-{}", i),
                profile: Profile::named("Maintainers"),
            })
            .collect();
        let service = service(Snapshot {
            user_groups: groups,
            ..Default::default()
        });

        let results = service
            .search(&SearchInput::new(["maintainers"]), &registered())
            .await
            .unwrap();

        assert_eq!(results.group_results.len(), 8);
        assert_eq!(results.group_results_count, 12);
    }

    #[tokio::test]
    async fn test_type_filter_and_anonymous_principal() {
        let service = service(Snapshot {
            organizations: vec![organization("Jane Industries")],
            users: vec![user("Jane", "Doe")],
            ..Default::default()
        });

        let anonymous = service
            .search(&SearchInput::new(["jane"]), &Principal::anonymous())
            .await
            .unwrap();
        assert_eq!(anonymous.contributor_results.len(), 1);
        assert_eq!(
            anonymous.contributor_results[0].result_type,
            collab_search_shared::SearchResultType::Organization
        );

        let input = SearchInput {
            types_filter: vec!["user".to_string()],
            ..SearchInput::new(["jane"])
        };
        let filtered = service.search(&input, &registered()).await.unwrap();
        assert_eq!(filtered.contributor_results.len(), 1);
        assert_eq!(
            filtered.contributor_results[0].result_type,
            collab_search_shared::SearchResultType::User
        );
    }

    #[tokio::test]
    async fn test_scoped_search_limits_contributors() {
        let root = space("root", SpaceVisibility::Active);
        let mut member = user("Jane", "Member");
        member.credentials.push(Credential::new(
            collab_search_shared::AuthorizationCredential::SpaceMember,
            root.id.to_string(),
        ));
        let outsider = user("Jane", "Outsider");
        let service = service(Snapshot {
            spaces: vec![root.clone()],
            users: vec![member.clone(), outsider],
            ..Default::default()
        });
        let input = SearchInput {
            search_in_space_filter: Some(root.id),
            ..SearchInput::new(["jane", "root"])
        };

        let results = service.search(&input, &registered()).await.unwrap();

        assert_eq!(results.contributor_results.len(), 1);
        assert_eq!(results.contributor_results[0].id, format!("user-{}", member.id));
        assert!(results.journey_results.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_scope_rejected() {
        let service = service(Snapshot::default());
        let input = SearchInput {
            search_in_space_filter: Some(Uuid::new_v4()),
            ..SearchInput::new(["acme"])
        };

        let result = service.search(&input, &registered()).await;

        assert!(matches!(result, Err(QueryError::SpaceNotFound(_))));
    }

    #[tokio::test]
    async fn test_invalid_input_rejected_before_matching() {
        let service = service(Snapshot::default());

        let result = service.search(&SearchInput::new(["a"]), &registered()).await;

        assert!(matches!(result, Err(QueryError::Validation(_))));
    }

    /// Store whose post reads fail.
    struct FailingPosts(SnapshotStore);

    #[async_trait]
    impl SearchSource for FailingPosts {
        async fn find_users(&self, ids: Option<&[Uuid]>) -> Result<Vec<User>, StoreError> {
            SearchSource::find_users(&self.0, ids).await
        }

        async fn find_user_groups(&self) -> Result<Vec<UserGroup>, StoreError> {
            self.0.find_user_groups().await
        }

        async fn find_organizations(
            &self,
            ids: Option<&[Uuid]>,
        ) -> Result<Vec<Organization>, StoreError> {
            SearchSource::find_organizations(&self.0, ids).await
        }

        async fn find_spaces(
            &self,
            level: SpaceLevel,
            ids: Option<&[Uuid]>,
        ) -> Result<Vec<Space>, StoreError> {
            SearchSource::find_spaces(&self.0, level, ids).await
        }

        async fn find_posts(&self, _ids: Option<&[Uuid]>) -> Result<Vec<Post>, StoreError> {
            Err(StoreError::backend("posts table unavailable"))
        }

        async fn find_callouts(&self, ids: Option<&[Uuid]>) -> Result<Vec<Callout>, StoreError> {
            self.0.find_callouts(ids).await
        }

        async fn find_space(&self, id: Uuid) -> Result<Option<Space>, StoreError> {
            self.0.find_space(id).await
        }

        async fn find_space_ids_in_level_zero(
            &self,
            level_zero_space_id: Uuid,
            level: SpaceLevel,
        ) -> Result<Vec<Uuid>, StoreError> {
            self.0.find_space_ids_in_level_zero(level_zero_space_id, level).await
        }

        async fn find_user_ids_with_credentials(
            &self,
            credentials: &[Credential],
        ) -> Result<Vec<Uuid>, StoreError> {
            self.0.find_user_ids_with_credentials(credentials).await
        }

        async fn find_organization_ids_with_credentials(
            &self,
            credentials: &[Credential],
        ) -> Result<Vec<Uuid>, StoreError> {
            self.0.find_organization_ids_with_credentials(credentials).await
        }

        async fn find_post_ids_in_collaborations(
            &self,
            collaboration_ids: &[Uuid],
        ) -> Result<Vec<Uuid>, StoreError> {
            self.0.find_post_ids_in_collaborations(collaboration_ids).await
        }

        async fn find_callout_ids_in_collaborations(
            &self,
            collaboration_ids: &[Uuid],
        ) -> Result<Vec<Uuid>, StoreError> {
            self.0.find_callout_ids_in_collaborations(collaboration_ids).await
        }
    }

    #[tokio::test]
    async fn test_store_failure_fails_the_search() {
        let store = SnapshotStore::default();
        let service = SearchService::new(
            Arc::new(FailingPosts(store.clone())),
            Arc::new(store),
            Arc::new(CredentialAuthorizationEvaluator::default()),
        );

        let result = service.search(&SearchInput::new(["acme"]), &registered()).await;

        assert!(matches!(result, Err(QueryError::Store(_))));
    }
}
