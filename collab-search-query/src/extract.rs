//! Index-backed search.
//!
//! Runs the search text against the ingested indices instead of the store,
//! then hydrates the hits with the same assembler as the term search.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use collab_search_platform::EntityLookup;
use collab_search_repository::{
    IndexPattern, IndexSearchHit, IndexSearchRequest, SearchIndex, SearchIndexProvider,
    SearchTarget,
};
use collab_search_shared::{SearchEntityType, SearchInput, SearchResults, SpaceLevel};

use crate::accumulator::Match;
use crate::assembler::ResultAssembler;
use crate::errors::QueryError;
use crate::matcher::MatchKind;
use crate::service::SearchConfig;
use crate::validation::validate;

/// Hits requested per index, relative to the results kept per group.
pub const SIZE_MULTIPLIER: usize = 2;

/// Indices searched, with the entity type each one holds.
///
/// Whiteboards have no result group and groups are never indexed.
const SEARCHED_INDICES: [(SearchIndex, SearchEntityType); 6] = [
    (SearchIndex::Spaces, SearchEntityType::Space),
    (SearchIndex::Subspaces, SearchEntityType::Subspace),
    (SearchIndex::Users, SearchEntityType::User),
    (SearchIndex::Organizations, SearchEntityType::Organization),
    (SearchIndex::Posts, SearchEntityType::Post),
    (SearchIndex::Callouts, SearchEntityType::Callout),
];

/// Indices whose documents may be shown without authorization.
const PUBLIC_INDICES: [SearchIndex; 3] =
    [SearchIndex::Spaces, SearchIndex::Subspaces, SearchIndex::Posts];

/// Full-text search over the ingested indices.
pub struct IndexSearchService {
    provider: Option<Arc<dyn SearchIndexProvider>>,
    index_pattern: IndexPattern,
    assembler: ResultAssembler,
    max_results: usize,
}

impl IndexSearchService {
    /// Create a new index search service with the default result limit.
    pub fn new(
        provider: Option<Arc<dyn SearchIndexProvider>>,
        lookup: Arc<dyn EntityLookup>,
        index_pattern: IndexPattern,
    ) -> Self {
        Self::with_config(provider, lookup, index_pattern, SearchConfig::default())
    }

    /// Create a new index search service with custom configuration.
    pub fn with_config(
        provider: Option<Arc<dyn SearchIndexProvider>>,
        lookup: Arc<dyn EntityLookup>,
        index_pattern: IndexPattern,
        config: SearchConfig,
    ) -> Self {
        Self {
            provider,
            index_pattern,
            assembler: ResultAssembler::new(lookup, config.max_results),
            max_results: config.max_results,
        }
    }

    /// Search the indices with the joined terms.
    ///
    /// # Arguments
    ///
    /// * `input` - Terms, optional type filter and space scope; tagsets are ignored
    /// * `only_public` - Restrict the search to spaces, subspaces and posts
    ///
    /// # Returns
    ///
    /// * `Ok(SearchResults)` - Ranked groups; hits that fail hydration are left out
    /// * `Err(QueryError)` - If the input is invalid, no backend is configured,
    ///   or the backend request failed
    #[instrument(skip(self, input), fields(terms = input.terms.len()))]
    pub async fn search(
        &self,
        input: &SearchInput,
        only_public: bool,
    ) -> Result<SearchResults, QueryError> {
        let query = validate(input)?;
        let provider = self
            .provider
            .as_ref()
            .ok_or(QueryError::BackendUnavailable)?;

        let targets = self.targets(&query.types, only_public);
        if targets.is_empty() {
            info!("No index matches the type filter");
            return Ok(SearchResults::default());
        }

        let request = IndexSearchRequest {
            text: query.terms.join(" "),
            space_id: query.space,
            targets,
        };
        let hits = provider.search(&request).await?;
        info!(hits = hits.len(), "Index search returned");

        let matches = hits
            .iter()
            .filter_map(|hit| to_match(hit, &query.terms))
            .collect();
        Ok(self.assembler.assemble(matches).await)
    }

    fn targets(&self, types: &[SearchEntityType], only_public: bool) -> Vec<SearchTarget> {
        SEARCHED_INDICES
            .iter()
            .filter(|(_, entity_type)| types.is_empty() || types.contains(entity_type))
            .filter(|(index, _)| !only_public || PUBLIC_INDICES.contains(index))
            .map(|(index, _)| SearchTarget {
                index: self.index_pattern.index_name(*index),
                size: self.max_results * SIZE_MULTIPLIER,
            })
            .collect()
    }
}

/// Map a hit onto a match on its entity. The backend score is rounded.
fn to_match(hit: &IndexSearchHit, terms: &[String]) -> Option<Match> {
    let kind = match hit.document_type.parse::<SearchEntityType>() {
        Ok(SearchEntityType::Space) => MatchKind::Space,
        Ok(SearchEntityType::Subspace) if hit.level == Some(SpaceLevel::L2) => {
            MatchKind::Subsubspace
        }
        Ok(SearchEntityType::Subspace) => MatchKind::Subspace,
        Ok(SearchEntityType::User) => MatchKind::User,
        Ok(SearchEntityType::Organization) => MatchKind::Organization,
        Ok(SearchEntityType::Post) => MatchKind::Post,
        Ok(SearchEntityType::Callout) => MatchKind::Callout,
        _ => {
            warn!(
                index = %hit.index,
                document_type = %hit.document_type,
                "Skipping hit of unsupported type"
            );
            return None;
        }
    };

    Some(Match {
        key: hit.entity_id,
        kind,
        score: hit.score.max(0.0).round() as u32,
        terms: terms.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use collab_search_platform::{Snapshot, SnapshotStore};
    use collab_search_repository::{
        AliasBinding, BulkIndexResponse, IndexOperationResult, SearchIndexError,
    };
    use collab_search_shared::{
        Profile, SearchDocument, SearchResultEntity, Space, SpaceVisibility, User,
    };
    use tokio::sync::Mutex;
    use uuid::Uuid;

    struct MockProvider {
        hits: Vec<IndexSearchHit>,
        requests: Mutex<Vec<IndexSearchRequest>>,
    }

    impl MockProvider {
        fn returning(hits: Vec<IndexSearchHit>) -> Arc<Self> {
            Arc::new(Self {
                hits,
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl SearchIndexProvider for MockProvider {
        async fn bulk_index(
            &self,
            _index: &str,
            _documents: &[SearchDocument],
        ) -> Result<BulkIndexResponse, SearchIndexError> {
            Ok(BulkIndexResponse::default())
        }

        async fn create_index(
            &self,
            _index: &str,
        ) -> Result<IndexOperationResult, SearchIndexError> {
            Ok(IndexOperationResult::acknowledged())
        }

        async fn index_exists(&self, _index: &str) -> Result<bool, SearchIndexError> {
            Ok(true)
        }

        async fn delete_index(
            &self,
            _index: &str,
        ) -> Result<IndexOperationResult, SearchIndexError> {
            Ok(IndexOperationResult::acknowledged())
        }

        async fn get_aliases(
            &self,
            _aliases: &[String],
        ) -> Result<Vec<AliasBinding>, SearchIndexError> {
            Ok(Vec::new())
        }

        async fn update_aliases(
            &self,
            _bindings: &[AliasBinding],
            _detach_existing: bool,
        ) -> Result<IndexOperationResult, SearchIndexError> {
            Ok(IndexOperationResult::acknowledged())
        }

        async fn search(
            &self,
            request: &IndexSearchRequest,
        ) -> Result<Vec<IndexSearchHit>, SearchIndexError> {
            self.requests.lock().await.push(request.clone());
            Ok(self.hits.clone())
        }

        async fn health_check(&self) -> Result<bool, SearchIndexError> {
            Ok(true)
        }
    }

    fn space(name: &str, level: SpaceLevel, parent: Option<&Space>) -> Space {
        let id = Uuid::new_v4();
        Space {
            id,
            name_id: name.to_string(),
            level,
            level_zero_space_id: parent.map_or(id, |p| p.level_zero_space_id),
            parent_space_id: parent.map(|p| p.id),
            visibility: SpaceVisibility::Active,
            collaboration_id: None,
            profile: Profile::named(name),
            context: None,
            authorization: None,
        }
    }

    fn user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name_id: name.to_lowercase(),
            first_name: name.to_string(),
            last_name: "Doe".to_string(),
            email: format!("{}@example.org", name.to_lowercase()),
            service_profile: false,
            profile: Profile::named(name),
            credentials: Vec::new(),
        }
    }

    fn hit(
        index: &str,
        id: Uuid,
        document_type: &str,
        level: Option<SpaceLevel>,
        score: f64,
    ) -> IndexSearchHit {
        IndexSearchHit {
            index: index.to_string(),
            entity_id: id,
            document_type: document_type.to_string(),
            level,
            score,
        }
    }

    fn service(provider: Arc<MockProvider>, snapshot: Snapshot) -> IndexSearchService {
        IndexSearchService::new(
            Some(provider),
            Arc::new(SnapshotStore::new(snapshot)),
            IndexPattern::default(),
        )
    }

    #[tokio::test]
    async fn test_no_backend_is_unavailable() {
        let service = IndexSearchService::new(
            None,
            Arc::new(SnapshotStore::new(Snapshot::default())),
            IndexPattern::default(),
        );

        let result = service.search(&SearchInput::new(["solar"]), false).await;

        assert!(matches!(result, Err(QueryError::BackendUnavailable)));
    }

    #[tokio::test]
    async fn test_targets_every_searched_index() {
        let provider = MockProvider::returning(Vec::new());
        let service = service(provider.clone(), Snapshot::default());

        service
            .search(&SearchInput::new(["solar", "energy"]), false)
            .await
            .unwrap();

        let requests = provider.requests.lock().await;
        let request = &requests[0];
        assert_eq!(request.text, "solar energy");
        assert_eq!(request.targets.len(), 6);
        assert!(request
            .targets
            .iter()
            .all(|target| target.size == 8 * SIZE_MULTIPLIER));
        assert!(!request
            .targets
            .iter()
            .any(|target| target.index.ends_with("whiteboards")));
    }

    #[tokio::test]
    async fn test_public_only_targets_public_indices() {
        let provider = MockProvider::returning(Vec::new());
        let service = service(provider.clone(), Snapshot::default());

        service
            .search(&SearchInput::new(["solar"]), true)
            .await
            .unwrap();

        let requests = provider.requests.lock().await;
        let indices: Vec<_> = requests[0].targets.iter().map(|t| t.index.as_str()).collect();
        assert_eq!(
            indices,
            vec![
                IndexPattern::default().index_name(SearchIndex::Spaces),
                IndexPattern::default().index_name(SearchIndex::Subspaces),
                IndexPattern::default().index_name(SearchIndex::Posts),
            ]
        );
    }

    #[tokio::test]
    async fn test_group_filter_skips_backend() {
        let provider = MockProvider::returning(Vec::new());
        let service = service(provider.clone(), Snapshot::default());
        let mut input = SearchInput::new(["solar"]);
        input.types_filter = vec!["group".to_string()];

        let results = service.search(&input, false).await.unwrap();

        assert_eq!(results, SearchResults::default());
        assert!(provider.requests.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_hits_hydrate_into_groups() {
        let root = space("solar", SpaceLevel::L0, None);
        let challenge = space("panels", SpaceLevel::L1, Some(&root));
        let opportunity = space("roofs", SpaceLevel::L2, Some(&challenge));
        let jane = user("Jane");
        let spaces_index = IndexPattern::default().index_name(SearchIndex::Spaces);
        let subspaces_index = IndexPattern::default().index_name(SearchIndex::Subspaces);
        let users_index = IndexPattern::default().index_name(SearchIndex::Users);
        let provider = MockProvider::returning(vec![
            hit(&spaces_index, root.id, "space", Some(SpaceLevel::L0), 4.6),
            hit(&subspaces_index, opportunity.id, "subspace", Some(SpaceLevel::L2), 2.2),
            hit(&subspaces_index, challenge.id, "subspace", Some(SpaceLevel::L1), 3.1),
            hit(&users_index, jane.id, "user", None, 1.0),
            hit(&users_index, Uuid::new_v4(), "whiteboard", None, 9.0),
        ]);
        let service = service(
            provider,
            Snapshot {
                spaces: vec![root.clone(), challenge.clone(), opportunity.clone()],
                users: vec![jane.clone()],
                ..Default::default()
            },
        );

        let results = service
            .search(&SearchInput::new(["solar"]), false)
            .await
            .unwrap();

        assert_eq!(results.journey_results_count, 3);
        let scores: Vec<u32> = results.journey_results.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![5, 3, 2]);
        match &results.journey_results[2].result {
            SearchResultEntity::Subsubspace { subsubspace, .. } => {
                assert_eq!(subsubspace.id, opportunity.id)
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(results.contributor_results.len(), 1);
        assert_eq!(results.contributor_results[0].terms, vec!["solar"]);
    }

    #[tokio::test]
    async fn test_scope_reaches_request() {
        let provider = MockProvider::returning(Vec::new());
        let service = service(provider.clone(), Snapshot::default());
        let space_id = Uuid::new_v4();
        let mut input = SearchInput::new(["solar"]);
        input.search_in_space_filter = Some(space_id);

        service.search(&input, false).await.unwrap();

        assert_eq!(provider.requests.lock().await[0].space_id, Some(space_id));
    }
}
