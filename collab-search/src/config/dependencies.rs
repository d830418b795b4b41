//! Dependency initialization and wiring.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{AppError, Settings};
use collab_search_ingest::{IngestConfig, SearchIngestService};
use collab_search_platform::{
    CredentialAuthorizationEvaluator, EntityLookup, Snapshot, SnapshotStore, TaskService,
};
use collab_search_query::{IndexSearchService, SearchConfig, SearchService};
use collab_search_repository::{IndexPattern, OpenSearchClient, SearchIndexProvider};
use collab_search_shared::Principal;
use uuid::Uuid;

/// Container for all initialized dependencies.
pub struct Dependencies {
    pub ingest: SearchIngestService,
    pub search: SearchService,
    pub index_search: IndexSearchService,
    pub tasks: TaskService,
    store: Arc<SnapshotStore>,
}

impl Dependencies {
    /// Initialize all dependencies from settings.
    ///
    /// A missing backend URL, or a backend client that cannot be built,
    /// does not fail initialization; the ingest service then runs degraded.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If the store snapshot cannot be loaded
    pub async fn new(settings: &Settings) -> Result<Self, AppError> {
        info!(
            opensearch_url = ?settings.opensearch_url,
            index_prefix = %settings.index_prefix,
            index_pattern = %settings.index_pattern,
            "Initializing dependencies"
        );

        let snapshot = match &settings.snapshot_path {
            Some(path) => Snapshot::from_path(path).await?,
            None => {
                warn!("SEARCH_SNAPSHOT_PATH not set, starting with an empty store");
                Snapshot::default()
            }
        };
        let store = Arc::new(SnapshotStore::new(snapshot));

        let provider = match &settings.opensearch_url {
            Some(url) => Self::connect(url).await,
            None => {
                warn!("OPENSEARCH_URL not set, search backend disabled");
                None
            }
        };

        let index_pattern = IndexPattern::new(&settings.index_prefix, &settings.index_pattern);
        let search_config = SearchConfig {
            max_results: settings.max_results,
        };

        let index_search = IndexSearchService::with_config(
            provider.clone(),
            store.clone(),
            index_pattern.clone(),
            search_config.clone(),
        );

        let tasks = TaskService::new();
        let ingest = SearchIngestService::with_config(
            store.clone(),
            provider,
            Arc::new(tasks.clone()),
            index_pattern,
            IngestConfig {
                batch_delay: settings.batch_delay,
                ..Default::default()
            },
        );

        let search = SearchService::with_config(
            store.clone(),
            store.clone(),
            Arc::new(CredentialAuthorizationEvaluator::new(
                settings.authentication_enabled,
            )),
            search_config,
        );

        Ok(Self {
            ingest,
            search,
            index_search,
            tasks,
            store,
        })
    }

    /// Build the principal of a stored user, carrying their email and
    /// credentials.
    pub async fn principal_for(&self, user_id: Uuid) -> Result<Principal, AppError> {
        let user = self.store.get_user_or_fail(user_id).await?;
        Ok(Principal {
            user_id: Some(user.id),
            email: Some(user.email),
            credentials: user.credentials,
        })
    }

    async fn connect(url: &str) -> Option<Arc<dyn SearchIndexProvider>> {
        let client = match OpenSearchClient::new(url).await {
            Ok(client) => client,
            Err(e) => {
                error!(error = %e, "Failed to create search backend client");
                return None;
            }
        };

        match client.health_check().await {
            Ok(true) => info!("Search backend connection verified"),
            Ok(false) => warn!("Search backend cluster is unhealthy"),
            Err(e) => warn!(error = %e, "Search backend health check failed"),
        }

        Some(Arc::new(client))
    }
}
