//! Entity fetchers for the collaboration search ingest.
//!
//! A fetcher reads one page from the store and turns it into documents.
//! Space, organization and user fetchers produce one document per row.
//! Post, callout and whiteboard fetchers page over non-archived spaces and
//! produce zero or more documents per space.

use collab_search_platform::IngestSource;
use collab_search_repository::SearchIndex;
use collab_search_shared::{Page, SearchDocument, SpaceLevel};

use crate::errors::IngestError;
use crate::processor::DocumentProcessor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityFetcher {
    Spaces(SpaceLevel),
    Organizations,
    Users,
    Posts,
    Callouts,
    Whiteboards,
}

impl EntityFetcher {
    pub fn name(&self) -> &'static str {
        match self {
            EntityFetcher::Spaces(SpaceLevel::L0) => "spaces-l0",
            EntityFetcher::Spaces(SpaceLevel::L1) => "spaces-l1",
            EntityFetcher::Spaces(SpaceLevel::L2) => "spaces-l2",
            EntityFetcher::Organizations => "organizations",
            EntityFetcher::Users => "users",
            EntityFetcher::Posts => "posts",
            EntityFetcher::Callouts => "callouts",
            EntityFetcher::Whiteboards => "whiteboards",
        }
    }

    /// Read one page and transform it. Store errors are not retried here.
    pub async fn fetch(
        &self,
        store: &dyn IngestSource,
        processor: &DocumentProcessor,
        page: Page,
    ) -> Result<Vec<SearchDocument>, IngestError> {
        let documents = match self {
            EntityFetcher::Spaces(level) => store
                .find_spaces(*level, page)
                .await?
                .iter()
                .map(|row| processor.process_space(row))
                .collect(),
            EntityFetcher::Organizations => store
                .find_organizations(page)
                .await?
                .iter()
                .map(|row| processor.process_organization(row))
                .collect(),
            EntityFetcher::Users => store
                .find_users(page)
                .await?
                .iter()
                .map(|row| processor.process_user(row))
                .collect(),
            EntityFetcher::Posts => {
                processor.process_posts(&store.find_collaborations(page).await?)
            }
            EntityFetcher::Callouts => {
                processor.process_callouts(&store.find_collaborations(page).await?)
            }
            EntityFetcher::Whiteboards => {
                processor.process_whiteboards(&store.find_collaborations(page).await?)
            }
        };

        Ok(documents)
    }
}

/// One configured ingestion source: where documents go, how they are read
/// and how many rows a page holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSourceConfig {
    pub index: SearchIndex,
    pub fetcher: EntityFetcher,
    pub batch_size: usize,
}

impl IngestSourceConfig {
    pub const fn new(index: SearchIndex, fetcher: EntityFetcher, batch_size: usize) -> Self {
        Self {
            index,
            fetcher,
            batch_size,
        }
    }
}

/// Sources in the order they are ingested. Both subspace levels share the
/// `subspaces` index.
pub fn default_sources() -> Vec<IngestSourceConfig> {
    vec![
        IngestSourceConfig::new(SearchIndex::Spaces, EntityFetcher::Spaces(SpaceLevel::L0), 100),
        IngestSourceConfig::new(SearchIndex::Subspaces, EntityFetcher::Spaces(SpaceLevel::L1), 100),
        IngestSourceConfig::new(SearchIndex::Subspaces, EntityFetcher::Spaces(SpaceLevel::L2), 100),
        IngestSourceConfig::new(SearchIndex::Organizations, EntityFetcher::Organizations, 100),
        IngestSourceConfig::new(SearchIndex::Users, EntityFetcher::Users, 100),
        IngestSourceConfig::new(SearchIndex::Posts, EntityFetcher::Posts, 20),
        IngestSourceConfig::new(SearchIndex::Callouts, EntityFetcher::Callouts, 20),
        IngestSourceConfig::new(SearchIndex::Whiteboards, EntityFetcher::Whiteboards, 10),
    ]
}
