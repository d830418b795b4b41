//! Result assembler for the collaboration search query engine.
//!
//! Hydrates every match through the get-or-fail lookups, attaches the
//! parents its kind requires, and ranks the results per output group.

use std::sync::Arc;

use tracing::{debug, error, instrument};

use collab_search_platform::{EntityLookup, StoreError};
use collab_search_shared::{SearchResult, SearchResultEntity, SearchResults, Space, SpaceLevel};

use crate::accumulator::Match;
use crate::matcher::{MatchKind, ResultGroup};

/// Default number of results kept per output group.
pub const RESULTS_LIMIT: usize = 8;

/// Assembler that turns accumulated matches into ranked results.
pub struct ResultAssembler {
    lookup: Arc<dyn EntityLookup>,
    max_results: usize,
}

impl ResultAssembler {
    pub fn new(lookup: Arc<dyn EntityLookup>, max_results: usize) -> Self {
        Self {
            lookup,
            max_results,
        }
    }

    /// Hydrate, group, rank and truncate.
    ///
    /// A match that cannot be hydrated is logged and left out; the others
    /// are unaffected. Group counts are the number of matches before
    /// hydration and truncation.
    #[instrument(skip(self, matches), fields(count = matches.len()))]
    pub async fn assemble(&self, matches: Vec<Match>) -> SearchResults {
        let mut results = SearchResults::default();

        for found in matches {
            let group = found.kind.result_group();
            *count_of(&mut results, group) += 1;

            match self.hydrate(&found).await {
                Ok(result) => group_of(&mut results, group).push(result),
                Err(e) => error!(
                    kind = ?found.kind,
                    id = %found.key,
                    error = %e,
                    "Unable to process search result"
                ),
            }
        }

        for group in [
            &mut results.journey_results,
            &mut results.contributor_results,
            &mut results.contribution_results,
            &mut results.group_results,
            &mut results.callout_results,
        ] {
            rank(group, self.max_results);
        }

        debug!(
            journeys = results.journey_results_count,
            contributors = results.contributor_results_count,
            contributions = results.contribution_results_count,
            groups = results.group_results_count,
            callouts = results.callout_results_count,
            "Assembled search results"
        );
        results
    }

    async fn hydrate(&self, found: &Match) -> Result<SearchResult, StoreError> {
        let id = found.key;
        let entity = match found.kind {
            MatchKind::User => SearchResultEntity::User {
                user: self.lookup.get_user_or_fail(id).await?,
            },
            MatchKind::UserGroup => SearchResultEntity::UserGroup {
                group: self.lookup.get_user_group_or_fail(id).await?,
            },
            MatchKind::Organization => SearchResultEntity::Organization {
                organization: self.lookup.get_organization_or_fail(id).await?,
            },
            MatchKind::Space => SearchResultEntity::Space {
                space: self.lookup.get_space_or_fail(id).await?,
            },
            MatchKind::Subspace => {
                let subspace = self.lookup.get_space_or_fail(id).await?;
                let space = self.lookup.get_space_or_fail(subspace.level_zero_space_id).await?;
                SearchResultEntity::Subspace { subspace, space }
            }
            MatchKind::Subsubspace => {
                let subsubspace = self.lookup.get_space_or_fail(id).await?;
                let subspace = self.parent_of(&subsubspace).await?;
                let space = self.lookup.get_space_or_fail(subsubspace.level_zero_space_id).await?;
                SearchResultEntity::Subsubspace {
                    subsubspace,
                    subspace,
                    space,
                }
            }
            MatchKind::Post => {
                let post = self.lookup.get_post_or_fail(id).await?;
                let callout = self.lookup.get_callout_for_post(id).await?;
                let owner = self
                    .lookup
                    .get_space_for_collaboration(callout.collaboration_id)
                    .await?;
                let (space, subspace, subsubspace) = match owner.level {
                    SpaceLevel::L0 => (owner, None, None),
                    SpaceLevel::L1 => {
                        let space = self.lookup.get_space_or_fail(owner.level_zero_space_id).await?;
                        (space, Some(owner), None)
                    }
                    SpaceLevel::L2 => {
                        let subspace = self.parent_of(&owner).await?;
                        let space = self.lookup.get_space_or_fail(owner.level_zero_space_id).await?;
                        (space, Some(subspace), Some(owner))
                    }
                };
                SearchResultEntity::Post {
                    post,
                    callout,
                    space,
                    subspace,
                    subsubspace,
                }
            }
            MatchKind::Callout => {
                let callout = self.lookup.get_callout_or_fail(id).await?;
                let owner = self
                    .lookup
                    .get_space_for_collaboration(callout.collaboration_id)
                    .await?;
                let space = match owner.level {
                    SpaceLevel::L0 => owner,
                    _ => self.lookup.get_space_or_fail(owner.level_zero_space_id).await?,
                };
                SearchResultEntity::Callout { callout, space }
            }
        };

        Ok(SearchResult::new(
            found.kind.result_type(),
            id,
            found.score,
            dedup_terms(&found.terms),
            entity,
        ))
    }

    async fn parent_of(&self, space: &Space) -> Result<Space, StoreError> {
        let parent_id = space.parent_space_id.ok_or_else(|| {
            StoreError::relationship_not_found(format!("space {} has no parent space", space.id))
        })?;
        self.lookup.get_space_or_fail(parent_id).await
    }
}

fn group_of(results: &mut SearchResults, group: ResultGroup) -> &mut Vec<SearchResult> {
    match group {
        ResultGroup::Journeys => &mut results.journey_results,
        ResultGroup::Contributors => &mut results.contributor_results,
        ResultGroup::Contributions => &mut results.contribution_results,
        ResultGroup::Groups => &mut results.group_results,
        ResultGroup::Callouts => &mut results.callout_results,
    }
}

fn count_of(results: &mut SearchResults, group: ResultGroup) -> &mut usize {
    match group {
        ResultGroup::Journeys => &mut results.journey_results_count,
        ResultGroup::Contributors => &mut results.contributor_results_count,
        ResultGroup::Contributions => &mut results.contribution_results_count,
        ResultGroup::Groups => &mut results.group_results_count,
        ResultGroup::Callouts => &mut results.callout_results_count,
    }
}

/// Stable sort by descending score, then truncate.
fn rank(results: &mut Vec<SearchResult>, limit: usize) {
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results.truncate(limit);
}

/// Drop repeated terms, keeping the first occurrence of each.
fn dedup_terms(terms: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(terms.len());
    for term in terms {
        if !unique.contains(term) {
            unique.push(term.clone());
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use collab_search_platform::{Snapshot, SnapshotStore};
    use collab_search_shared::{
        Callout, CalloutContribution, CalloutFraming, Organization, Post, Profile, SpaceVisibility,
    };
    use uuid::Uuid;

    fn space(level: SpaceLevel, parent: Option<&Space>) -> Space {
        let id = Uuid::new_v4();
        Space {
            id,
            name_id: format!("space-{}", id),
            level,
            level_zero_space_id: parent.map(|p| p.level_zero_space_id).unwrap_or(id),
            parent_space_id: parent.map(|p| p.id),
            visibility: SpaceVisibility::Active,
            collaboration_id: Some(Uuid::new_v4()),
            profile: Profile::named("Space"),
            context: None,
            authorization: None,
        }
    }

    fn organization(name: &str) -> Organization {
        Organization {
            id: Uuid::new_v4(),
            name_id: name.to_string(),
            profile: Profile::named(name),
            credentials: Vec::new(),
        }
    }

    fn assembler(snapshot: Snapshot, max_results: usize) -> ResultAssembler {
        ResultAssembler::new(Arc::new(SnapshotStore::new(snapshot)), max_results)
    }

    #[tokio::test]
    async fn test_rank_truncate_and_count() {
        let organizations: Vec<Organization> =
            (0..10).map(|i| organization(&format!("org-{}", i))).collect();
        let matches: Vec<Match> = organizations
            .iter()
            .enumerate()
            .map(|(i, org)| Match::new(MatchKind::Organization, org.id, "org", 10 * (i as u32 + 1)))
            .collect();
        let assembler = assembler(
            Snapshot {
                organizations: organizations.clone(),
                ..Default::default()
            },
            RESULTS_LIMIT,
        );

        let results = assembler.assemble(matches).await;

        assert_eq!(results.contributor_results.len(), 8);
        assert_eq!(results.contributor_results_count, 10);
        assert_eq!(results.contributor_results[0].score, 100);
        assert_eq!(
            results.contributor_results[0].id,
            format!("organization-{}", organizations[9].id)
        );
        assert!(results
            .contributor_results
            .windows(2)
            .all(|pair| pair[0].score >= pair[1].score));
    }

    #[tokio::test]
    async fn test_hydration_failure_drops_only_that_match() {
        let present = organization("acme");
        let assembler = assembler(
            Snapshot {
                organizations: vec![present.clone()],
                ..Default::default()
            },
            RESULTS_LIMIT,
        );
        let matches = vec![
            Match::new(MatchKind::Organization, present.id, "acme", 10),
            Match::new(MatchKind::Organization, Uuid::new_v4(), "acme", 20),
        ];

        let results = assembler.assemble(matches).await;

        assert_eq!(results.contributor_results.len(), 1);
        assert_eq!(results.contributor_results[0].score, 10);
        assert_eq!(results.contributor_results_count, 2);
    }

    #[tokio::test]
    async fn test_result_carries_stored_record() {
        let mut acme = organization("acme");
        acme.profile.description = Some("Solar panels".to_string());
        let assembler = assembler(
            Snapshot {
                organizations: vec![acme.clone()],
                ..Default::default()
            },
            RESULTS_LIMIT,
        );

        let results = assembler
            .assemble(vec![Match::new(MatchKind::Organization, acme.id, "acme", 10)])
            .await;

        assert_eq!(
            results.contributor_results[0].result,
            SearchResultEntity::Organization { organization: acme }
        );
    }

    #[tokio::test]
    async fn test_terms_deduplicated() {
        let acme = organization("acme");
        let assembler = assembler(
            Snapshot {
                organizations: vec![acme.clone()],
                ..Default::default()
            },
            RESULTS_LIMIT,
        );
        let mut found = Match::new(MatchKind::Organization, acme.id, "acme", 10);
        found.terms.extend(["corp".to_string(), "acme".to_string()]);

        let results = assembler.assemble(vec![found]).await;

        assert_eq!(results.contributor_results[0].terms, vec!["acme", "corp"]);
    }

    #[tokio::test]
    async fn test_post_in_subsubspace_gets_full_hierarchy() {
        let root = space(SpaceLevel::L0, None);
        let child = space(SpaceLevel::L1, Some(&root));
        let grandchild = space(SpaceLevel::L2, Some(&child));
        let post = Post {
            id: Uuid::new_v4(),
            name_id: "idea".to_string(),
            created_by: None,
            created_date: None,
            profile: Profile::named("Idea"),
            authorization: None,
        };
        let callout = Callout {
            id: Uuid::new_v4(),
            name_id: "ideas".to_string(),
            collaboration_id: grandchild.collaboration_id.unwrap(),
            created_by: None,
            created_date: None,
            framing: CalloutFraming {
                profile: Profile::named("Ideas"),
                whiteboard: None,
            },
            contributions: vec![CalloutContribution {
                id: Uuid::new_v4(),
                post: Some(post.clone()),
                whiteboard: None,
            }],
            authorization: None,
        };
        let assembler = assembler(
            Snapshot {
                spaces: vec![root.clone(), child.clone(), grandchild.clone()],
                callouts: vec![callout.clone()],
                ..Default::default()
            },
            RESULTS_LIMIT,
        );

        let results = assembler
            .assemble(vec![
                Match::new(MatchKind::Post, post.id, "idea", 10),
                Match::new(MatchKind::Callout, callout.id, "idea", 10),
            ])
            .await;

        match &results.contribution_results[0].result {
            SearchResultEntity::Post {
                callout: parent,
                space,
                subspace,
                subsubspace,
                ..
            } => {
                assert_eq!(parent.id, callout.id);
                assert_eq!(space.id, root.id);
                assert_eq!(subspace.as_ref().map(|s| s.id), Some(child.id));
                assert_eq!(subsubspace.as_ref().map(|s| s.id), Some(grandchild.id));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        match &results.callout_results[0].result {
            SearchResultEntity::Callout { space, .. } => assert_eq!(space.id, root.id),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_subsubspace_without_parent_is_dropped() {
        let root = space(SpaceLevel::L0, None);
        let mut orphan = space(SpaceLevel::L2, Some(&root));
        orphan.parent_space_id = None;
        let assembler = assembler(
            Snapshot {
                spaces: vec![root, orphan.clone()],
                ..Default::default()
            },
            RESULTS_LIMIT,
        );

        let results = assembler
            .assemble(vec![Match::new(MatchKind::Subsubspace, orphan.id, "space", 10)])
            .await;

        assert!(results.journey_results.is_empty());
        assert_eq!(results.journey_results_count, 1);
    }
}
