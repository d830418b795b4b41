//! Term matcher for the collaboration search query engine.
//!
//! Runs one term against one entity kind and scores every hit. Field and
//! tag hits on the same entity are returned as separate matches so the
//! accumulator can add them up.

mod fields;
mod kind;

use std::sync::Arc;

use tracing::{debug, instrument};
use uuid::Uuid;

use collab_search_platform::{AuthorizationEvaluator, SearchSource};
use collab_search_shared::{
    AuthorizationPolicy, AuthorizationPrivilege, Principal, Space, SpaceLevel, SpaceVisibility,
};

use crate::accumulator::{Match, SCORE_INCREMENT};
use crate::errors::QueryError;
use crate::scope::SearchScope;

pub use fields::has_tag;
pub use kind::{enabled_kinds, MatchKind, ResultGroup};

/// Per-search inputs shared by every (kind, term) evaluation.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    pub principal: &'a Principal,
    pub tagset_names: &'a [String],
    pub scope: &'a SearchScope,
}

/// Matcher that reads candidates from the store and scores them.
pub struct TermMatcher {
    source: Arc<dyn SearchSource>,
    authorization: Arc<dyn AuthorizationEvaluator>,
}

impl TermMatcher {
    pub fn new(
        source: Arc<dyn SearchSource>,
        authorization: Arc<dyn AuthorizationEvaluator>,
    ) -> Self {
        Self {
            source,
            authorization,
        }
    }

    /// Evaluate one term against one kind.
    ///
    /// # Arguments
    ///
    /// * `kind` - The entity kind to search
    /// * `term` - A validated search term
    /// * `context` - Principal, tagset names and scope of the search
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Match>)` - Single-term matches, possibly two per entity
    /// * `Err(QueryError)` - If the store read failed
    #[instrument(skip(self, context), fields(kind = ?kind))]
    pub async fn match_term(
        &self,
        kind: MatchKind,
        term: &str,
        context: &MatchContext<'_>,
    ) -> Result<Vec<Match>, QueryError> {
        let allow = context.scope.allow_list(kind);
        if allow.is_some_and(|ids| ids.is_empty()) {
            debug!("Scope leaves nothing to search");
            return Ok(Vec::new());
        }

        let lowered = term.to_lowercase();
        let tagsets: &[String] = if kind.supports_tag_match() {
            context.tagset_names
        } else {
            &[]
        };
        let mut matches = Vec::new();

        match kind {
            MatchKind::User => {
                for user in self.source.find_users(allow).await? {
                    let field = fields::user_matches(&user, &lowered);
                    let tag = has_tag(&user.profile, tagsets, term);
                    push_hits(&mut matches, kind, user.id, term, field, tag, SCORE_INCREMENT);
                }
            }
            MatchKind::UserGroup => {
                for group in self.source.find_user_groups().await? {
                    let field = fields::user_group_matches(&group, &lowered);
                    let tag = has_tag(&group.profile, tagsets, term);
                    push_hits(&mut matches, kind, group.id, term, field, tag, SCORE_INCREMENT);
                }
            }
            MatchKind::Organization => {
                for organization in self.source.find_organizations(allow).await? {
                    let field = fields::organization_matches(&organization, &lowered);
                    let tag = has_tag(&organization.profile, tagsets, term);
                    let id = organization.id;
                    push_hits(&mut matches, kind, id, term, field, tag, SCORE_INCREMENT);
                }
            }
            MatchKind::Space | MatchKind::Subspace | MatchKind::Subsubspace => {
                for space in self.source.find_spaces(space_level(kind), allow).await? {
                    if !fields::space_matches(&space, &lowered) {
                        continue;
                    }
                    if let Some(score) = self.space_score(kind, &space, context.principal) {
                        matches.push(Match::new(kind, space.id, term, score));
                    }
                }
            }
            MatchKind::Post => {
                for post in self.source.find_posts(allow).await? {
                    let field = fields::post_matches(&post, &lowered);
                    let tag = has_tag(&post.profile, tagsets, term);
                    let readable = self.can_read(context.principal, post.authorization.as_ref());
                    if (field || tag) && readable {
                        push_hits(&mut matches, kind, post.id, term, field, tag, SCORE_INCREMENT);
                    }
                }
            }
            MatchKind::Callout => {
                for callout in self.source.find_callouts(allow).await? {
                    let field = fields::callout_matches(&callout, &lowered);
                    let tag = has_tag(&callout.framing.profile, tagsets, term);
                    let readable =
                        self.can_read(context.principal, callout.authorization.as_ref());
                    if (field || tag) && readable {
                        let id = callout.id;
                        push_hits(&mut matches, kind, id, term, field, tag, SCORE_INCREMENT);
                    }
                }
            }
        }

        debug!(count = matches.len(), "Term evaluated");
        Ok(matches)
    }

    fn can_read(&self, principal: &Principal, policy: Option<&AuthorizationPolicy>) -> bool {
        self.authorization
            .is_access_granted(principal, policy, AuthorizationPrivilege::Read)
    }

    /// Archived spaces never score. Top-level spaces fall back to half the
    /// increment without read access; deeper levels are dropped instead.
    fn space_score(&self, kind: MatchKind, space: &Space, principal: &Principal) -> Option<u32> {
        let readable = || self.can_read(principal, space.authorization.as_ref());

        match (kind, space.visibility) {
            (_, SpaceVisibility::Archived) => None,
            (MatchKind::Space, SpaceVisibility::Demo) => Some(SCORE_INCREMENT / 2),
            (MatchKind::Space, SpaceVisibility::Active) if readable() => Some(SCORE_INCREMENT),
            (MatchKind::Space, SpaceVisibility::Active) => Some(SCORE_INCREMENT / 2),
            _ if readable() => Some(SCORE_INCREMENT),
            _ => None,
        }
    }
}

fn space_level(kind: MatchKind) -> SpaceLevel {
    match kind {
        MatchKind::Subspace => SpaceLevel::L1,
        MatchKind::Subsubspace => SpaceLevel::L2,
        _ => SpaceLevel::L0,
    }
}

fn push_hits(
    matches: &mut Vec<Match>,
    kind: MatchKind,
    id: Uuid,
    term: &str,
    field: bool,
    tag: bool,
    score: u32,
) {
    for hit in [field, tag] {
        if hit {
            matches.push(Match::new(kind, id, term, score));
        }
    }
}
