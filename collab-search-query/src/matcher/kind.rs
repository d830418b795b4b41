//! Entity kinds the term matcher searches.

use collab_search_shared::{Principal, SearchEntityType, SearchResultType};

/// One searchable entity kind. Space levels are separate kinds because
/// they are scored, scoped and hydrated differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchKind {
    User,
    UserGroup,
    Organization,
    Space,
    Subspace,
    Subsubspace,
    Post,
    Callout,
}

/// Output group a kind's results are ranked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultGroup {
    Journeys,
    Contributors,
    Contributions,
    Groups,
    Callouts,
}

impl MatchKind {
    pub const ALL: [MatchKind; 8] = [
        MatchKind::User,
        MatchKind::UserGroup,
        MatchKind::Organization,
        MatchKind::Space,
        MatchKind::Subspace,
        MatchKind::Subsubspace,
        MatchKind::Post,
        MatchKind::Callout,
    ];

    /// The type filter value that enables this kind.
    pub fn entity_type(&self) -> SearchEntityType {
        match self {
            MatchKind::User => SearchEntityType::User,
            MatchKind::UserGroup => SearchEntityType::Group,
            MatchKind::Organization => SearchEntityType::Organization,
            MatchKind::Space => SearchEntityType::Space,
            MatchKind::Subspace | MatchKind::Subsubspace => SearchEntityType::Subspace,
            MatchKind::Post => SearchEntityType::Post,
            MatchKind::Callout => SearchEntityType::Callout,
        }
    }

    pub fn result_type(&self) -> SearchResultType {
        match self {
            MatchKind::User => SearchResultType::User,
            MatchKind::UserGroup => SearchResultType::UserGroup,
            MatchKind::Organization => SearchResultType::Organization,
            MatchKind::Space => SearchResultType::Space,
            MatchKind::Subspace => SearchResultType::Subspace,
            MatchKind::Subsubspace => SearchResultType::Subsubspace,
            MatchKind::Post => SearchResultType::Post,
            MatchKind::Callout => SearchResultType::Callout,
        }
    }

    pub fn result_group(&self) -> ResultGroup {
        match self {
            MatchKind::User | MatchKind::Organization => ResultGroup::Contributors,
            MatchKind::UserGroup => ResultGroup::Groups,
            MatchKind::Space | MatchKind::Subspace | MatchKind::Subsubspace => {
                ResultGroup::Journeys
            }
            MatchKind::Post => ResultGroup::Contributions,
            MatchKind::Callout => ResultGroup::Callouts,
        }
    }

    /// Whether tagset matching applies to this kind.
    pub fn supports_tag_match(&self) -> bool {
        matches!(
            self,
            MatchKind::User
                | MatchKind::UserGroup
                | MatchKind::Organization
                | MatchKind::Post
                | MatchKind::Callout
        )
    }
}

/// Kinds to search for a query.
///
/// An empty type filter enables every kind. Users stay hidden from
/// principals without an email, and top-level spaces are not searched when
/// the query is scoped to a space.
pub fn enabled_kinds(
    types: &[SearchEntityType],
    principal: &Principal,
    scoped: bool,
) -> Vec<MatchKind> {
    MatchKind::ALL
        .into_iter()
        .filter(|kind| types.is_empty() || types.contains(&kind.entity_type()))
        .filter(|kind| *kind != MatchKind::User || principal.email.is_some())
        .filter(|kind| *kind != MatchKind::Space || !scoped)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered() -> Principal {
        Principal {
            email: Some("ada@example.org".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_all_kinds_by_default() {
        assert_eq!(enabled_kinds(&[], &registered(), false), MatchKind::ALL.to_vec());
    }

    #[test]
    fn test_subspace_filter_enables_both_levels() {
        let kinds = enabled_kinds(&[SearchEntityType::Subspace], &registered(), false);
        assert_eq!(kinds, vec![MatchKind::Subspace, MatchKind::Subsubspace]);
    }

    #[test]
    fn test_anonymous_principal_skips_users() {
        let kinds = enabled_kinds(&[], &Principal::anonymous(), false);
        assert!(!kinds.contains(&MatchKind::User));
        assert!(kinds.contains(&MatchKind::Organization));
    }

    #[test]
    fn test_scope_disables_top_level_spaces() {
        let kinds = enabled_kinds(&[SearchEntityType::Space], &registered(), true);
        assert!(kinds.is_empty());
    }
}
