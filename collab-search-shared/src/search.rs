//! Query input and ranked results.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::SearchResultType;
use crate::model::{Callout, Organization, Post, Space, User, UserGroup};

/// A term search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInput {
    pub terms: Vec<String>,
    /// Entity type names restricting the search; empty means all.
    #[serde(default)]
    pub types_filter: Vec<String>,
    /// Tagset names whose tags take part in tag matching.
    #[serde(default)]
    pub tagset_names: Vec<String>,
    #[serde(default)]
    pub search_in_space_filter: Option<Uuid>,
}

impl SearchInput {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// A hydrated entity together with the parents its kind requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SearchResultEntity {
    Space {
        space: Space,
    },
    Subspace {
        subspace: Space,
        space: Space,
    },
    Subsubspace {
        subsubspace: Space,
        subspace: Space,
        space: Space,
    },
    User {
        user: User,
    },
    Organization {
        organization: Organization,
    },
    UserGroup {
        group: UserGroup,
    },
    Post {
        post: Post,
        callout: Callout,
        space: Space,
        #[serde(skip_serializing_if = "Option::is_none")]
        subspace: Option<Space>,
        #[serde(skip_serializing_if = "Option::is_none")]
        subsubspace: Option<Space>,
    },
    Callout {
        callout: Callout,
        space: Space,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// `<type>-<entity id>`
    pub id: String,
    pub score: u32,
    pub terms: Vec<String>,
    #[serde(rename = "type")]
    pub result_type: SearchResultType,
    pub result: SearchResultEntity,
}

impl SearchResult {
    pub fn new(
        result_type: SearchResultType,
        entity_id: Uuid,
        score: u32,
        terms: Vec<String>,
        result: SearchResultEntity,
    ) -> Self {
        Self {
            id: format!("{}-{}", result_type, entity_id),
            score,
            terms,
            result_type,
            result,
        }
    }
}

/// Ranked result groups with their pre-truncation counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub journey_results: Vec<SearchResult>,
    pub journey_results_count: usize,
    pub contributor_results: Vec<SearchResult>,
    pub contributor_results_count: usize,
    pub contribution_results: Vec<SearchResult>,
    pub contribution_results_count: usize,
    pub group_results: Vec<SearchResult>,
    pub group_results_count: usize,
    pub callout_results: Vec<SearchResult>,
    pub callout_results_count: usize,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.journey_results.is_empty()
            && self.contributor_results.is_empty()
            && self.contribution_results.is_empty()
            && self.group_results.is_empty()
            && self.callout_results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Profile;

    #[test]
    fn test_result_id_format() {
        let id = Uuid::new_v4();
        let group = UserGroup {
            id,
            name: "Maintainers".to_string(),
            profile: Profile::named("Maintainers"),
        };
        let result = SearchResult::new(
            SearchResultType::UserGroup,
            id,
            10,
            vec!["main".to_string()],
            SearchResultEntity::UserGroup { group },
        );

        assert_eq!(result.id, format!("usergroup-{}", id));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["type"], "usergroup");
        assert_eq!(value["result"]["group"]["name"], "Maintainers");
    }

    #[test]
    fn test_input_defaults_from_json() {
        let input: SearchInput = serde_json::from_value(serde_json::json!({
            "terms": ["acme"]
        }))
        .unwrap();

        assert_eq!(input.terms, vec!["acme"]);
        assert!(input.types_filter.is_empty());
        assert!(input.search_in_space_filter.is_none());
    }
}
