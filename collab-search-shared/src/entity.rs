//! Entity kind enumerations shared across ingestion and search.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Entity types a caller may name in a search type filter, and the type tag
/// written onto every search document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEntityType {
    Space,
    Subspace,
    User,
    Group,
    Organization,
    Post,
    Callout,
    Whiteboard,
}

impl SearchEntityType {
    /// Entity types accepted in a search type filter.
    ///
    /// Whiteboards are indexed but have no query-time matcher.
    pub const FILTERABLE: [SearchEntityType; 7] = [
        SearchEntityType::User,
        SearchEntityType::Group,
        SearchEntityType::Organization,
        SearchEntityType::Space,
        SearchEntityType::Subspace,
        SearchEntityType::Post,
        SearchEntityType::Callout,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchEntityType::Space => "space",
            SearchEntityType::Subspace => "subspace",
            SearchEntityType::User => "user",
            SearchEntityType::Group => "group",
            SearchEntityType::Organization => "organization",
            SearchEntityType::Post => "post",
            SearchEntityType::Callout => "callout",
            SearchEntityType::Whiteboard => "whiteboard",
        }
    }

    /// Whether this type may appear in a search type filter.
    pub fn is_filterable(&self) -> bool {
        Self::FILTERABLE.contains(self)
    }
}

impl fmt::Display for SearchEntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchEntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "space" => Ok(SearchEntityType::Space),
            "subspace" => Ok(SearchEntityType::Subspace),
            "user" => Ok(SearchEntityType::User),
            "group" => Ok(SearchEntityType::Group),
            "organization" => Ok(SearchEntityType::Organization),
            "post" => Ok(SearchEntityType::Post),
            "callout" => Ok(SearchEntityType::Callout),
            "whiteboard" => Ok(SearchEntityType::Whiteboard),
            other => Err(format!("unknown entity type: {}", other)),
        }
    }
}

/// The type of a query-time search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchResultType {
    Space,
    Subspace,
    Subsubspace,
    User,
    Organization,
    #[serde(rename = "usergroup")]
    UserGroup,
    Post,
    Callout,
}

impl SearchResultType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchResultType::Space => "space",
            SearchResultType::Subspace => "subspace",
            SearchResultType::Subsubspace => "subsubspace",
            SearchResultType::User => "user",
            SearchResultType::Organization => "organization",
            SearchResultType::UserGroup => "usergroup",
            SearchResultType::Post => "post",
            SearchResultType::Callout => "callout",
        }
    }
}

impl fmt::Display for SearchResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Depth of a space in the space hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceLevel {
    /// Top-level space.
    L0,
    /// Subspace of a top-level space.
    L1,
    /// Subspace of a subspace.
    L2,
}

/// License visibility of a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpaceVisibility {
    Active,
    Demo,
    Archived,
}

impl SpaceVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpaceVisibility::Active => "ACTIVE",
            SpaceVisibility::Demo => "DEMO",
            SpaceVisibility::Archived => "ARCHIVED",
        }
    }
}
