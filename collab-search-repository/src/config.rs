//! Index naming configuration.

use std::fmt;

/// Default pattern inserted between the prefix and the index suffix.
pub const DEFAULT_INDEX_PATTERN: &str = "collab-data-";

/// The physical indices the ingestion pipeline writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SearchIndex {
    Spaces,
    Subspaces,
    Organizations,
    Users,
    Posts,
    Callouts,
    Whiteboards,
}

impl SearchIndex {
    pub const ALL: [SearchIndex; 7] = [
        SearchIndex::Spaces,
        SearchIndex::Subspaces,
        SearchIndex::Organizations,
        SearchIndex::Users,
        SearchIndex::Posts,
        SearchIndex::Callouts,
        SearchIndex::Whiteboards,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            SearchIndex::Spaces => "spaces",
            SearchIndex::Subspaces => "subspaces",
            SearchIndex::Organizations => "organizations",
            SearchIndex::Users => "users",
            SearchIndex::Posts => "posts",
            SearchIndex::Callouts => "callouts",
            SearchIndex::Whiteboards => "whiteboards",
        }
    }
}

impl fmt::Display for SearchIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Resolves index names as `prefix + pattern + suffix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPattern {
    pub prefix: String,
    pub pattern: String,
}

impl Default for IndexPattern {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            pattern: DEFAULT_INDEX_PATTERN.to_string(),
        }
    }
}

impl IndexPattern {
    pub fn new(prefix: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            pattern: pattern.into(),
        }
    }

    /// Full name of one index.
    pub fn index_name(&self, index: SearchIndex) -> String {
        format!("{}{}{}", self.prefix, self.pattern, index.suffix())
    }

    /// Name of the physical index a re-index run creates behind an alias.
    pub fn suffixed_index_name(&self, index: SearchIndex, suffix: &str) -> String {
        format!("{}-{}", self.index_name(index), suffix)
    }

    /// Names of every index, in creation order.
    pub fn all(&self) -> Vec<String> {
        SearchIndex::ALL
            .iter()
            .map(|index| self.index_name(*index))
            .collect()
    }
}
