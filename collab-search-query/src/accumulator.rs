//! Relevance accumulation across terms.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::errors::QueryError;
use crate::matcher::MatchKind;

/// Score awarded for one matching (kind, term) pair.
pub const SCORE_INCREMENT: u32 = 10;

/// An entity matched by one or more terms.
///
/// Only the entity key is carried; the assembler re-fetches the record
/// through the entity lookup when it hydrates the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub key: Uuid,
    pub kind: MatchKind,
    pub score: u32,
    /// Terms in the order they matched; may repeat.
    pub terms: Vec<String>,
}

impl Match {
    pub fn new(kind: MatchKind, key: Uuid, term: impl Into<String>, score: u32) -> Self {
        Self {
            key,
            kind,
            score,
            terms: vec![term.into()],
        }
    }
}

/// Map of matches keyed by kind and entity id. Matches on the same entity
/// add their scores and append their term.
#[derive(Debug, Default)]
pub struct MatchAccumulator {
    matches: BTreeMap<(MatchKind, Uuid), Match>,
}

impl MatchAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one single-term match.
    pub fn add(&mut self, incoming: Match) -> Result<(), QueryError> {
        if incoming.terms.len() != 1 {
            return Err(QueryError::validation(format!(
                "Expected exactly one matched term, got {}",
                incoming.terms.len()
            )));
        }

        match self.matches.get_mut(&(incoming.kind, incoming.key)) {
            Some(existing) => {
                existing.score += incoming.score;
                existing.terms.extend(incoming.terms);
            }
            None => {
                self.matches.insert((incoming.kind, incoming.key), incoming);
            }
        }

        Ok(())
    }

    pub fn get(&self, kind: MatchKind, key: Uuid) -> Option<&Match> {
        self.matches.get(&(kind, key))
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn into_matches(self) -> Vec<Match> {
        self.matches.into_values().collect()
    }
}
