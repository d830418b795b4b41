//! Search input validation.

use collab_search_shared::{SearchEntityType, SearchInput};
use uuid::Uuid;

use crate::errors::QueryError;

pub const MAX_TERMS: usize = 10;
pub const MIN_TERM_LENGTH: usize = 2;
pub const MAX_TAGSET_NAMES: usize = 2;

/// A search input that passed validation, with type names parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    pub terms: Vec<String>,
    pub types: Vec<SearchEntityType>,
    pub tagset_names: Vec<String>,
    pub space: Option<Uuid>,
}

/// Check the input limits and parse the type filter.
///
/// Terms are trimmed before their length is checked.
pub fn validate(input: &SearchInput) -> Result<ValidatedQuery, QueryError> {
    if input.terms.len() > MAX_TERMS {
        return Err(QueryError::validation(format!(
            "Maximum number of search terms is {}; received {}",
            MAX_TERMS,
            input.terms.len()
        )));
    }

    let terms: Vec<String> = input.terms.iter().map(|t| t.trim().to_string()).collect();
    if let Some(short) = terms.iter().find(|t| t.chars().count() < MIN_TERM_LENGTH) {
        return Err(QueryError::validation(format!(
            "Search terms must be at least {} characters long: '{}'",
            MIN_TERM_LENGTH, short
        )));
    }

    if input.tagset_names.len() > MAX_TAGSET_NAMES {
        return Err(QueryError::validation(format!(
            "Maximum number of tagset names is {}; received {}",
            MAX_TAGSET_NAMES,
            input.tagset_names.len()
        )));
    }

    let mut types = Vec::with_capacity(input.types_filter.len());
    for name in &input.types_filter {
        let entity_type = name
            .parse::<SearchEntityType>()
            .ok()
            .filter(SearchEntityType::is_filterable)
            .ok_or_else(|| QueryError::validation(format!("Not allowed type filter: {}", name)))?;
        types.push(entity_type);
    }

    Ok(ValidatedQuery {
        terms,
        types,
        tagset_names: input.tagset_names.clone(),
        space: input.search_in_space_filter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_input() {
        let input = SearchInput {
            types_filter: vec!["subspace".to_string(), "USER".to_string()],
            tagset_names: vec!["skills".to_string()],
            ..SearchInput::new([" acme ", "energy"])
        };

        let query = validate(&input).unwrap();

        assert_eq!(query.terms, vec!["acme", "energy"]);
        assert_eq!(query.types, vec![SearchEntityType::Subspace, SearchEntityType::User]);
    }

    #[test]
    fn test_rejects_too_many_terms() {
        let terms: Vec<String> = (0..11).map(|i| format!("term{}", i)).collect();
        assert!(matches!(
            validate(&SearchInput::new(terms)),
            Err(QueryError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_short_term() {
        assert!(validate(&SearchInput::new(["ok", "a"])).is_err());
        assert!(validate(&SearchInput::new(["  b "])).is_err());
    }

    #[test]
    fn test_rejects_too_many_tagsets() {
        let input = SearchInput {
            tagset_names: vec!["a".into(), "b".into(), "c".into()],
            ..SearchInput::new(["acme"])
        };
        assert!(validate(&input).is_err());
    }

    #[test]
    fn test_rejects_unknown_and_unfilterable_types() {
        for name in ["planet", "whiteboard"] {
            let input = SearchInput {
                types_filter: vec![name.to_string()],
                ..SearchInput::new(["acme"])
            };
            assert!(validate(&input).is_err(), "{} should be rejected", name);
        }
    }
}
