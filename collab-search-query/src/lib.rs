//! # Collaboration Search Query
//!
//! Interactive term search over platform entities.
//!
//! ## Architecture
//!
//! 1. **Validation**: Rejects malformed input before any store read
//! 2. **Scope**: Turns an optional space filter into per-kind allow-lists
//! 3. **Matcher**: Scores one term against one entity kind
//! 4. **Accumulator**: Merges matches on the same entity across terms
//! 5. **Assembler**: Hydrates, groups, ranks and truncates the results
//!
//! The index search in [`extract`] skips steps 2 to 4: it sends the joined
//! terms to the search backend and hands the hits to the assembler.

pub mod accumulator;
pub mod assembler;
pub mod errors;
pub mod extract;
pub mod matcher;
pub mod scope;
pub mod service;
pub mod validation;

pub use accumulator::{Match, MatchAccumulator, SCORE_INCREMENT};
pub use assembler::{ResultAssembler, RESULTS_LIMIT};
pub use errors::QueryError;
pub use extract::{IndexSearchService, SIZE_MULTIPLIER};
pub use matcher::{MatchKind, TermMatcher};
pub use scope::SearchScope;
pub use service::{SearchConfig, SearchService};
pub use validation::{validate, ValidatedQuery};
