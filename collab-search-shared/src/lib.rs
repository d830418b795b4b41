//! # Collaboration Search Shared
//!
//! Types shared by the ingestion pipeline and the query engine: domain
//! records read from the relational store, the projections the ingestion
//! fetchers work with, the flat documents written to the search index, and
//! the result types returned to callers.

pub mod authorization;
pub mod document;
pub mod entity;
pub mod ingest;
pub mod model;
pub mod projection;
pub mod search;

pub use authorization::{
    AuthorizationCredential, AuthorizationPolicy, AuthorizationPrivilege, Credential,
    CredentialRule, Principal,
};
pub use document::{
    ContextDocument, ContributionDocument, LicenseDocument, LocationDocument, OrganizationDocument,
    ProfileDocument, SearchDocument, SpaceDocument, UserDocument, WhiteboardDocument, EMPTY_VALUE,
};
pub use entity::{SearchEntityType, SearchResultType, SpaceLevel, SpaceVisibility};
pub use ingest::{ErroredDocument, IngestBatchResult, IngestBulkResult, IngestReport};
pub use model::{
    Callout, CalloutContribution, CalloutFraming, Context, Location, Organization, Post, Profile,
    Space, Tagset, User, UserGroup, Whiteboard,
};
pub use projection::{
    CalloutRow, CollaborationRow, ContributionRow, FramingRow, OrganizationRow, Page,
    ParentSpaceRef, PostRow, ProfileRow, SpaceRow, TagsetRow, UserRow, WhiteboardRow,
};
pub use search::{SearchInput, SearchResult, SearchResultEntity, SearchResults};
