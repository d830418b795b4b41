//! Domain records as the relational store returns them when fully loaded.
//!
//! These are the authoritative shapes used by the query engine for matching
//! and by the result assembler for hydration. Ingestion works on the narrower
//! projections in [`crate::projection`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::authorization::{AuthorizationPolicy, Credential};
use crate::entity::{SpaceLevel, SpaceVisibility};

/// Geographic location of a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// A named set of tags on a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tagset {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Tagset {
    pub fn new(name: impl Into<String>, tags: Vec<&str>) -> Self {
        Self {
            name: name.into(),
            tags: tags.into_iter().map(String::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub display_name: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub tagsets: Vec<Tagset>,
}

impl Profile {
    pub fn named(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Default::default()
        }
    }

    /// All tag values across tagsets, in tagset order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tagsets
            .iter()
            .flat_map(|tagset| tagset.tags.iter().map(String::as_str))
    }
}

/// Narrative fields of a space.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default)]
    pub vision: Option<String>,
    #[serde(default)]
    pub impact: Option<String>,
    #[serde(default)]
    pub who: Option<String>,
}

/// A space at any level of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: Uuid,
    #[serde(rename = "nameID")]
    pub name_id: String,
    pub level: SpaceLevel,
    /// Id of the top-level ancestor; equal to `id` for level-zero spaces.
    #[serde(rename = "levelZeroSpaceID")]
    pub level_zero_space_id: Uuid,
    #[serde(default, rename = "parentSpaceID")]
    pub parent_space_id: Option<Uuid>,
    pub visibility: SpaceVisibility,
    #[serde(default, rename = "collaborationID")]
    pub collaboration_id: Option<Uuid>,
    pub profile: Profile,
    #[serde(default)]
    pub context: Option<Context>,
    #[serde(default)]
    pub authorization: Option<AuthorizationPolicy>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[serde(rename = "nameID")]
    pub name_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub service_profile: bool,
    pub profile: Profile,
    #[serde(default)]
    pub credentials: Vec<Credential>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Uuid,
    #[serde(rename = "nameID")]
    pub name_id: String,
    pub profile: Profile,
    #[serde(default)]
    pub credentials: Vec<Credential>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroup {
    pub id: Uuid,
    pub name: String,
    pub profile: Profile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    #[serde(rename = "nameID")]
    pub name_id: String,
    #[serde(default)]
    pub created_by: Option<Uuid>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    pub profile: Profile,
    #[serde(default)]
    pub authorization: Option<AuthorizationPolicy>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Whiteboard {
    pub id: Uuid,
    #[serde(rename = "nameID")]
    pub name_id: String,
    /// Serialized diagram.
    #[serde(default)]
    pub content: String,
    pub profile: Profile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalloutFraming {
    pub profile: Profile,
    #[serde(default)]
    pub whiteboard: Option<Whiteboard>,
}

/// A contribution to a callout: a post, a whiteboard, or neither (links).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalloutContribution {
    pub id: Uuid,
    #[serde(default)]
    pub post: Option<Post>,
    #[serde(default)]
    pub whiteboard: Option<Whiteboard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Callout {
    pub id: Uuid,
    #[serde(rename = "nameID")]
    pub name_id: String,
    #[serde(rename = "collaborationID")]
    pub collaboration_id: Uuid,
    #[serde(default)]
    pub created_by: Option<Uuid>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    pub framing: CalloutFraming,
    #[serde(default)]
    pub contributions: Vec<CalloutContribution>,
    #[serde(default)]
    pub authorization: Option<AuthorizationPolicy>,
}

impl Callout {
    /// Posts contributed to this callout.
    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.contributions.iter().filter_map(|c| c.post.as_ref())
    }
}
