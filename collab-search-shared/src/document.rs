//! Flat documents written to the search index.
//!
//! Documents hold scalar ids and flattened strings only. Parent relations
//! are denormalized into `spaceID`, `collaborationID` and `calloutID`, and a
//! missing value is written as [`EMPTY_VALUE`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{SearchEntityType, SpaceLevel, SpaceVisibility};
use crate::model::{Context, Location};
use crate::projection::ProfileRow;

/// Sentinel for missing parent ids and visibilities.
pub const EMPTY_VALUE: &str = "N/A";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDocument {
    pub city: Option<String>,
    pub country: Option<String>,
}

impl From<&Location> for LocationDocument {
    fn from(location: &Location) -> Self {
        Self {
            city: location.city.clone(),
            country: location.country.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDocument {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationDocument>,
    /// Every tag of every tagset, space separated.
    pub tags: String,
}

impl From<&ProfileRow> for ProfileDocument {
    fn from(profile: &ProfileRow) -> Self {
        Self {
            display_name: profile.display_name.clone(),
            tagline: profile.tagline.clone(),
            description: profile.description.clone(),
            location: profile.location.as_ref().map(LocationDocument::from),
            tags: profile.joined_tags(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseDocument {
    pub visibility: String,
}

impl LicenseDocument {
    pub fn from_visibility(visibility: Option<SpaceVisibility>) -> Self {
        Self {
            visibility: visibility
                .map(|v| v.as_str().to_string())
                .unwrap_or_else(|| EMPTY_VALUE.to_string()),
        }
    }

    pub fn empty() -> Self {
        Self::from_visibility(None)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDocument {
    pub vision: Option<String>,
    pub impact: Option<String>,
    pub who: Option<String>,
}

impl From<&Context> for ContextDocument {
    fn from(context: &Context) -> Self {
        Self {
            vision: context.vision.clone(),
            impact: context.impact.clone(),
            who: context.who.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceDocument {
    pub id: Uuid,
    #[serde(rename = "nameID")]
    pub name_id: String,
    pub level: SpaceLevel,
    #[serde(rename = "spaceID")]
    pub space_id: String,
    pub license: LicenseDocument,
    pub profile: ProfileDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDocument {
    pub id: Uuid,
    #[serde(rename = "nameID")]
    pub name_id: String,
    #[serde(rename = "spaceID")]
    pub space_id: String,
    pub license: LicenseDocument,
    pub profile: ProfileDocument,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub id: Uuid,
    #[serde(rename = "nameID")]
    pub name_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "spaceID")]
    pub space_id: String,
    pub license: LicenseDocument,
    pub profile: ProfileDocument,
}

/// Document shape shared by posts and callouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDocument {
    pub id: Uuid,
    #[serde(rename = "nameID")]
    pub name_id: String,
    #[serde(rename = "spaceID")]
    pub space_id: String,
    #[serde(rename = "collaborationID")]
    pub collaboration_id: String,
    #[serde(rename = "calloutID", skip_serializing_if = "Option::is_none")]
    pub callout_id: Option<Uuid>,
    pub license: LicenseDocument,
    pub profile: ProfileDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhiteboardDocument {
    pub id: Uuid,
    #[serde(rename = "nameID")]
    pub name_id: String,
    /// Plain text extracted from the diagram.
    pub content: String,
    #[serde(rename = "spaceID")]
    pub space_id: String,
    #[serde(rename = "collaborationID")]
    pub collaboration_id: String,
    #[serde(rename = "calloutID")]
    pub callout_id: Uuid,
    pub license: LicenseDocument,
    pub profile: ProfileDocument,
}

/// A document destined for one of the search indices, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchDocument {
    Space(SpaceDocument),
    Subspace(SpaceDocument),
    Organization(OrganizationDocument),
    User(UserDocument),
    Post(ContributionDocument),
    Callout(ContributionDocument),
    Whiteboard(WhiteboardDocument),
}

impl SearchDocument {
    pub fn id(&self) -> Uuid {
        match self {
            SearchDocument::Space(doc) | SearchDocument::Subspace(doc) => doc.id,
            SearchDocument::Organization(doc) => doc.id,
            SearchDocument::User(doc) => doc.id,
            SearchDocument::Post(doc) | SearchDocument::Callout(doc) => doc.id,
            SearchDocument::Whiteboard(doc) => doc.id,
        }
    }

    pub fn entity_type(&self) -> SearchEntityType {
        match self {
            SearchDocument::Space(_) => SearchEntityType::Space,
            SearchDocument::Subspace(_) => SearchEntityType::Subspace,
            SearchDocument::Organization(_) => SearchEntityType::Organization,
            SearchDocument::User(_) => SearchEntityType::User,
            SearchDocument::Post(_) => SearchEntityType::Post,
            SearchDocument::Callout(_) => SearchEntityType::Callout,
            SearchDocument::Whiteboard(_) => SearchEntityType::Whiteboard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::TagsetRow;

    #[test]
    fn test_user_document_is_flat_and_tagged() {
        let id = Uuid::new_v4();
        let doc = SearchDocument::User(UserDocument {
            id,
            name_id: "jane".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            space_id: EMPTY_VALUE.to_string(),
            license: LicenseDocument::empty(),
            profile: ProfileDocument::from(&ProfileRow {
                display_name: "Jane Doe".to_string(),
                tagsets: vec![TagsetRow {
                    tags: vec!["rust".to_string(), "energy".to_string()],
                }],
                ..Default::default()
            }),
        });

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["type"], "user");
        assert_eq!(value["id"], id.to_string());
        assert_eq!(value["spaceID"], "N/A");
        assert_eq!(value["license"]["visibility"], "N/A");
        assert_eq!(value["profile"]["tags"], "rust energy");
        assert_eq!(value["firstName"], "Jane");
        assert!(value.get("email").is_none());
    }

    #[test]
    fn test_subspace_document_type_tag() {
        let doc = SearchDocument::Subspace(SpaceDocument {
            id: Uuid::new_v4(),
            name_id: "sub".to_string(),
            level: SpaceLevel::L2,
            space_id: Uuid::new_v4().to_string(),
            license: LicenseDocument::from_visibility(Some(SpaceVisibility::Demo)),
            profile: ProfileDocument::default(),
            context: None,
        });

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["type"], "subspace");
        assert_eq!(value["level"], "L2");
        assert_eq!(value["license"]["visibility"], "DEMO");
        assert_eq!(doc.entity_type(), SearchEntityType::Subspace);
    }
}
