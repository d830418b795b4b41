//! Field projections read by the ingestion fetchers.
//!
//! Each row carries only the fields a search document needs, plus the
//! parent references required to denormalize the owning space. Rows never
//! carry authorization policies or private user fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{SpaceLevel, SpaceVisibility};
use crate::model::{Context, Location};

/// A page request against the relational store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Page {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagsetRow {
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub display_name: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub location: Option<Location>,
    pub tagsets: Vec<TagsetRow>,
}

impl ProfileRow {
    /// All tags of all tagsets joined with single spaces.
    pub fn joined_tags(&self) -> String {
        self.tagsets
            .iter()
            .flat_map(|tagset| tagset.tags.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Reference to a parent space, with its own parent when loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentSpaceRef {
    pub id: Uuid,
    pub parent: Option<Box<ParentSpaceRef>>,
}

impl ParentSpaceRef {
    pub fn new(id: Uuid) -> Self {
        Self { id, parent: None }
    }

    pub fn with_parent(id: Uuid, parent: ParentSpaceRef) -> Self {
        Self {
            id,
            parent: Some(Box::new(parent)),
        }
    }

    /// Id of the ancestor `steps` levels above this reference, if loaded.
    pub fn ancestor_id(&self, steps: usize) -> Option<Uuid> {
        let mut current = self;
        for _ in 0..steps {
            current = current.parent.as_deref()?;
        }
        Some(current.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceRow {
    pub id: Uuid,
    pub name_id: String,
    pub level: SpaceLevel,
    /// Visibility of the owning account's license.
    pub visibility: Option<SpaceVisibility>,
    pub parent: Option<ParentSpaceRef>,
    pub profile: ProfileRow,
    pub context: Option<Context>,
}

impl SpaceRow {
    /// Id of the top-level space this row belongs to.
    ///
    /// Level-zero spaces are their own top-level space. Deeper spaces resolve
    /// through the loaded parent chain and yield `None` when it is broken.
    pub fn top_level_space_id(&self) -> Option<Uuid> {
        match self.level {
            SpaceLevel::L0 => Some(self.id),
            SpaceLevel::L1 => self.parent.as_ref().and_then(|p| p.ancestor_id(0)),
            SpaceLevel::L2 => self.parent.as_ref().and_then(|p| p.ancestor_id(1)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationRow {
    pub id: Uuid,
    pub name_id: String,
    pub profile: ProfileRow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: Uuid,
    pub name_id: String,
    pub first_name: String,
    pub last_name: String,
    pub profile: ProfileRow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRow {
    pub id: Uuid,
    pub name_id: String,
    pub created_by: Option<Uuid>,
    pub created_date: Option<DateTime<Utc>>,
    pub profile: ProfileRow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhiteboardRow {
    pub id: Uuid,
    pub name_id: String,
    pub content: String,
    pub profile: ProfileRow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramingRow {
    pub profile: ProfileRow,
    pub whiteboard: Option<WhiteboardRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionRow {
    pub id: Uuid,
    pub post: Option<PostRow>,
    pub whiteboard: Option<WhiteboardRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalloutRow {
    pub id: Uuid,
    pub name_id: String,
    pub created_by: Option<Uuid>,
    pub created_date: Option<DateTime<Utc>>,
    pub framing: FramingRow,
    pub contributions: Vec<ContributionRow>,
}

/// A non-archived space with its collaboration and callouts loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaborationRow {
    pub space_id: Uuid,
    pub level: SpaceLevel,
    pub visibility: Option<SpaceVisibility>,
    pub parent: Option<ParentSpaceRef>,
    pub collaboration_id: Option<Uuid>,
    pub callouts: Vec<CalloutRow>,
}

impl CollaborationRow {
    /// Id of the top-level space owning this collaboration.
    pub fn top_level_space_id(&self) -> Option<Uuid> {
        match self.level {
            SpaceLevel::L0 => Some(self.space_id),
            SpaceLevel::L1 => self.parent.as_ref().and_then(|p| p.ancestor_id(0)),
            SpaceLevel::L2 => self.parent.as_ref().and_then(|p| p.ancestor_id(1)),
        }
    }
}
