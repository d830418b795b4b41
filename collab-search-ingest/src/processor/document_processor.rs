//! Document processor implementation.
//!
//! Transforms store projections into flat `SearchDocument` values.

use tracing::{debug, instrument};
use uuid::Uuid;

use super::whiteboard::extract_whiteboard_text;
use collab_search_shared::{
    CalloutRow, CollaborationRow, ContextDocument, ContributionDocument, LicenseDocument,
    OrganizationDocument, OrganizationRow, ProfileDocument, SearchDocument, SpaceDocument,
    SpaceLevel, SpaceRow, UserDocument, UserRow, WhiteboardDocument, WhiteboardRow, EMPTY_VALUE,
};

fn id_or_empty(id: Option<Uuid>) -> String {
    id.map(|id| id.to_string())
        .unwrap_or_else(|| EMPTY_VALUE.to_string())
}

/// Parent context shared by every document produced from one collaboration.
struct CollaborationContext {
    space_id: String,
    collaboration_id: String,
    license: LicenseDocument,
}

impl From<&CollaborationRow> for CollaborationContext {
    fn from(row: &CollaborationRow) -> Self {
        Self {
            space_id: id_or_empty(row.top_level_space_id()),
            collaboration_id: id_or_empty(row.collaboration_id),
            license: LicenseDocument::from_visibility(row.visibility),
        }
    }
}

/// Processor that transforms projections into search documents.
///
/// The processor is responsible for:
/// - Flattening profiles and tagsets into document fields
/// - Denormalizing the top-level space, collaboration and callout ids
/// - Skipping whiteboards without extractable text
#[derive(Debug, Clone, Default)]
pub struct DocumentProcessor;

impl DocumentProcessor {
    /// Create a new document processor.
    pub fn new() -> Self {
        Self
    }

    /// Level-zero rows become `space` documents, deeper ones `subspace` documents.
    pub fn process_space(&self, row: &SpaceRow) -> SearchDocument {
        let document = SpaceDocument {
            id: row.id,
            name_id: row.name_id.clone(),
            level: row.level,
            space_id: id_or_empty(row.top_level_space_id()),
            license: LicenseDocument::from_visibility(row.visibility),
            profile: ProfileDocument::from(&row.profile),
            context: row.context.as_ref().map(ContextDocument::from),
        };

        match row.level {
            SpaceLevel::L0 => SearchDocument::Space(document),
            SpaceLevel::L1 | SpaceLevel::L2 => SearchDocument::Subspace(document),
        }
    }

    pub fn process_organization(&self, row: &OrganizationRow) -> SearchDocument {
        SearchDocument::Organization(OrganizationDocument {
            id: row.id,
            name_id: row.name_id.clone(),
            space_id: EMPTY_VALUE.to_string(),
            license: LicenseDocument::empty(),
            profile: ProfileDocument::from(&row.profile),
        })
    }

    pub fn process_user(&self, row: &UserRow) -> SearchDocument {
        SearchDocument::User(UserDocument {
            id: row.id,
            name_id: row.name_id.clone(),
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            space_id: EMPTY_VALUE.to_string(),
            license: LicenseDocument::empty(),
            profile: ProfileDocument::from(&row.profile),
        })
    }

    /// One `callout` document per callout, profiled by its framing.
    #[instrument(skip(self, rows), fields(space_count = rows.len()))]
    pub fn process_callouts(&self, rows: &[CollaborationRow]) -> Vec<SearchDocument> {
        let documents: Vec<SearchDocument> = rows
            .iter()
            .flat_map(|row| {
                let context = CollaborationContext::from(row);
                row.callouts
                    .iter()
                    .map(move |callout| Self::callout_document(&context, callout))
                    .collect::<Vec<_>>()
            })
            .collect();

        debug!(count = documents.len(), "Processed callouts");
        documents
    }

    /// One `post` document per contribution that carries a post.
    #[instrument(skip(self, rows), fields(space_count = rows.len()))]
    pub fn process_posts(&self, rows: &[CollaborationRow]) -> Vec<SearchDocument> {
        let mut documents = Vec::new();

        for row in rows {
            let context = CollaborationContext::from(row);
            for callout in &row.callouts {
                for post in callout.contributions.iter().filter_map(|c| c.post.as_ref()) {
                    documents.push(SearchDocument::Post(ContributionDocument {
                        id: post.id,
                        name_id: post.name_id.clone(),
                        space_id: context.space_id.clone(),
                        collaboration_id: context.collaboration_id.clone(),
                        callout_id: Some(callout.id),
                        license: context.license.clone(),
                        profile: ProfileDocument::from(&post.profile),
                        created_by: post.created_by,
                        created_date: post.created_date,
                    }));
                }
            }
        }

        debug!(count = documents.len(), "Processed posts");
        documents
    }

    /// Framing and contribution whiteboards of every callout.
    ///
    /// A whiteboard whose content yields no text is skipped on its own; the
    /// other whiteboards of the same callout are still produced.
    #[instrument(skip(self, rows), fields(space_count = rows.len()))]
    pub fn process_whiteboards(&self, rows: &[CollaborationRow]) -> Vec<SearchDocument> {
        let mut documents = Vec::new();

        for row in rows {
            let context = CollaborationContext::from(row);
            for callout in &row.callouts {
                let whiteboards = callout.framing.whiteboard.iter().chain(
                    callout
                        .contributions
                        .iter()
                        .filter_map(|c| c.whiteboard.as_ref()),
                );

                for whiteboard in whiteboards {
                    match Self::whiteboard_document(&context, callout, whiteboard) {
                        Some(document) => documents.push(document),
                        None => debug!(
                            whiteboard_id = %whiteboard.id,
                            "Skipping whiteboard without text content"
                        ),
                    }
                }
            }
        }

        debug!(count = documents.len(), "Processed whiteboards");
        documents
    }

    fn callout_document(context: &CollaborationContext, callout: &CalloutRow) -> SearchDocument {
        SearchDocument::Callout(ContributionDocument {
            id: callout.id,
            name_id: callout.name_id.clone(),
            space_id: context.space_id.clone(),
            collaboration_id: context.collaboration_id.clone(),
            callout_id: None,
            license: context.license.clone(),
            profile: ProfileDocument::from(&callout.framing.profile),
            created_by: callout.created_by,
            created_date: callout.created_date,
        })
    }

    fn whiteboard_document(
        context: &CollaborationContext,
        callout: &CalloutRow,
        whiteboard: &WhiteboardRow,
    ) -> Option<SearchDocument> {
        let content = extract_whiteboard_text(&whiteboard.content);
        if content.trim().is_empty() {
            return None;
        }

        Some(SearchDocument::Whiteboard(WhiteboardDocument {
            id: whiteboard.id,
            name_id: whiteboard.name_id.clone(),
            content,
            space_id: context.space_id.clone(),
            collaboration_id: context.collaboration_id.clone(),
            callout_id: callout.id,
            license: context.license.clone(),
            profile: ProfileDocument::from(&whiteboard.profile),
        }))
    }
}
