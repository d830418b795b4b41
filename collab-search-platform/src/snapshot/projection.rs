//! Conversions from full domain records to ingestion projections.

use collab_search_shared::{
    Callout, CalloutRow, ContributionRow, FramingRow, Organization, OrganizationRow, Post,
    PostRow, Profile, ProfileRow, TagsetRow, User, UserRow, Whiteboard, WhiteboardRow,
};

pub(crate) fn profile_row(profile: &Profile) -> ProfileRow {
    ProfileRow {
        display_name: profile.display_name.clone(),
        tagline: profile.tagline.clone(),
        description: profile.description.clone(),
        location: profile.location.clone(),
        tagsets: profile
            .tagsets
            .iter()
            .map(|tagset| TagsetRow {
                tags: tagset.tags.clone(),
            })
            .collect(),
    }
}

pub(crate) fn organization_row(organization: &Organization) -> OrganizationRow {
    OrganizationRow {
        id: organization.id,
        name_id: organization.name_id.clone(),
        profile: profile_row(&organization.profile),
    }
}

pub(crate) fn user_row(user: &User) -> UserRow {
    UserRow {
        id: user.id,
        name_id: user.name_id.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        profile: profile_row(&user.profile),
    }
}

fn post_row(post: &Post) -> PostRow {
    PostRow {
        id: post.id,
        name_id: post.name_id.clone(),
        created_by: post.created_by,
        created_date: post.created_date,
        profile: profile_row(&post.profile),
    }
}

fn whiteboard_row(whiteboard: &Whiteboard) -> WhiteboardRow {
    WhiteboardRow {
        id: whiteboard.id,
        name_id: whiteboard.name_id.clone(),
        content: whiteboard.content.clone(),
        profile: profile_row(&whiteboard.profile),
    }
}

pub(crate) fn callout_row(callout: &Callout) -> CalloutRow {
    CalloutRow {
        id: callout.id,
        name_id: callout.name_id.clone(),
        created_by: callout.created_by,
        created_date: callout.created_date,
        framing: FramingRow {
            profile: profile_row(&callout.framing.profile),
            whiteboard: callout.framing.whiteboard.as_ref().map(whiteboard_row),
        },
        contributions: callout
            .contributions
            .iter()
            .map(|contribution| ContributionRow {
                id: contribution.id,
                post: contribution.post.as_ref().map(post_row),
                whiteboard: contribution.whiteboard.as_ref().map(whiteboard_row),
            })
            .collect(),
    }
}
