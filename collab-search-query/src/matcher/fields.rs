//! Field and tag predicates per entity kind.
//!
//! Field predicates take the term already lowercased and match it as a
//! case-insensitive substring. Tag predicates compare exactly.

use collab_search_shared::{Callout, Location, Organization, Post, Profile, Space, User, UserGroup};

fn contains(value: &str, term: &str) -> bool {
    value.to_lowercase().contains(term)
}

fn contains_opt(value: Option<&String>, term: &str) -> bool {
    value.is_some_and(|v| contains(v, term))
}

fn location_matches(location: Option<&Location>, term: &str) -> bool {
    location.is_some_and(|l| {
        contains_opt(l.city.as_ref(), term) || contains_opt(l.country.as_ref(), term)
    })
}

pub fn user_matches(user: &User, term: &str) -> bool {
    contains(&user.first_name, term)
        || contains(&user.last_name, term)
        || contains(&user.name_id, term)
        || contains(&user.email, term)
        || contains(&user.profile.display_name, term)
        || contains_opt(user.profile.description.as_ref(), term)
        || location_matches(user.profile.location.as_ref(), term)
}

pub fn user_group_matches(group: &UserGroup, term: &str) -> bool {
    contains(&group.name, term) || contains_opt(group.profile.description.as_ref(), term)
}

pub fn organization_matches(organization: &Organization, term: &str) -> bool {
    contains(&organization.name_id, term)
        || contains(&organization.profile.display_name, term)
        || contains_opt(organization.profile.description.as_ref(), term)
        || location_matches(organization.profile.location.as_ref(), term)
}

/// Any space level. Tag values count when equal to the term ignoring case.
pub fn space_matches(space: &Space, term: &str) -> bool {
    let profile = &space.profile;
    let context = space.context.as_ref();

    contains(&space.name_id, term)
        || contains(&profile.display_name, term)
        || contains_opt(profile.tagline.as_ref(), term)
        || contains_opt(profile.description.as_ref(), term)
        || profile.tags().any(|tag| tag.to_lowercase() == term)
        || context.is_some_and(|c| {
            contains_opt(c.vision.as_ref(), term)
                || contains_opt(c.impact.as_ref(), term)
                || contains_opt(c.who.as_ref(), term)
        })
        || location_matches(profile.location.as_ref(), term)
}

pub fn post_matches(post: &Post, term: &str) -> bool {
    contains(&post.name_id, term)
        || contains(&post.profile.display_name, term)
        || contains_opt(post.profile.description.as_ref(), term)
}

pub fn callout_matches(callout: &Callout, term: &str) -> bool {
    contains(&callout.name_id, term)
        || contains(&callout.framing.profile.display_name, term)
        || contains_opt(callout.framing.profile.description.as_ref(), term)
}

/// Whether a tagset named in `tagset_names` carries `term` as one of its tags.
pub fn has_tag(profile: &Profile, tagset_names: &[String], term: &str) -> bool {
    profile
        .tagsets
        .iter()
        .filter(|tagset| tagset_names.contains(&tagset.name))
        .any(|tagset| tagset.tags.iter().any(|tag| tag == term))
}

#[cfg(test)]
mod tests {
    use super::*;
    use collab_search_shared::{Context, SpaceLevel, SpaceVisibility, Tagset};
    use uuid::Uuid;

    fn space() -> Space {
        let id = Uuid::new_v4();
        Space {
            id,
            name_id: "green-energy".to_string(),
            level: SpaceLevel::L0,
            level_zero_space_id: id,
            parent_space_id: None,
            visibility: SpaceVisibility::Active,
            collaboration_id: None,
            profile: Profile {
                tagsets: vec![Tagset::new("default", vec!["Solar"])],
                location: Some(Location {
                    city: Some("Utrecht".to_string()),
                    country: None,
                }),
                ..Profile::named("Green Energy")
            },
            context: Some(Context {
                vision: Some("Carbon neutral cities".to_string()),
                ..Default::default()
            }),
            authorization: None,
        }
    }

    #[test]
    fn test_space_fields() {
        let space = space();
        assert!(space_matches(&space, "energy"));
        assert!(space_matches(&space, "neutral"));
        assert!(space_matches(&space, "utrecht"));
        assert!(space_matches(&space, "solar"));
        assert!(!space_matches(&space, "sol"));
        assert!(!space_matches(&space, "wind"));
    }

    #[test]
    fn test_has_tag_requires_named_tagset_and_exact_value() {
        let profile = Profile {
            tagsets: vec![
                Tagset::new("skills", vec!["rust"]),
                Tagset::new("keywords", vec!["python"]),
            ],
            ..Profile::named("Ada")
        };
        let skills = vec!["skills".to_string()];

        assert!(has_tag(&profile, &skills, "rust"));
        assert!(!has_tag(&profile, &skills, "python"));
        assert!(!has_tag(&profile, &skills, "Rust"));
        assert!(!has_tag(&profile, &[], "rust"));
    }
}
