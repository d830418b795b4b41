//! OpenSearch query builders.
//!
//! Builds the multi-search request for a full-text search over the
//! ingested documents.

use serde_json::{json, Value};
use uuid::Uuid;

use crate::types::IndexSearchRequest;

/// Document fields returned with every hit. The entity is re-fetched from
/// the store, so only what identifies it is read back.
const SOURCE_FIELDS: [&str; 3] = ["id", "type", "level"];

/// Build the query shared by every target index.
///
/// The query combines:
/// - `multi_match` over the profile, naming, context and content fields
///   with the display name boosted
/// - `match_phrase_prefix` on the display name for strong prefix matches
/// - a `spaceID` term filter when the search is scoped to a space
pub fn build_search_query(text: &str, space_id: Option<Uuid>) -> Value {
    let text_query = json!({
        "bool": {
            "should": [
                {
                    "multi_match": {
                        "query": text,
                        "fields": [
                            "profile.displayName^2",
                            "profile.tagline",
                            "profile.description",
                            "profile.tags",
                            "profile.location.city",
                            "profile.location.country",
                            "nameID",
                            "firstName",
                            "lastName",
                            "context.vision",
                            "context.impact",
                            "context.who",
                            "content"
                        ],
                        "fuzziness": "AUTO"
                    }
                },
                {
                    "match_phrase_prefix": {
                        "profile.displayName": {
                            "query": text,
                            "boost": 2.0
                        }
                    }
                }
            ],
            "minimum_should_match": 1
        }
    });

    match space_id {
        Some(space_id) => json!({
            "bool": {
                "must": [text_query],
                "filter": [
                    { "term": { "spaceID": space_id.to_string() } }
                ]
            }
        }),
        None => text_query,
    }
}

/// Build the NDJSON lines of a multi-search: a header naming the index,
/// then the search body, for each target.
pub fn build_multi_search_body(request: &IndexSearchRequest) -> Vec<Value> {
    let query = build_search_query(&request.text, request.space_id);

    request
        .targets
        .iter()
        .flat_map(|target| {
            [
                json!({ "index": target.index }),
                json!({
                    "query": query,
                    "size": target.size,
                    "_source": SOURCE_FIELDS
                }),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SearchTarget;

    #[test]
    fn test_unscoped_query_has_no_filter() {
        let query = build_search_query("solar", None);

        assert!(query["bool"].get("filter").is_none());
        assert_eq!(query["bool"]["should"][0]["multi_match"]["query"], "solar");
    }

    #[test]
    fn test_scoped_query_filters_on_space() {
        let space_id = Uuid::new_v4();

        let query = build_search_query("solar", Some(space_id));

        assert_eq!(
            query["bool"]["filter"][0]["term"]["spaceID"],
            space_id.to_string()
        );
        assert_eq!(
            query["bool"]["must"][0]["bool"]["minimum_should_match"],
            1
        );
    }

    #[test]
    fn test_multi_search_body_pairs_header_and_body() {
        let request = IndexSearchRequest {
            text: "solar energy".to_string(),
            space_id: None,
            targets: vec![
                SearchTarget {
                    index: "collab-data-spaces".to_string(),
                    size: 16,
                },
                SearchTarget {
                    index: "collab-data-posts".to_string(),
                    size: 16,
                },
            ],
        };

        let lines = build_multi_search_body(&request);

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0]["index"], "collab-data-spaces");
        assert_eq!(lines[1]["size"], 16);
        assert_eq!(lines[2]["index"], "collab-data-posts");
        assert_eq!(lines[3]["_source"][1], "type");
    }
}
