//! OpenSearch index configuration and mappings.
//!
//! Every search index is created with the same settings and mappings. Ids
//! and denormalized parent references are keywords for exact filtering;
//! profile fields are analyzed text.

use serde_json::{json, Value};

/// Get the index settings and mappings shared by all search indices.
///
/// The configuration includes:
/// - **Keyword fields**: `id`, `type`, parent ids and visibility, for filtering
/// - **Text fields**: profile name, tagline, description, tags and whiteboard content
/// - **Date field**: `createdDate` for contributions
pub fn get_index_settings() -> Value {
    let keyword = json!({ "type": "keyword" });
    let text = json!({ "type": "text" });

    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": {
                "id": keyword,
                "type": keyword,
                "nameID": keyword,
                "level": keyword,
                "spaceID": keyword,
                "collaborationID": keyword,
                "calloutID": keyword,
                "createdBy": keyword,
                "createdDate": {
                    "type": "date"
                },
                "license": {
                    "properties": {
                        "visibility": keyword
                    }
                },
                "firstName": text,
                "lastName": text,
                "content": text,
                "profile": {
                    "properties": {
                        "displayName": {
                            "type": "text",
                            "fields": {
                                "raw": keyword
                            }
                        },
                        "tagline": text,
                        "description": text,
                        "tags": text,
                        "location": {
                            "properties": {
                                "city": text,
                                "country": text
                            }
                        }
                    }
                },
                "context": {
                    "properties": {
                        "vision": text,
                        "impact": text,
                        "who": text
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_settings_structure() {
        let settings = get_index_settings();

        assert!(settings["settings"]["number_of_shards"].is_number());
        assert!(settings["settings"]["number_of_replicas"].is_number());

        let properties = &settings["mappings"]["properties"];
        assert_eq!(properties["id"]["type"], "keyword");
        assert_eq!(properties["spaceID"]["type"], "keyword");
        assert_eq!(properties["license"]["properties"]["visibility"]["type"], "keyword");
        assert_eq!(properties["profile"]["properties"]["tags"]["type"], "text");
        assert_eq!(
            properties["profile"]["properties"]["displayName"]["fields"]["raw"]["type"],
            "keyword"
        );
    }
}
